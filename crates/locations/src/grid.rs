//! The fixed storage grid and its derived occupancy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stockyard_catalog::{Catalog, Product};
use stockyard_core::{GridConfig, ProductId, SlotCode, WarehouseError, WarehouseResult};

use crate::slot::Slot;

/// Two products pointing at the same slot; the earlier one in catalog order
/// keeps the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub code: SlotCode,
    pub kept: ProductId,
    pub ignored: ProductId,
}

/// Outcome of one occupancy recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReport {
    pub placed: usize,
    pub collisions: Vec<Collision>,
    /// Products whose location is not a slot of this grid.
    pub off_grid: Vec<ProductId>,
}

/// Fixed set of slots, generated once from a [`GridConfig`].
///
/// Slots are stored in grid order (zone, rack, section, cell) with a
/// code → index map, so recomputation is linear in the number of products.
#[derive(Debug, Clone)]
pub struct LocationGrid {
    config: GridConfig,
    slots: Vec<Slot>,
    index: HashMap<SlotCode, usize>,
}

impl LocationGrid {
    /// Build the Cartesian product of zones × racks × sections × cells.
    pub fn initialize(config: &GridConfig) -> WarehouseResult<Self> {
        config.validate()?;

        let mut slots = Vec::with_capacity(config.slot_count());
        for &zone in &config.zones {
            for rack in 1..=config.racks_per_zone {
                for section in 1..=config.sections_per_rack {
                    for cell in 1..=config.cells_per_section {
                        let code = SlotCode::new(zone, rack, section, cell)?;
                        slots.push(Slot::new(code, config.capacity_per_slot));
                    }
                }
            }
        }
        slots.sort_by_key(|s| s.code());

        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.code(), i))
            .collect();

        tracing::debug!(slots = slots.len(), zones = config.zones.len(), "location grid initialized");
        Ok(Self {
            config: config.clone(),
            slots,
            index,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in grid order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Zone letters in grid order.
    pub fn zones(&self) -> Vec<char> {
        let mut zones = self.config.zones.clone();
        zones.sort_unstable();
        zones
    }

    pub fn slots_in_zone(&self, zone: char) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(move |s| s.zone() == zone)
    }

    pub fn contains(&self, code: &SlotCode) -> bool {
        self.index.contains_key(code)
    }

    pub fn slot(&self, code: &SlotCode) -> WarehouseResult<&Slot> {
        self.index
            .get(code)
            .map(|&i| &self.slots[i])
            .ok_or_else(|| WarehouseError::slot_not_found(code))
    }

    /// Product currently occupying `code`, if any.
    pub fn occupant(&self, code: &SlotCode) -> Option<ProductId> {
        self.index.get(code).and_then(|&i| self.slots[i].occupied_by())
    }

    /// Re-derive every slot's occupant from the products' locations.
    ///
    /// Clears all slots first, then walks the catalog in order; when several
    /// products name the same slot the first one keeps it.
    pub fn recompute_occupancy(&mut self, catalog: &Catalog) -> OccupancyReport {
        for slot in &mut self.slots {
            slot.set_occupant(None);
        }

        let mut report = OccupancyReport::default();
        for product in catalog.iter() {
            let Some(code) = product.location() else {
                continue;
            };
            let Some(&i) = self.index.get(&code) else {
                report.off_grid.push(product.product_id());
                continue;
            };
            let slot = &mut self.slots[i];
            match slot.occupied_by() {
                None => {
                    slot.set_occupant(Some(product.product_id()));
                    report.placed += 1;
                }
                Some(kept) => report.collisions.push(Collision {
                    code,
                    kept,
                    ignored: product.product_id(),
                }),
            }
        }

        for collision in &report.collisions {
            tracing::warn!(
                slot = %collision.code,
                kept = %collision.kept,
                ignored = %collision.ignored,
                "several products reference one slot"
            );
        }
        tracing::debug!(
            placed = report.placed,
            collisions = report.collisions.len(),
            off_grid = report.off_grid.len(),
            "occupancy recomputed"
        );
        report
    }

    /// Free slots in grid order.
    pub fn free(&self) -> Vec<&Slot> {
        self.slots.iter().filter(|s| !s.is_occupied()).collect()
    }

    /// Occupied slots in grid order.
    pub fn occupied(&self) -> Vec<&Slot> {
        self.slots.iter().filter(|s| s.is_occupied()).collect()
    }

    /// Products whose location code starts with `prefix` (e.g. `"B"` for a
    /// whole zone, `"A-1-2"` for one section), in catalog order.
    pub fn find_by_code_prefix<'c>(&self, catalog: &'c Catalog, prefix: &str) -> Vec<&'c Product> {
        let prefix = prefix.trim().to_ascii_uppercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        catalog
            .iter()
            .filter(|p| p.location().is_some_and(|code| code.matches_prefix(&prefix)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use stockyard_catalog::NewProduct;

    fn small_config() -> GridConfig {
        GridConfig {
            zones: vec!['B', 'A'],
            racks_per_zone: 2,
            sections_per_rack: 1,
            cells_per_section: 2,
            capacity_per_slot: 50.0,
        }
    }

    fn code(raw: &str) -> SlotCode {
        raw.parse().unwrap()
    }

    fn add(catalog: &mut Catalog, barcode: &str, location: Option<&str>) -> ProductId {
        catalog
            .add(
                NewProduct {
                    name: format!("Item {barcode}"),
                    barcode: barcode.to_string(),
                    category: "General".to_string(),
                    unit_price: Decimal::ONE,
                    quantity: 1,
                    min_stock_level: 0,
                    max_stock_level: 10,
                    location: location.map(code),
                    supplier: "Acme".to_string(),
                },
                Utc::now(),
            )
            .unwrap()
    }

    #[test]
    fn initialize_builds_cartesian_product_in_grid_order() {
        let grid = LocationGrid::initialize(&small_config()).unwrap();
        assert_eq!(grid.len(), 8);
        let codes: Vec<String> = grid.slots().iter().map(|s| s.code().to_string()).collect();
        assert_eq!(codes[0], "A-1-1-01");
        assert_eq!(codes[1], "A-1-1-02");
        assert_eq!(codes[2], "A-2-1-01");
        assert_eq!(codes[4], "B-1-1-01");
        assert!(grid.slots().iter().all(|s| s.capacity() == 50.0));
        assert_eq!(grid.zones(), vec!['A', 'B']);
    }

    #[test]
    fn default_grid_contains_sample_locations() {
        let grid = LocationGrid::initialize(&GridConfig::default()).unwrap();
        assert_eq!(grid.len(), 225);
        assert!(grid.contains(&code("A-1-2-01")));
        assert!(grid.contains(&code("C-3-2-01")));
        assert!(!grid.contains(&code("D-1-1-01")));
        assert!(matches!(
            grid.slot(&code("D-1-1-01")),
            Err(WarehouseError::NotFound(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.zones.clear();
        assert!(matches!(
            LocationGrid::initialize(&config),
            Err(WarehouseError::InvalidRange(_))
        ));
    }

    #[test]
    fn recompute_marks_referenced_slots() {
        let mut grid = LocationGrid::initialize(&small_config()).unwrap();
        let mut catalog = Catalog::new();
        let p1 = add(&mut catalog, "001", Some("A-1-1-02"));
        add(&mut catalog, "002", None);
        let p3 = add(&mut catalog, "003", Some("Z-9-9-09"));

        let report = grid.recompute_occupancy(&catalog);
        assert_eq!(report.placed, 1);
        assert_eq!(report.off_grid, vec![p3]);
        assert_eq!(grid.occupant(&code("A-1-1-02")), Some(p1));
        assert_eq!(grid.occupied().len(), 1);
        assert_eq!(grid.free().len(), 7);
    }

    #[test]
    fn recompute_is_a_full_rebuild() {
        let mut grid = LocationGrid::initialize(&small_config()).unwrap();
        let mut catalog = Catalog::new();
        let p1 = add(&mut catalog, "001", Some("A-1-1-01"));
        grid.recompute_occupancy(&catalog);

        catalog.relocate(p1, Some(code("B-2-1-02"))).unwrap();
        grid.recompute_occupancy(&catalog);
        assert_eq!(grid.occupant(&code("A-1-1-01")), None);
        assert_eq!(grid.occupant(&code("B-2-1-02")), Some(p1));

        catalog.remove(p1, true).unwrap();
        grid.recompute_occupancy(&catalog);
        assert!(grid.occupied().is_empty());
    }

    #[test]
    fn first_product_in_catalog_order_wins_a_shared_slot() {
        let mut grid = LocationGrid::initialize(&small_config()).unwrap();
        let mut catalog = Catalog::new();
        let first = add(&mut catalog, "001", Some("A-2-1-01"));
        let second = add(&mut catalog, "002", Some("A-2-1-01"));

        let report = grid.recompute_occupancy(&catalog);
        assert_eq!(grid.occupant(&code("A-2-1-01")), Some(first));
        assert_eq!(
            report.collisions,
            vec![Collision {
                code: code("A-2-1-01"),
                kept: first,
                ignored: second
            }]
        );
    }

    #[test]
    fn prefix_search_supports_partial_addresses() {
        let grid = LocationGrid::initialize(&small_config()).unwrap();
        let mut catalog = Catalog::new();
        add(&mut catalog, "001", Some("A-1-1-01"));
        add(&mut catalog, "002", Some("A-2-1-02"));
        add(&mut catalog, "003", Some("B-1-1-01"));
        add(&mut catalog, "004", None);

        assert_eq!(grid.find_by_code_prefix(&catalog, "a").len(), 2);
        assert_eq!(grid.find_by_code_prefix(&catalog, "A-2").len(), 1);
        assert_eq!(grid.find_by_code_prefix(&catalog, "B-1-1-01").len(), 1);
        assert!(grid.find_by_code_prefix(&catalog, "  ").is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: after recomputation every product located on the grid
            /// is either the slot's occupant or collides with an earlier product
            /// in catalog order.
            #[test]
            fn occupancy_follows_first_match(
                picks in prop::collection::vec(prop::option::of(0usize..8), 0..20)
            ) {
                let mut grid = LocationGrid::initialize(&small_config()).unwrap();
                let codes: Vec<SlotCode> = grid.slots().iter().map(|s| s.code()).collect();
                let mut catalog = Catalog::new();
                for (i, pick) in picks.iter().enumerate() {
                    let location = pick.map(|p| codes[p].to_string());
                    add(&mut catalog, &format!("{i:03}"), location.as_deref());
                }

                grid.recompute_occupancy(&catalog);

                for slot in grid.slots() {
                    let first = catalog
                        .iter()
                        .find(|p| p.location() == Some(slot.code()))
                        .map(|p| p.product_id());
                    prop_assert_eq!(slot.occupied_by(), first);
                }
            }
        }
    }
}
