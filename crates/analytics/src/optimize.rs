//! Slot assignment planners.
//!
//! Planners only read the catalog and grid; the caller applies the returned
//! moves and recomputes occupancy. Slots in `reserved` (destinations claimed
//! by open receipts) are never handed out.

use serde::{Deserialize, Serialize};

use stockyard_catalog::{Catalog, Product};
use stockyard_core::{ProductId, SlotCode};
use stockyard_locations::{LocationGrid, Slot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub product_id: ProductId,
    pub from: Option<SlotCode>,
    pub to: SlotCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationPlan {
    pub moves: Vec<Relocation>,
    /// Products the plan found no slot for; they keep their location.
    pub unplaced: Vec<ProductId>,
}

impl RelocationPlan {
    /// Number of products relocated by the plan.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Give each category its own zone.
///
/// Categories (first-seen order) take zones from `zone_pool` in order. Within
/// its zone a category fills the slots that were free when planning started,
/// in grid order, until either side runs out. A pool letter that is not a
/// grid zone still consumes a category, which then gets no slots.
pub fn plan_by_category(
    catalog: &Catalog,
    grid: &LocationGrid,
    zone_pool: &[char],
    reserved: &[SlotCode],
) -> RelocationPlan {
    let free: Vec<&Slot> = grid
        .free()
        .into_iter()
        .filter(|s| !reserved.contains(&s.code()))
        .collect();
    let mut plan = RelocationPlan::default();

    for (i, (category, products)) in catalog.categories().into_iter().enumerate() {
        let Some(&zone) = zone_pool.get(i) else {
            tracing::debug!(category, "no zone left for category");
            plan.unplaced.extend(products.iter().map(|p| p.product_id()));
            continue;
        };
        let mut slots = free.iter().filter(|s| s.zone() == zone);
        for product in products {
            match slots.next() {
                Some(slot) => plan.moves.push(relocation(product, slot.code())),
                None => plan.unplaced.push(product.product_id()),
            }
        }
    }
    plan
}

/// Dense repacking: products sorted by (category ascending, quantity
/// descending) take slots in grid order, one each, ignoring current
/// placements. Products past the last slot are left where they are.
pub fn plan_automatic(catalog: &Catalog, grid: &LocationGrid, reserved: &[SlotCode]) -> RelocationPlan {
    let mut products: Vec<&Product> = catalog.iter().collect();
    products.sort_by(|a, b| {
        a.category()
            .cmp(b.category())
            .then_with(|| b.quantity().cmp(&a.quantity()))
    });

    let mut slots = grid.slots().iter().filter(|s| !reserved.contains(&s.code()));
    let mut plan = RelocationPlan::default();
    for product in products {
        match slots.next() {
            Some(slot) => plan.moves.push(relocation(product, slot.code())),
            None => plan.unplaced.push(product.product_id()),
        }
    }
    plan
}

fn relocation(product: &Product, to: SlotCode) -> Relocation {
    Relocation {
        product_id: product.product_id(),
        from: product.location(),
        to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{catalog_with, code, grid};

    #[test]
    fn categories_take_zones_in_order() {
        let (catalog, ids) = catalog_with(&[
            ("Electronics", 5, None),
            ("Tools", 5, None),
            ("Electronics", 9, None),
        ]);
        let mut grid = grid(&['A', 'B'], 1);
        grid.recompute_occupancy(&catalog);

        let plan = plan_by_category(&catalog, &grid, &['A', 'B'], &[]);
        assert_eq!(plan.len(), 3);
        let target = |id| plan.moves.iter().find(|m| m.product_id == id).map(|m| m.to);
        assert_eq!(target(ids[0]), Some(code("A-1-1-01")));
        assert_eq!(target(ids[2]), Some(code("A-1-1-02")));
        assert_eq!(target(ids[1]), Some(code("B-1-1-01")));
        assert!(plan.unplaced.is_empty());
    }

    #[test]
    fn occupied_slots_are_skipped_and_missing_zones_place_nothing() {
        let (catalog, ids) = catalog_with(&[
            ("Electronics", 5, Some("A-1-1-01")),
            ("Electronics", 5, None),
            ("Tools", 5, None),
        ]);
        let mut grid = grid(&['A'], 1);
        grid.recompute_occupancy(&catalog);

        // Zone 'Z' is not part of the grid.
        let plan = plan_by_category(&catalog, &grid, &['A', 'Z'], &[]);
        assert_eq!(
            plan.moves,
            vec![
                Relocation {
                    product_id: ids[0],
                    from: Some(code("A-1-1-01")),
                    to: code("A-1-1-02"),
                },
                Relocation {
                    product_id: ids[1],
                    from: None,
                    to: code("A-1-1-03"),
                },
            ]
        );
        assert_eq!(plan.unplaced, vec![ids[2]]);
    }

    #[test]
    fn categories_beyond_the_pool_stay_put() {
        let (catalog, ids) = catalog_with(&[("One", 1, None), ("Two", 1, None)]);
        let grid = grid(&['A', 'B'], 1);

        let plan = plan_by_category(&catalog, &grid, &['A'], &[]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.unplaced, vec![ids[1]]);
    }

    #[test]
    fn automatic_plan_sorts_by_category_then_quantity() {
        let (catalog, ids) = catalog_with(&[
            ("Tools", 50, Some("B-1-1-05")),
            ("Electronics", 10, None),
            ("Electronics", 30, None),
        ]);
        let grid = grid(&['A', 'B'], 1);

        let plan = plan_automatic(&catalog, &grid, &[]);
        let order: Vec<(ProductId, SlotCode)> = plan.moves.iter().map(|m| (m.product_id, m.to)).collect();
        assert_eq!(
            order,
            vec![
                (ids[2], code("A-1-1-01")),
                (ids[1], code("A-1-1-02")),
                (ids[0], code("A-1-1-03")),
            ]
        );
    }

    #[test]
    fn automatic_plan_truncates_at_slot_count() {
        let rows: Vec<(&str, u32, Option<&str>)> = (0..6).map(|_| ("Bulk", 1, None)).collect();
        let (catalog, _) = catalog_with(&rows);
        // One zone of a single rack/section with 5 cells.
        let grid = grid(&['A'], 1);

        let plan = plan_automatic(&catalog, &grid, &[]);
        assert_eq!(plan.len(), grid.len().min(catalog.len()));
        assert_eq!(plan.unplaced.len(), catalog.len() - plan.len());
    }

    #[test]
    fn reserved_slots_are_never_assigned() {
        let (catalog, ids) = catalog_with(&[
            ("Electronics", 5, None),
            ("Electronics", 5, None),
            ("Tools", 5, None),
        ]);
        let mut grid = grid(&['A', 'B'], 1);
        grid.recompute_occupancy(&catalog);
        let reserved = [code("A-1-1-01"), code("B-1-1-01")];

        let plan = plan_by_category(&catalog, &grid, &['A', 'B'], &reserved);
        let target = |id| plan.moves.iter().find(|m| m.product_id == id).map(|m| m.to);
        assert_eq!(target(ids[0]), Some(code("A-1-1-02")));
        assert_eq!(target(ids[1]), Some(code("A-1-1-03")));
        assert_eq!(target(ids[2]), Some(code("B-1-1-02")));

        let plan = plan_automatic(&catalog, &grid, &reserved);
        assert!(plan.moves.iter().all(|m| !reserved.contains(&m.to)));
        assert_eq!(plan.moves[0].to, code("A-1-1-02"));
    }

    #[test]
    fn a_fully_reserved_zone_leaves_its_category_unplaced() {
        let (catalog, ids) = catalog_with(&[("Tools", 5, None), ("Tools", 5, None)]);
        let grid = grid(&['A'], 1);
        let reserved: Vec<SlotCode> = grid.slots().iter().map(|s| s.code()).collect();

        let plan = plan_by_category(&catalog, &grid, &['A'], &reserved);
        assert!(plan.is_empty());
        assert_eq!(plan.unplaced, ids);

        let plan = plan_automatic(&catalog, &grid, &reserved);
        assert!(plan.is_empty());
        assert_eq!(plan.unplaced.len(), 2);
    }
}
