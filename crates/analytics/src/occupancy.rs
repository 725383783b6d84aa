use serde::{Deserialize, Serialize};

use stockyard_locations::LocationGrid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneOccupancy {
    pub zone: char,
    pub total: usize,
    pub occupied: usize,
    /// Percent of the zone's slots in use.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyStats {
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
    pub rate: f64,
    /// Per zone, in zone order.
    pub zones: Vec<ZoneOccupancy>,
}

/// Slot usage of the grid as currently derived.
pub fn occupancy_stats(grid: &LocationGrid) -> OccupancyStats {
    let zones = grid
        .zones()
        .into_iter()
        .map(|zone| {
            let (total, occupied) = grid
                .slots_in_zone(zone)
                .fold((0, 0), |(t, o), s| (t + 1, o + usize::from(s.is_occupied())));
            ZoneOccupancy {
                zone,
                total,
                occupied,
                rate: rate(occupied, total),
            }
        })
        .collect();

    let total = grid.len();
    let occupied = grid.occupied().len();
    OccupancyStats {
        total,
        occupied,
        free: total - occupied,
        rate: rate(occupied, total),
        zones,
    }
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{catalog_with, grid};

    #[test]
    fn counts_overall_and_per_zone() {
        let (catalog, _) = catalog_with(&[
            ("X", 1, Some("A-1-1-01")),
            ("X", 1, Some("A-1-1-02")),
            ("X", 1, Some("B-1-1-01")),
            // Same slot again: still one occupied slot.
            ("X", 1, Some("B-1-1-01")),
        ]);
        let mut grid = grid(&['B', 'A'], 2);
        grid.recompute_occupancy(&catalog);

        let stats = occupancy_stats(&grid);
        assert_eq!(stats.total, 20);
        assert_eq!(stats.occupied, 3);
        assert_eq!(stats.free, 17);
        assert!((stats.rate - 15.0).abs() < 1e-9);

        let zones: Vec<(char, usize, usize)> = stats.zones.iter().map(|z| (z.zone, z.total, z.occupied)).collect();
        assert_eq!(zones, vec![('A', 10, 2), ('B', 10, 1)]);
        assert!((stats.zones[0].rate - 20.0).abs() < 1e-9);
    }
}
