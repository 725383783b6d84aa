use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_catalog::{Catalog, StockAlert};
use stockyard_core::{AnalyticsConfig, CheckId};
use stockyard_inventory::ReconciliationEngine;
use stockyard_locations::LocationGrid;

use crate::abc::{AbcClassSummary, classify};
use crate::occupancy::{OccupancyStats, occupancy_stats};
use crate::valuation::stock_value;

/// How full the grid is, as a hint for the operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpaceAdvice {
    /// Above 90% occupancy.
    NearlyFull,
    /// Below 50% occupancy.
    Underused,
    Balanced,
}

impl SpaceAdvice {
    pub fn from_rate(rate: f64) -> Self {
        if rate > 90.0 {
            SpaceAdvice::NearlyFull
        } else if rate < 50.0 {
            SpaceAdvice::Underused
        } else {
            SpaceAdvice::Balanced
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckAccuracy {
    pub check_id: CheckId,
    pub started_at: DateTime<Utc>,
    pub total_items: usize,
    pub discrepancies: usize,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub occupancy: OccupancyStats,
    pub positions: usize,
    pub stock_value: Decimal,
    pub average_position_value: Option<Decimal>,
    pub abc: Vec<AbcClassSummary>,
    /// Most recent completed inventory check.
    pub last_check: Option<CheckAccuracy>,
    /// Products to restock, lowest quantity first.
    pub restock: Vec<StockAlert>,
    pub space: SpaceAdvice,
}

pub fn efficiency_report(
    catalog: &Catalog,
    grid: &LocationGrid,
    checks: &ReconciliationEngine,
    config: &AnalyticsConfig,
) -> EfficiencyReport {
    let occupancy = occupancy_stats(grid);
    let value = stock_value(catalog);
    let positions = catalog.len();

    let last_check = checks.last_completed().and_then(|check| {
        let summary = check.summary.as_ref()?;
        Some(CheckAccuracy {
            check_id: check.id,
            started_at: check.started_at,
            total_items: summary.total_items,
            discrepancies: summary.discrepancies,
            accuracy: summary.accuracy(),
        })
    });

    EfficiencyReport {
        space: SpaceAdvice::from_rate(occupancy.rate),
        occupancy,
        positions,
        stock_value: value,
        average_position_value: (positions > 0).then(|| value / Decimal::from(positions)),
        abc: classify(catalog, config).summary(),
        last_check,
        restock: catalog.low_stock(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{catalog_with, grid};

    #[test]
    fn advice_thresholds() {
        assert_eq!(SpaceAdvice::from_rate(95.0), SpaceAdvice::NearlyFull);
        assert_eq!(SpaceAdvice::from_rate(90.0), SpaceAdvice::Balanced);
        assert_eq!(SpaceAdvice::from_rate(50.0), SpaceAdvice::Balanced);
        assert_eq!(SpaceAdvice::from_rate(10.0), SpaceAdvice::Underused);
    }

    #[test]
    fn report_includes_last_completed_check() {
        let (mut catalog, ids) = catalog_with(&[("X", 4, Some("A-1-1-01")), ("X", 6, None)]);
        let mut grid = grid(&['A'], 1);
        grid.recompute_occupancy(&catalog);

        let mut checks = ReconciliationEngine::new();
        let config = AnalyticsConfig::default();
        assert!(efficiency_report(&catalog, &grid, &checks, &config).last_check.is_none());

        let id = checks.start(&catalog, "Inspector", Utc::now()).unwrap();
        checks.record_counts(&[(ids[0], 4), (ids[1], 5)]).unwrap();
        checks.complete(&mut catalog, false, "").unwrap();

        let report = efficiency_report(&catalog, &grid, &checks, &config);
        let last = report.last_check.unwrap();
        assert_eq!(last.check_id, id);
        assert_eq!(last.discrepancies, 1);
        assert!((last.accuracy - 50.0).abs() < 1e-9);
        assert_eq!(report.occupancy.occupied, 1);
        assert_eq!(report.space, SpaceAdvice::Underused);
        assert_eq!(report.abc.len(), 3);
        assert_eq!(report.positions, 2);
    }
}
