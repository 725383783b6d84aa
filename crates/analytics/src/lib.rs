//! Read-only analytics over the warehouse state.
//!
//! Everything here takes the catalog, grid, ledger or reconciliation engine by
//! shared reference and returns plain data. Slot planners return moves for the
//! caller to apply.

pub mod abc;
pub mod efficiency;
pub mod movement;
pub mod occupancy;
pub mod optimize;
pub mod valuation;

use rust_decimal::Decimal;

pub use abc::{AbcAnalysis, AbcClass, AbcClassSummary, AbcEntry, classify};
pub use efficiency::{CheckAccuracy, EfficiencyReport, SpaceAdvice, efficiency_report};
pub use movement::{
    DocumentTotals, FinancialReport, MovementReport, Period, PeriodTotals, PurposeTotals,
    SalesEstimate, SupplierActivity, SupplierReport, SupplierStock, SupplierSummary,
    financial_report, movement_report, supplier_report,
};
pub use occupancy::{OccupancyStats, ZoneOccupancy, occupancy_stats};
pub use optimize::{Relocation, RelocationPlan, plan_automatic, plan_by_category};
pub use valuation::{
    CategoryValue, InventorySummary, ProductValue, inventory_summary, stock_value, top_valuable,
};

/// `part / total` in percent, rounded to 2 places; zero when `total` is zero.
pub(crate) fn percent(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / total).round_dp(2)
}
