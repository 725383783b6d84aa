//! Inventory reconciliation.
//!
//! A check snapshots every product's quantity, collects physical counts, and
//! on completion reports discrepancies and optionally writes the counts back.

pub mod check;
pub mod engine;

pub use check::{CheckStatus, CheckSummary, CountLine, InventoryCheck};
pub use engine::{ReconciliationEngine, summarize};
