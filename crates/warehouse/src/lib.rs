//! `stockyard-warehouse`
//!
//! The warehouse context: one object owning catalog, location grid, document
//! ledger and reconciliation engine, exposing every operation a shell needs
//! and keeping grid occupancy derived from product locations.

pub mod context;
pub mod seed;
pub mod shared;

pub use context::Warehouse;
pub use shared::SharedWarehouse;
