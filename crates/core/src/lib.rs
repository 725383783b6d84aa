//! `stockyard-core`: shared building blocks of the warehouse core.
//!
//! Pure domain primitives: errors, ids, the slot code value object and
//! configuration. No IO beyond reading environment variables for config.

pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod slot;
pub mod value_object;

pub use config::{AnalyticsConfig, ConfigError, GridConfig, OptimizerConfig, WarehouseConfig};
pub use entity::{Entity, find_by_id};
pub use error::{WarehouseError, WarehouseResult};
pub use id::{CheckId, ExpenditureId, IdSequence, NumericId, ProductId, ReceiptId};
pub use slot::SlotCode;
pub use value_object::ValueObject;
