//! Domain error model.

use thiserror::Error;

use crate::id::{CheckId, ProductId};
use crate::slot::SlotCode;

/// Result type used across the warehouse core.
pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Warehouse domain error.
///
/// Every failure of a core operation is surfaced as one of these; the core never
/// retries and never prints. The shell decides whether to re-prompt, abort the
/// open document or propagate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WarehouseError {
    /// An id, barcode or slot lookup missed.
    #[error("not found: {0}")]
    NotFound(String),

    /// Another product already carries this barcode.
    #[error("duplicate barcode: {0}")]
    DuplicateBarcode(String),

    /// Removing a product that still has stock needs an explicit confirmation.
    #[error("product {product_id} still holds {quantity} unit(s); confirmation required")]
    ConfirmationRequired { product_id: ProductId, quantity: u32 },

    /// A document cannot be committed without items.
    #[error("document has no items")]
    EmptyDocument,

    /// An expenditure line asked for more than is on hand.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// An inventory check is already running.
    #[error("inventory check {0} is already in progress")]
    AlreadyInProgress(CheckId),

    /// No inventory check is running.
    #[error("no inventory check in progress")]
    NoActiveCheck,

    /// A bound pair is inverted or a value is out of its range.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A primitive value failed validation (blank name, zero quantity, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The slot is already referenced by another product.
    #[error("slot {code} is occupied by product {product_id}")]
    SlotTaken { code: SlotCode, product_id: ProductId },

    /// The product is part of the running inventory check.
    #[error("product {0} is referenced by the inventory check in progress")]
    ReferencedByOpenCheck(ProductId),

    /// A writer panicked while holding the shared warehouse lock.
    #[error("warehouse lock poisoned")]
    LockPoisoned,
}

impl WarehouseError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn product_not_found(id: ProductId) -> Self {
        Self::NotFound(format!("product {id}"))
    }

    pub fn slot_not_found(code: &SlotCode) -> Self {
        Self::NotFound(format!("slot {code}"))
    }
}
