//! Product catalog.
//!
//! Owns every product, assigns ids and keeps barcodes unique. Stock quantities
//! change only through the stock methods used by the document ledger and the
//! reconciliation engine.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, StockAlert};
pub use product::{NewProduct, Product, ProductPatch};
