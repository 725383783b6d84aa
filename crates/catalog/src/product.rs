use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{Entity, ProductId, SlotCode, WarehouseError, WarehouseResult};

/// A stocked product.
///
/// Quantity is only changed through the stock methods on [`crate::Catalog`],
/// which the document ledger and the reconciliation engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    barcode: String,
    category: String,
    unit_price: Decimal,
    quantity: u32,
    min_stock_level: u32,
    max_stock_level: u32,
    location: Option<SlotCode>,
    supplier: String,
    last_restock: DateTime<Utc>,
}

impl Product {
    pub(crate) fn from_new(id: ProductId, new: NewProduct, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name.trim().to_string(),
            barcode: new.barcode.trim().to_string(),
            category: new.category.trim().to_string(),
            unit_price: new.unit_price,
            quantity: new.quantity,
            min_stock_level: new.min_stock_level,
            max_stock_level: new.max_stock_level,
            location: new.location,
            supplier: new.supplier.trim().to_string(),
            last_restock: at,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn min_stock_level(&self) -> u32 {
        self.min_stock_level
    }

    pub fn max_stock_level(&self) -> u32 {
        self.max_stock_level
    }

    pub fn location(&self) -> Option<SlotCode> {
        self.location
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn last_restock(&self) -> DateTime<Utc> {
        self.last_restock
    }

    /// Value of the stock on hand (`unit_price × quantity`).
    pub fn stock_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_stock_level
    }

    pub fn is_overstocked(&self) -> bool {
        self.quantity > self.max_stock_level
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_location(&mut self, location: Option<SlotCode>) {
        self.location = location;
    }

    pub(crate) fn set_last_restock(&mut self, at: DateTime<Utc>) {
        self.last_restock = at;
    }

    /// Apply a sparse patch. Validation runs on the merged result before any
    /// field is written, so a rejected patch leaves the product untouched.
    pub(crate) fn apply_patch(&mut self, patch: ProductPatch) -> WarehouseResult<()> {
        let min = patch.min_stock_level.unwrap_or(self.min_stock_level);
        let max = patch.max_stock_level.unwrap_or(self.max_stock_level);
        ensure_stock_range(min, max)?;
        if let Some(price) = patch.unit_price {
            ensure_price(price)?;
        }

        if let Some(name) = non_blank(patch.name) {
            self.name = name;
        }
        if let Some(category) = non_blank(patch.category) {
            self.category = category;
        }
        if let Some(price) = patch.unit_price {
            self.unit_price = price;
        }
        self.min_stock_level = min;
        self.max_stock_level = max;
        if let Some(location) = patch.location {
            self.location = Some(location);
        }
        if let Some(supplier) = non_blank(patch.supplier) {
            self.supplier = supplier;
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Fields of a product to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub barcode: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub min_stock_level: u32,
    pub max_stock_level: u32,
    pub location: Option<SlotCode>,
    pub supplier: String,
}

impl NewProduct {
    pub fn validate(&self) -> WarehouseResult<()> {
        if self.name.trim().is_empty() {
            return Err(WarehouseError::validation("name cannot be empty"));
        }
        if self.barcode.trim().is_empty() {
            return Err(WarehouseError::validation("barcode cannot be empty"));
        }
        ensure_price(self.unit_price)?;
        ensure_stock_range(self.min_stock_level, self.max_stock_level)
    }
}

/// Sparse update: `None` (or a blank string) keeps the current value.
///
/// Quantity is deliberately absent; stock moves only through documents and
/// inventory checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<Decimal>,
    pub min_stock_level: Option<u32>,
    pub max_stock_level: Option<u32>,
    pub location: Option<SlotCode>,
    pub supplier: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        non_blank(self.name.clone()).is_none()
            && non_blank(self.category.clone()).is_none()
            && self.unit_price.is_none()
            && self.min_stock_level.is_none()
            && self.max_stock_level.is_none()
            && self.location.is_none()
            && non_blank(self.supplier.clone()).is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn ensure_price(price: Decimal) -> WarehouseResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(WarehouseError::validation("unit price cannot be negative"));
    }
    Ok(())
}

fn ensure_stock_range(min: u32, max: u32) -> WarehouseResult<()> {
    if max < min {
        return Err(WarehouseError::invalid_range(format!(
            "max stock level {max} is below min stock level {min}"
        )));
    }
    Ok(())
}
