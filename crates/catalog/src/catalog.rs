//! The product catalog.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{
    IdSequence, ProductId, SlotCode, WarehouseError, WarehouseResult, find_by_id,
};

use crate::product::{NewProduct, Product, ProductPatch};

/// One row of the low-stock or overstock lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub location: Option<SlotCode>,
    pub quantity: u32,
    /// The level that was crossed (min for low stock, max for overstock).
    pub level: u32,
    /// Distance to the level: units missing, or units in excess.
    pub difference: u32,
}

/// Owns every product; enforces id and barcode uniqueness.
///
/// Products are kept in insertion order, which drives category grouping and
/// the first-match rule of slot occupancy.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    barcodes: HashMap<String, ProductId>,
    ids: IdSequence<ProductId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.position(id).is_some()
    }

    /// Insert a product under the next id.
    pub fn add(&mut self, new: NewProduct, at: DateTime<Utc>) -> WarehouseResult<ProductId> {
        new.validate()?;
        let barcode = new.barcode.trim();
        if self.barcodes.contains_key(barcode) {
            return Err(WarehouseError::DuplicateBarcode(barcode.to_string()));
        }

        let id = self.ids.next_id();
        let product = Product::from_new(id, new, at);
        self.barcodes.insert(product.barcode().to_string(), id);
        tracing::debug!(product_id = %id, barcode = product.barcode(), "product added");
        self.products.push(product);
        Ok(id)
    }

    /// Apply a sparse patch to an existing product.
    pub fn update(&mut self, id: ProductId, patch: ProductPatch) -> WarehouseResult<&Product> {
        let product = self.get_mut(id)?;
        product.apply_patch(patch)?;
        tracing::debug!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Remove a product. Stock on hand needs `confirmed`.
    pub fn remove(&mut self, id: ProductId, confirmed: bool) -> WarehouseResult<Product> {
        let index = self
            .position(id)
            .ok_or_else(|| WarehouseError::product_not_found(id))?;
        let quantity = self.products[index].quantity();
        if quantity > 0 && !confirmed {
            return Err(WarehouseError::ConfirmationRequired {
                product_id: id,
                quantity,
            });
        }

        let product = self.products.remove(index);
        self.barcodes.remove(product.barcode());
        tracing::info!(product_id = %id, quantity, "product removed");
        Ok(product)
    }

    pub fn find_by_id(&self, id: ProductId) -> WarehouseResult<&Product> {
        find_by_id(&self.products, id).ok_or_else(|| WarehouseError::product_not_found(id))
    }

    pub fn find_by_barcode(&self, barcode: &str) -> WarehouseResult<&Product> {
        let barcode = barcode.trim();
        self.barcodes
            .get(barcode)
            .and_then(|id| find_by_id(&self.products, *id))
            .ok_or_else(|| WarehouseError::not_found(format!("barcode {barcode}")))
    }

    /// Products below their minimum level, ascending by quantity.
    pub fn low_stock(&self) -> Vec<StockAlert> {
        let mut alerts: Vec<StockAlert> = self
            .products
            .iter()
            .filter(|p| p.is_low_stock())
            .map(|p| alert(p, p.min_stock_level(), p.min_stock_level() - p.quantity()))
            .collect();
        alerts.sort_by_key(|a| a.quantity);
        alerts
    }

    /// Products above their maximum level, descending by quantity.
    pub fn overstock(&self) -> Vec<StockAlert> {
        let mut alerts: Vec<StockAlert> = self
            .products
            .iter()
            .filter(|p| p.is_overstocked())
            .map(|p| alert(p, p.max_stock_level(), p.quantity() - p.max_stock_level()))
            .collect();
        alerts.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        alerts
    }

    /// Products grouped by category, categories in first-seen order.
    pub fn categories(&self) -> Vec<(&str, Vec<&Product>)> {
        let mut groups: Vec<(&str, Vec<&Product>)> = Vec::new();
        for product in &self.products {
            match groups.iter_mut().find(|(c, _)| *c == product.category()) {
                Some((_, members)) => members.push(product),
                None => groups.push((product.category(), vec![product])),
            }
        }
        groups
    }

    /// Add received units and optionally move the product to `destination`.
    pub fn receive_stock(
        &mut self,
        id: ProductId,
        quantity: u32,
        destination: Option<SlotCode>,
        at: DateTime<Utc>,
    ) -> WarehouseResult<()> {
        let product = self.get_mut(id)?;
        let updated = product
            .quantity()
            .checked_add(quantity)
            .ok_or_else(|| WarehouseError::invalid_range(format!("stock overflow for product {id}")))?;
        product.set_quantity(updated);
        if destination.is_some() {
            product.set_location(destination);
        }
        product.set_last_restock(at);
        Ok(())
    }

    /// Take units out of stock; fails without touching the product when fewer
    /// than `quantity` are on hand.
    pub fn issue_stock(&mut self, id: ProductId, quantity: u32) -> WarehouseResult<()> {
        let product = self.get_mut(id)?;
        let available = product.quantity();
        if quantity > available {
            return Err(WarehouseError::InsufficientStock {
                product_id: id,
                requested: quantity,
                available,
            });
        }
        product.set_quantity(available - quantity);
        Ok(())
    }

    /// Put previously issued units back without touching the restock date.
    pub fn restore_stock(&mut self, id: ProductId, quantity: u32) -> WarehouseResult<()> {
        let product = self.get_mut(id)?;
        let updated = product
            .quantity()
            .checked_add(quantity)
            .ok_or_else(|| WarehouseError::invalid_range(format!("stock overflow for product {id}")))?;
        product.set_quantity(updated);
        Ok(())
    }

    /// Overwrite the quantity on hand (inventory corrections).
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> WarehouseResult<()> {
        self.get_mut(id)?.set_quantity(quantity);
        Ok(())
    }

    /// Move a product to a slot, or clear its location with `None`.
    pub fn relocate(&mut self, id: ProductId, location: Option<SlotCode>) -> WarehouseResult<()> {
        self.get_mut(id)?.set_location(location);
        Ok(())
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.product_id() == id)
    }

    fn get_mut(&mut self, id: ProductId) -> WarehouseResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.product_id() == id)
            .ok_or_else(|| WarehouseError::product_not_found(id))
    }
}

fn alert(product: &Product, level: u32, difference: u32) -> StockAlert {
    StockAlert {
        product_id: product.product_id(),
        name: product.name().to_string(),
        category: product.category().to_string(),
        location: product.location(),
        quantity: product.quantity(),
        level,
        difference,
    }
}
