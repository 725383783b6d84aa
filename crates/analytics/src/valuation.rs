//! Stock valuation rollups over the catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_catalog::{Catalog, Product, StockAlert};
use stockyard_core::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValue {
    pub category: String,
    pub positions: usize,
    pub quantity: u64,
    pub value: Decimal,
    /// Share of total stock value, in percent.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductValue {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub value: Decimal,
}

impl From<&Product> for ProductValue {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id(),
            name: product.name().to_string(),
            quantity: product.quantity(),
            unit_price: product.unit_price(),
            value: product.stock_value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub positions: usize,
    pub total_quantity: u64,
    pub total_value: Decimal,
    /// Categories in first-seen catalog order.
    pub categories: Vec<CategoryValue>,
    /// At most `top_n` low-stock alerts, lowest quantity first.
    pub low_stock: Vec<StockAlert>,
    /// The `top_n` most valuable stock positions.
    pub top_valuable: Vec<ProductValue>,
}

pub fn stock_value(catalog: &Catalog) -> Decimal {
    catalog.iter().map(Product::stock_value).sum()
}

/// The `top_n` products with the highest stock value, ties in catalog order.
pub fn top_valuable(catalog: &Catalog, top_n: usize) -> Vec<ProductValue> {
    let mut products: Vec<&Product> = catalog.iter().collect();
    products.sort_by(|a, b| b.stock_value().cmp(&a.stock_value()));
    products.into_iter().take(top_n).map(ProductValue::from).collect()
}

pub fn inventory_summary(catalog: &Catalog, top_n: usize) -> InventorySummary {
    let total_value = stock_value(catalog);
    let categories = catalog
        .categories()
        .into_iter()
        .map(|(category, products)| {
            let value: Decimal = products.iter().map(|p| p.stock_value()).sum();
            CategoryValue {
                category: category.to_string(),
                positions: products.len(),
                quantity: products.iter().map(|p| u64::from(p.quantity())).sum(),
                value,
                share: crate::percent(value, total_value),
            }
        })
        .collect();

    let mut low_stock = catalog.low_stock();
    low_stock.truncate(top_n);

    InventorySummary {
        positions: catalog.len(),
        total_quantity: catalog.iter().map(|p| u64::from(p.quantity())).sum(),
        total_value,
        categories,
        low_stock,
        top_valuable: top_valuable(catalog, top_n),
    }
}
