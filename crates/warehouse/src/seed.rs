//! Demonstration stock.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use stockyard_catalog::NewProduct;
use stockyard_core::{SlotCode, WarehouseConfig, WarehouseResult};

use crate::context::Warehouse;

struct SampleProduct {
    name: &'static str,
    barcode: &'static str,
    category: &'static str,
    unit_price: i64,
    quantity: u32,
    min_stock_level: u32,
    max_stock_level: u32,
    location: &'static str,
    supplier: &'static str,
    restocked_days_ago: i64,
}

const SAMPLE_PRODUCTS: [SampleProduct; 5] = [
    SampleProduct {
        name: "Lenovo ThinkPad laptop",
        barcode: "5901234123457",
        category: "Electronics",
        unit_price: 75_000,
        quantity: 25,
        min_stock_level: 10,
        max_stock_level: 50,
        location: "A-1-2-01",
        supplier: "TechnoCity LLC",
        restocked_days_ago: 5,
    },
    SampleProduct {
        name: "Dell 24\" monitor",
        barcode: "5901234123458",
        category: "Electronics",
        unit_price: 15_000,
        quantity: 40,
        min_stock_level: 15,
        max_stock_level: 60,
        location: "A-1-3-02",
        supplier: "MonitorGroup LLC",
        restocked_days_ago: 3,
    },
    SampleProduct {
        name: "Mechanical keyboard",
        barcode: "5901234123459",
        category: "Components",
        unit_price: 3_500,
        quantity: 100,
        min_stock_level: 50,
        max_stock_level: 200,
        location: "B-2-1-03",
        supplier: "Computer Solutions",
        restocked_days_ago: 10,
    },
    SampleProduct {
        name: "Wireless mouse",
        barcode: "5901234123460",
        category: "Components",
        unit_price: 1_200,
        quantity: 150,
        min_stock_level: 75,
        max_stock_level: 300,
        location: "B-2-1-04",
        supplier: "Peripherals Plus LLC",
        restocked_days_ago: 7,
    },
    SampleProduct {
        name: "500W power supply",
        barcode: "5901234123461",
        category: "Components",
        unit_price: 4_500,
        quantity: 35,
        min_stock_level: 20,
        max_stock_level: 80,
        location: "C-3-2-01",
        supplier: "EnergySystems LLC",
        restocked_days_ago: 15,
    },
];

impl Warehouse {
    /// A warehouse stocked with five demonstration products.
    ///
    /// Sample slots missing from a custom grid are dropped; those products
    /// start unplaced.
    pub fn with_sample_data(config: WarehouseConfig, now: DateTime<Utc>) -> WarehouseResult<Self> {
        let mut warehouse = Self::new(config)?;
        for sample in &SAMPLE_PRODUCTS {
            let code: SlotCode = sample.location.parse()?;
            let location = warehouse.grid().contains(&code).then_some(code);
            if location.is_none() {
                tracing::debug!(barcode = sample.barcode, slot = %code, "sample slot not on grid");
            }
            warehouse.add_product(
                NewProduct {
                    name: sample.name.to_string(),
                    barcode: sample.barcode.to_string(),
                    category: sample.category.to_string(),
                    unit_price: Decimal::from(sample.unit_price),
                    quantity: sample.quantity,
                    min_stock_level: sample.min_stock_level,
                    max_stock_level: sample.max_stock_level,
                    location,
                    supplier: sample.supplier.to_string(),
                },
                now - Duration::days(sample.restocked_days_ago),
            )?;
        }
        tracing::info!(products = warehouse.catalog().len(), "sample data loaded");
        Ok(warehouse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_core::GridConfig;

    #[test]
    fn sample_products_occupy_their_slots() {
        let wh = Warehouse::with_sample_data(WarehouseConfig::default(), Utc::now()).unwrap();
        assert_eq!(wh.catalog().len(), 5);
        assert_eq!(wh.grid().occupied().len(), 5);
        assert!(wh.low_stock().is_empty());
        assert!(wh.overstock().is_empty());

        let laptop = wh.product_by_barcode("5901234123457").unwrap();
        assert_eq!(laptop.location(), Some("A-1-2-01".parse().unwrap()));
        assert_eq!(laptop.stock_value(), Decimal::from(1_875_000));
    }

    #[test]
    fn slots_missing_from_a_small_grid_are_dropped() {
        let config = WarehouseConfig {
            grid: GridConfig {
                zones: vec!['A'],
                ..GridConfig::default()
            },
            ..WarehouseConfig::default()
        };
        let wh = Warehouse::with_sample_data(config, Utc::now()).unwrap();
        assert_eq!(wh.catalog().len(), 5);
        assert_eq!(wh.grid().occupied().len(), 2);
    }
}
