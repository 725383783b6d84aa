use anyhow::Context;
use chrono::Utc;

use stockyard_core::WarehouseConfig;
use stockyard_warehouse::Warehouse;

fn main() -> anyhow::Result<()> {
    stockyard_observability::init();

    let config = WarehouseConfig::from_env().context("failed to load warehouse configuration")?;
    let now = Utc::now();
    let warehouse = Warehouse::with_sample_data(config, now).context("failed to seed sample warehouse")?;

    let efficiency = warehouse.efficiency_report();
    tracing::info!(
        products = efficiency.positions,
        slots = efficiency.occupancy.total,
        occupied = efficiency.occupancy.occupied,
        stock_value = %efficiency.stock_value,
        "warehouse ready"
    );

    let snapshot = serde_json::json!({
        "inventory": warehouse.inventory_summary(),
        "efficiency": efficiency,
        "financial": warehouse.financial_report(now),
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
