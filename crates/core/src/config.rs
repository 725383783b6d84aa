//! Warehouse configuration.
//!
//! Defaults reproduce the demonstration warehouse: three zones of five racks,
//! three sections per rack and five cells per section (225 slots).

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::error::WarehouseError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] WarehouseError),
}

/// Shape of the storage grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub zones: Vec<char>,
    pub racks_per_zone: u16,
    pub sections_per_rack: u16,
    pub cells_per_section: u16,
    /// Nominal capacity of every slot, in abstract units.
    pub capacity_per_slot: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            zones: vec!['A', 'B', 'C'],
            racks_per_zone: 5,
            sections_per_rack: 3,
            cells_per_section: 5,
            capacity_per_slot: 100.0,
        }
    }
}

impl GridConfig {
    pub fn slot_count(&self) -> usize {
        self.zones.len()
            * usize::from(self.racks_per_zone)
            * usize::from(self.sections_per_rack)
            * usize::from(self.cells_per_section)
    }

    pub fn validate(&self) -> Result<(), WarehouseError> {
        if self.zones.is_empty() {
            return Err(WarehouseError::invalid_range("grid needs at least one zone"));
        }
        if let Some(zone) = self.zones.iter().find(|z| !z.is_ascii_uppercase()) {
            return Err(WarehouseError::invalid_range(format!(
                "zone {zone:?} is not a letter A-Z"
            )));
        }
        let mut seen = self.zones.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.zones.len() {
            return Err(WarehouseError::invalid_range("zones must be distinct"));
        }
        if self.racks_per_zone == 0 || self.sections_per_rack == 0 || self.cells_per_section == 0 {
            return Err(WarehouseError::invalid_range(
                "racks, sections and cells must be at least 1",
            ));
        }
        if !(self.capacity_per_slot.is_finite() && self.capacity_per_slot >= 0.0) {
            return Err(WarehouseError::invalid_range(
                "slot capacity must be a finite non-negative number",
            ));
        }
        Ok(())
    }
}

/// Slot optimizer settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Zones handed out to categories, in order, by category optimization.
    pub zone_pool: Vec<char>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            zone_pool: vec!['A', 'B', 'C', 'D', 'E'],
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Cumulative value percentage closing class A.
    pub abc_a_threshold: Decimal,
    /// Cumulative value percentage closing class B.
    pub abc_b_threshold: Decimal,
    /// Assumed margin on sales for the profit estimate.
    pub estimated_margin: Decimal,
    /// Length of "top" lists in reports.
    pub top_n: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            abc_a_threshold: Decimal::from(80),
            abc_b_threshold: Decimal::from(95),
            estimated_margin: Decimal::new(30, 2),
            top_n: 10,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), WarehouseError> {
        let hundred = Decimal::ONE_HUNDRED;
        if self.abc_a_threshold <= Decimal::ZERO || self.abc_b_threshold > hundred {
            return Err(WarehouseError::invalid_range(
                "ABC thresholds must lie in (0, 100]",
            ));
        }
        if self.abc_b_threshold < self.abc_a_threshold {
            return Err(WarehouseError::invalid_range(
                "ABC threshold for class B is below class A",
            ));
        }
        if self.estimated_margin.is_sign_negative() {
            return Err(WarehouseError::invalid_range("margin cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    pub grid: GridConfig,
    pub optimizer: OptimizerConfig,
    pub analytics: AnalyticsConfig,
}

impl WarehouseConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `STOCKYARD_*` environment variables.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("STOCKYARD_GRID_ZONES") {
            let zones: Vec<char> = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .map(|c| c.to_ascii_uppercase())
                .collect();
            if zones.is_empty() {
                tracing::warn!(value = %raw, "STOCKYARD_GRID_ZONES is empty; keeping default");
            } else {
                config.grid.zones = zones;
            }
        }
        override_parsed(&lookup, "STOCKYARD_GRID_RACKS", &mut config.grid.racks_per_zone);
        override_parsed(&lookup, "STOCKYARD_GRID_SECTIONS", &mut config.grid.sections_per_rack);
        override_parsed(&lookup, "STOCKYARD_GRID_CELLS", &mut config.grid.cells_per_section);
        override_parsed(&lookup, "STOCKYARD_SLOT_CAPACITY", &mut config.grid.capacity_per_slot);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WarehouseError> {
        self.grid.validate()?;
        self.analytics.validate()
    }
}

fn override_parsed<T: core::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(key, value = %raw, "unparsable config value; keeping default"),
    }
}
