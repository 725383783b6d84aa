//! Storage slot codes (`zone-rack-section-cell`).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WarehouseError;
use crate::value_object::ValueObject;

/// Address of one storage slot, displayed as `A-1-2-01`.
///
/// Ordering is grid order: zone, then rack, section and cell numerically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotCode {
    zone: char,
    rack: u16,
    section: u16,
    cell: u16,
}

impl ValueObject for SlotCode {}

impl SlotCode {
    pub fn new(zone: char, rack: u16, section: u16, cell: u16) -> Result<Self, WarehouseError> {
        if !zone.is_ascii_uppercase() {
            return Err(WarehouseError::validation(format!(
                "zone must be a letter A-Z, got {zone:?}"
            )));
        }
        if rack == 0 || section == 0 || cell == 0 {
            return Err(WarehouseError::validation(
                "rack, section and cell numbers start at 1",
            ));
        }
        Ok(Self {
            zone,
            rack,
            section,
            cell,
        })
    }

    pub fn zone(&self) -> char {
        self.zone
    }

    pub fn rack(&self) -> u16 {
        self.rack
    }

    pub fn section(&self) -> u16 {
        self.section
    }

    pub fn cell(&self) -> u16 {
        self.cell
    }

    /// True when the displayed code starts with `prefix` (partial addressing,
    /// e.g. `"B"` for a zone or `"A-1"` for a rack).
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.to_string().starts_with(prefix)
    }
}

impl fmt::Display for SlotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{:02}",
            self.zone, self.rack, self.section, self.cell
        )
    }
}

impl FromStr for SlotCode {
    type Err = WarehouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WarehouseError::validation(format!("malformed slot code: {s:?}"));

        let mut parts = s.trim().split('-');
        let zone = parts.next().ok_or_else(invalid)?;
        let rack = parts.next().ok_or_else(invalid)?;
        let section = parts.next().ok_or_else(invalid)?;
        let cell = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let mut zone_chars = zone.chars();
        let zone = match (zone_chars.next(), zone_chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => return Err(invalid()),
        };
        let rack = rack.parse().map_err(|_| invalid())?;
        let section = section.parse().map_err(|_| invalid())?;
        let cell = cell.parse().map_err(|_| invalid())?;

        Self::new(zone, rack, section, cell)
    }
}

impl Serialize for SlotCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
