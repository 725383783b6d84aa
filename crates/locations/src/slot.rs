use serde::{Deserialize, Serialize};

use stockyard_core::{ProductId, SlotCode};

/// One physical storage slot.
///
/// `occupied_by` is a derived back-reference; it is written only by
/// [`crate::LocationGrid::recompute_occupancy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    code: SlotCode,
    capacity: f64,
    occupied_by: Option<ProductId>,
}

impl Slot {
    pub(crate) fn new(code: SlotCode, capacity: f64) -> Self {
        Self {
            code,
            capacity,
            occupied_by: None,
        }
    }

    pub fn code(&self) -> SlotCode {
        self.code
    }

    pub fn zone(&self) -> char {
        self.code.zone()
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn occupied_by(&self) -> Option<ProductId> {
        self.occupied_by
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied_by.is_some()
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<ProductId>) {
        self.occupied_by = occupant;
    }
}
