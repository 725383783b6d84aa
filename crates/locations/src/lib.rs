//! Storage location grid.
//!
//! The grid owns its slots for the process lifetime. Which product sits in a
//! slot is never stored independently: it is re-derived from the products'
//! locations by [`LocationGrid::recompute_occupancy`].

pub mod grid;
pub mod slot;

pub use grid::{Collision, LocationGrid, OccupancyReport};
pub use slot::Slot;
