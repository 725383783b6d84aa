//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity; two values with the same attributes are
/// interchangeable. [`crate::SlotCode`] is the main one in this workspace.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
