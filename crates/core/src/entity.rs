//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Products, documents and inventory checks are entities: two records with the
/// same id are the same record, whatever their current attributes.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Find an entity by id in an ordered collection.
pub fn find_by_id<T: Entity>(items: &[T], id: T::Id) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}
