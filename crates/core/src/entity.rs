//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stores reconcile server responses into local collections by identity,
/// so anything kept in a store must expose its identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
