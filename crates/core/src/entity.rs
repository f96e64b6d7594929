//! Entity trait: catalog records that keep their identity across renders.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if the upstream payload carried one.
    fn id(&self) -> Option<&Self::Id>;
}
