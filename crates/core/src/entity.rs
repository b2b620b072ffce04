//! Records with a stable identity.

/// A record that keeps its identity while its fields are edited.
///
/// Shop records are identified by a natural key rather than a generated id,
/// so `Id` is whatever tells a record apart from its siblings in a collection.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// True when this record is the one stored under `id`.
    fn is(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
