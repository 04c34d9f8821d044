// Shared entity plumbing
//
// Every server-identified record (games, users, orders, friend requests) is a
// partial projection: a record holds whichever attributes the last request
// asked for. Merging is additive, so an attribute never disappears once seen.

// Public API - what other modules can use
pub use handle::EntityRef;
pub use id::EntityId;

// Internal modules
mod handle;
mod id;

/// A server entity with a growable attribute set
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in logs and errors
    const KIND: &'static str;

    fn id(&self) -> &EntityId;

    /// Merges `data` into `self`.
    ///
    /// Attributes present in `data` overwrite; absent attributes are kept.
    /// Collection attributes are replaced as a whole.
    fn merge(&mut self, data: Self);

    /// Whether the attribute named on the wire (camelCase) is present
    fn has_attribute(&self, attribute: &str) -> bool;

    fn has_attributes(&self, attributes: &[String]) -> bool {
        attributes
            .iter()
            .all(|attribute| self.has_attribute(attribute))
    }
}

/// Overwrites `slot` only when `value` carries something
pub(crate) fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
