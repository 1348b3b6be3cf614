//! Payload slot of a graph node.
//!
//! A node referenced only as someone else's dependency exists before its
//! payload is known. The slot stays `Unset` until `register` fills it in
//! place; it is never emptied again.

/// Payload that is either known or still pending registration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot<V> {
    /// Placeholder created by a forward reference
    Unset,
    /// Caller-supplied payload
    Set(V),
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Slot::Unset
    }
}

impl<V> Slot<V> {
    /// Check if a payload has been supplied
    pub fn is_set(&self) -> bool {
        matches!(self, Slot::Set(_))
    }

    /// Check if this slot is still a placeholder
    pub fn is_unset(&self) -> bool {
        matches!(self, Slot::Unset)
    }

    /// Borrow the payload, if any
    pub fn as_set(&self) -> Option<&V> {
        match self {
            Slot::Set(value) => Some(value),
            Slot::Unset => None,
        }
    }

    /// Store a payload, returning the one it replaced
    pub fn fill(&mut self, value: V) -> Option<V> {
        match std::mem::replace(self, Slot::Set(value)) {
            Slot::Set(previous) => Some(previous),
            Slot::Unset => None,
        }
    }

    pub fn into_option(self) -> Option<V> {
        match self {
            Slot::Set(value) => Some(value),
            Slot::Unset => None,
        }
    }
}

impl<V> From<Option<V>> for Slot<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(value) => Slot::Set(value),
            None => Slot::Unset,
        }
    }
}
