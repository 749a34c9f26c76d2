//! Stable node identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned to a node when it is created.
///
/// Ids are globally unique and never reused; a node keeps its id across
/// every version of the tree that still contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Generates a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero id used by empty marker sets.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::random()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(NodeId::random(), NodeId::random());
    }

    #[test]
    fn nil_is_nil() {
        assert!(NodeId::nil().is_nil());
        assert!(!NodeId::random().is_nil());
    }

    #[test]
    fn serializes_as_plain_uuid_string() {
        let id = NodeId::random();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.0.to_string()));
    }
}
