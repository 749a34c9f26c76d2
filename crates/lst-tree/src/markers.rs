//! Typed side-channel annotations attached to nodes.
//!
//! Markers are orthogonal to the grammar: recipes use them to flag search
//! results, attach warnings or remember formatting quirks. The set is ordered
//! and open: [`Marker::Generic`] carries any marker this crate does not model.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::space::Space;

/// Severity of a [`Marker::Markup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "marker")]
pub enum Marker {
    SearchResult {
        id: NodeId,
        description: Option<String>,
    },
    Markup {
        id: NodeId,
        level: MarkupLevel,
        message: String,
        detail: Option<String>,
    },
    /// Statement terminated by an explicit `;`.
    Semicolon { id: NodeId },
    TrailingComma { id: NodeId, suffix: Space },
    OmitParentheses { id: NodeId },
    /// Language or tool version the tree was produced for.
    Version { id: NodeId, version: String },
    Generic {
        id: NodeId,
        name: String,
        data: serde_json::Value,
    },
}

impl Marker {
    pub fn id(&self) -> &NodeId {
        match self {
            Marker::SearchResult { id, .. }
            | Marker::Markup { id, .. }
            | Marker::Semicolon { id }
            | Marker::TrailingComma { id, .. }
            | Marker::OmitParentheses { id }
            | Marker::Version { id, .. }
            | Marker::Generic { id, .. } => id,
        }
    }

    /// Stable name of the marker variant.
    pub fn name(&self) -> &str {
        match self {
            Marker::SearchResult { .. } => "SearchResult",
            Marker::Markup { .. } => "Markup",
            Marker::Semicolon { .. } => "Semicolon",
            Marker::TrailingComma { .. } => "TrailingComma",
            Marker::OmitParentheses { .. } => "OmitParentheses",
            Marker::Version { .. } => "Version",
            Marker::Generic { name, .. } => name,
        }
    }

    pub fn search_result(description: Option<String>) -> Self {
        Marker::SearchResult {
            id: NodeId::random(),
            description,
        }
    }
}

/// Ordered marker set of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Markers {
    pub id: NodeId,
    pub markers: Vec<Marker>,
}

impl Default for Markers {
    fn default() -> Self {
        Self::empty()
    }
}

impl Markers {
    /// The shared empty set. All empty sets carry the nil id so that they
    /// compare equal across independently built trees.
    pub fn empty() -> Self {
        Self {
            id: NodeId::nil(),
            markers: Vec::new(),
        }
    }

    pub fn build(markers: Vec<Marker>) -> Self {
        Self {
            id: NodeId::random(),
            markers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Returns a copy with `marker` appended, keeping existing order.
    pub fn add(&self, marker: Marker) -> Self {
        let mut markers = self.markers.clone();
        markers.push(marker);
        Self {
            id: if self.id.is_nil() { NodeId::random() } else { self.id },
            markers,
        }
    }

    /// First marker with the given variant name.
    pub fn find(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_order() {
        let markers = Markers::empty()
            .add(Marker::Semicolon { id: NodeId::random() })
            .add(Marker::search_result(Some("hit".into())));
        let names: Vec<_> = markers.markers.iter().map(Marker::name).collect();
        assert_eq!(names, ["Semicolon", "SearchResult"]);
        assert!(!markers.id.is_nil());
    }

    #[test]
    fn find_generic_by_name() {
        let markers = Markers::build(vec![Marker::Generic {
            id: NodeId::random(),
            name: "Autodetected".into(),
            data: serde_json::json!({"indent": 4}),
        }]);
        assert!(markers.find("Autodetected").is_some());
        assert!(markers.find("Semicolon").is_none());
    }

    #[test]
    fn marker_json_is_internally_tagged() {
        let m = Marker::OmitParentheses { id: NodeId::nil() };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["marker"], "OmitParentheses");
        let back: Marker = serde_json::from_value(v).unwrap();
        assert_eq!(back, m);
    }
}
