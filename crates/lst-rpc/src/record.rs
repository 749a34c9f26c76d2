//! The operation stream.
//!
//! A stream is a flat sequence of [`Record`]s in depth-first field order.
//! Records carry no field names or lengths; both ends know what comes next
//! from the traversal contract alone.

use lst_tree::{Kind, TypeKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Record {
    /// The field has no value.
    Absent,
    /// The field equals the baseline; nothing nested follows.
    NoChange,
    Value(Payload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Payload {
    /// A leaf value, complete in itself.
    Scalar { value: serde_json::Value },
    /// A node of the given kind; its steps follow.
    Node { kind: Kind },
    /// A `Space`, `Markers` or padding wrapper; its steps follow.
    Nested,
    /// One element step per position follows. A position is the index of the
    /// baseline element the new element is compared against.
    List { positions: Vec<Option<u32>> },
    /// A type graph reference. `kind` is set on the first transmission of a
    /// slot and its content steps follow; back-references carry only the slot.
    Type { slot: u32, kind: Option<TypeKind> },
}

impl Record {
    pub fn scalar<T: Serialize>(value: &T) -> Result<Self, SyncError> {
        Ok(Record::Value(Payload::Scalar {
            value: serde_json::to_value(value)?,
        }))
    }

    /// Short form used in error messages and traces.
    pub fn describe(&self) -> String {
        match self {
            Record::Absent => "ABSENT".to_owned(),
            Record::NoChange => "NO_CHANGE".to_owned(),
            Record::Value(payload) => format!("VALUE({})", payload.describe()),
        }
    }
}

impl Payload {
    pub fn describe(&self) -> String {
        match self {
            Payload::Scalar { value } => format!("scalar {value}"),
            Payload::Node { kind } => format!("node {kind}"),
            Payload::Nested => "nested".to_owned(),
            Payload::List { positions } => format!("list of {}", positions.len()),
            Payload::Type { slot, kind: Some(kind) } => format!("type {} #{slot}", kind.name()),
            Payload::Type { slot, kind: None } => format!("type ref #{slot}"),
        }
    }

    pub fn into_scalar<T: DeserializeOwned>(self) -> Result<T, SyncError> {
        match self {
            Payload::Scalar { value } => Ok(serde_json::from_value(value)?),
            other => Err(unexpected("scalar", &other)),
        }
    }
}

pub(crate) fn unexpected(expected: &'static str, found: &Payload) -> SyncError {
    SyncError::UnexpectedRecord {
        expected,
        found: found.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verbose_shape() {
        let r = Record::Value(Payload::Node { kind: Kind::Block });
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"state": "VALUE", "payload": {"type": "node", "kind": "Block"}})
        );
        assert_eq!(
            serde_json::to_value(Record::NoChange).unwrap(),
            json!({"state": "NO_CHANGE"})
        );
    }

    #[test]
    fn scalar_payload_reads_back() {
        let r = Record::scalar(&"x".to_owned()).unwrap();
        let Record::Value(p) = r else { panic!("not a value") };
        assert_eq!(p.into_scalar::<String>().unwrap(), "x");
    }

    #[test]
    fn wrong_payload_is_unexpected() {
        let err = Payload::Nested.into_scalar::<String>().unwrap_err();
        assert!(matches!(err, SyncError::UnexpectedRecord { expected: "scalar", .. }));
    }
}
