//! Error types for the sync protocol and its wire codecs.

use lst_tree::{Kind, TypeError};
use thiserror::Error;

/// Terminal failure of one exchange.
///
/// Every variant aborts the exchange it occurred in; nothing here is retried
/// and no partial tree is handed to the caller.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("record stream ended before the tree was complete")]
    Truncated,
    #[error("expected {expected}, found {found}")]
    UnexpectedRecord {
        expected: &'static str,
        found: String,
    },
    #[error("required field was ABSENT")]
    MissingValue,
    #[error("NO_CHANGE for a field with no baseline value")]
    MissingBaseline,
    #[error("node kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: Kind, found: Kind },
    #[error("type slot {0} does not match the slot table")]
    UnknownTypeSlot(u32),
    #[error("pending-node stack underflow")]
    PendingUnderflow,
    #[error("invalid scalar payload: {0}")]
    InvalidScalar(#[from] serde_json::Error),
    #[error("{0} records left over after the tree was complete")]
    TrailingRecords(usize),
    #[error("type graph: {0}")]
    Type(#[from] TypeError),
    #[error("codec: {0}")]
    Codec(#[from] CodecError),
    #[error("record sink failed: {0}")]
    Sink(String),
    #[error("record source failed: {0}")]
    Source(String),
}

impl SyncError {
    /// Whether the failure signals version skew between the two peers rather
    /// than a broken stream.
    pub fn is_compatibility(&self) -> bool {
        matches!(
            self,
            SyncError::Codec(CodecError::UnknownKind(_) | CodecError::UnknownTypeKind(_))
                | SyncError::Type(TypeError::UnknownKind(_) | TypeError::UnknownPrimitive(_))
        )
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid cbor payload: {0}")]
    Cbor(String),
    #[error("unknown node kind: {0}")]
    UnknownKind(String),
    #[error("unknown type kind: {0}")]
    UnknownTypeKind(String),
    #[error("malformed record: {0}")]
    Malformed(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_errors_are_classified() {
        assert!(SyncError::from(CodecError::UnknownKind("Goto".into())).is_compatibility());
        assert!(SyncError::from(TypeError::UnknownPrimitive("u128".into())).is_compatibility());
        assert!(!SyncError::Truncated.is_compatibility());
        assert!(!SyncError::from(CodecError::Malformed("empty record")).is_compatibility());
    }
}
