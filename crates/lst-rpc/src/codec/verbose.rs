//! Verbose record codec: `{"state": "VALUE", "payload": {...}}` objects.

use lst_tree::{Kind, TypeKind};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CodecError;
use crate::record::Record;

pub fn encode(records: &[Record]) -> Result<Value, CodecError> {
    Ok(serde_json::to_value(records)?)
}

pub fn decode(value: &Value) -> Result<Vec<Record>, CodecError> {
    let items = value
        .as_array()
        .ok_or(CodecError::Malformed("batch must be an array"))?;
    items.iter().map(decode_record).collect()
}

/// Newline-delimited form, one record per line.
pub fn to_lines(records: &[Record]) -> Result<String, CodecError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn from_lines(text: &str) -> Result<Vec<Record>, CodecError> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| decode_record(&serde_json::from_str(line)?))
        .collect()
}

fn decode_record(value: &Value) -> Result<Record, CodecError> {
    // Name unknown kinds explicitly; serde would only report an unknown variant.
    if let Some(payload) = value.get("payload") {
        match payload.get("type").and_then(Value::as_str) {
            Some("node") => {
                let kind = payload.get("kind").and_then(Value::as_str).unwrap_or("");
                kind.parse::<Kind>()
                    .map_err(|_| CodecError::UnknownKind(kind.to_owned()))?;
            }
            Some("type") => {
                if let Some(kind) = payload.get("kind").and_then(Value::as_str) {
                    kind.parse::<TypeKind>()
                        .map_err(|_| CodecError::UnknownTypeKind(kind.to_owned()))?;
                }
            }
            _ => {}
        }
    }
    Ok(Record::deserialize(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Payload;
    use serde_json::json;

    #[test]
    fn lines_round_trip() {
        let records = vec![
            Record::Value(Payload::Node { kind: Kind::Empty }),
            Record::NoChange,
            Record::Value(Payload::Type {
                slot: 0,
                kind: Some(TypeKind::Primitive),
            }),
            Record::Absent,
        ];
        let text = to_lines(&records).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(from_lines(&text).unwrap(), records);
    }

    #[test]
    fn unknown_kind_is_named() {
        let value = json!([{"state": "VALUE", "payload": {"type": "node", "kind": "Goto"}}]);
        assert!(matches!(decode(&value), Err(CodecError::UnknownKind(k)) if k == "Goto"));
    }

    #[test]
    fn unknown_type_kind_is_named() {
        let value = json!([{"state": "VALUE", "payload": {"type": "type", "slot": 0, "kind": "Union"}}]);
        assert!(matches!(decode(&value), Err(CodecError::UnknownTypeKind(k)) if k == "Union"));
    }
}
