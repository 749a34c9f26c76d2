//! Compact record codec.
//!
//! Each record is a JSON array whose first element is the state:
//!
//! | Record                     | Form                         |
//! |----------------------------|------------------------------|
//! | `ABSENT`                   | `[0]`                        |
//! | `NO_CHANGE`                | `[1]`                        |
//! | scalar                     | `[2, 0, value]`              |
//! | node                       | `[2, 1, "Kind"]`             |
//! | nested                     | `[2, 2]`                     |
//! | list                       | `[2, 3, [pos \| null, ...]]` |
//! | type                       | `[2, 4, slot, "Kind" \| null]` |

use lst_tree::{Kind, TypeKind};
use serde_json::Value;

use crate::error::CodecError;
use crate::record::{Payload, Record};

const ABSENT: u64 = 0;
const NO_CHANGE: u64 = 1;
const VALUE: u64 = 2;

const SCALAR: u64 = 0;
const NODE: u64 = 1;
const NESTED: u64 = 2;
const LIST: u64 = 3;
const TYPE: u64 = 4;

pub fn encode(records: &[Record]) -> Value {
    Value::Array(records.iter().map(encode_record).collect())
}

pub fn decode(value: &Value) -> Result<Vec<Record>, CodecError> {
    value
        .as_array()
        .ok_or(CodecError::Malformed("batch must be an array"))?
        .iter()
        .map(decode_record)
        .collect()
}

fn encode_record(record: &Record) -> Value {
    match record {
        Record::Absent => Value::Array(vec![ABSENT.into()]),
        Record::NoChange => Value::Array(vec![NO_CHANGE.into()]),
        Record::Value(payload) => {
            let mut out = vec![Value::from(VALUE)];
            match payload {
                Payload::Scalar { value } => {
                    out.push(SCALAR.into());
                    out.push(value.clone());
                }
                Payload::Node { kind } => {
                    out.push(NODE.into());
                    out.push(kind.name().into());
                }
                Payload::Nested => out.push(NESTED.into()),
                Payload::List { positions } => {
                    out.push(LIST.into());
                    out.push(Value::Array(
                        positions
                            .iter()
                            .map(|p| p.map_or(Value::Null, Value::from))
                            .collect(),
                    ));
                }
                Payload::Type { slot, kind } => {
                    out.push(TYPE.into());
                    out.push((*slot).into());
                    out.push(kind.map_or(Value::Null, |k| k.name().into()));
                }
            }
            Value::Array(out)
        }
    }
}

fn decode_record(value: &Value) -> Result<Record, CodecError> {
    let arr = value
        .as_array()
        .ok_or(CodecError::Malformed("record must be an array"))?;
    let state = arr
        .first()
        .and_then(Value::as_u64)
        .ok_or(CodecError::Malformed("missing record state"))?;
    match state {
        ABSENT => Ok(Record::Absent),
        NO_CHANGE => Ok(Record::NoChange),
        VALUE => decode_payload(&arr[1..]).map(Record::Value),
        _ => Err(CodecError::Malformed("unknown record state")),
    }
}

fn decode_payload(arr: &[Value]) -> Result<Payload, CodecError> {
    let tag = arr
        .first()
        .and_then(Value::as_u64)
        .ok_or(CodecError::Malformed("missing payload tag"))?;
    let arg = |i: usize| arr.get(i).ok_or(CodecError::Malformed("missing payload field"));
    match tag {
        SCALAR => Ok(Payload::Scalar {
            value: arg(1)?.clone(),
        }),
        NODE => {
            let name = arg(1)?
                .as_str()
                .ok_or(CodecError::Malformed("node kind must be a string"))?;
            let kind = name
                .parse::<Kind>()
                .map_err(|_| CodecError::UnknownKind(name.to_owned()))?;
            Ok(Payload::Node { kind })
        }
        NESTED => Ok(Payload::Nested),
        LIST => {
            let positions = arg(1)?
                .as_array()
                .ok_or(CodecError::Malformed("list positions must be an array"))?
                .iter()
                .map(|p| match p {
                    Value::Null => Ok(None),
                    other => other
                        .as_u64()
                        .and_then(|n| u32::try_from(n).ok())
                        .map(Some)
                        .ok_or(CodecError::Malformed("invalid list position")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Payload::List { positions })
        }
        TYPE => {
            let slot = arg(1)?
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(CodecError::Malformed("invalid type slot"))?;
            let kind = match arg(2)? {
                Value::Null => None,
                Value::String(name) => Some(
                    name.parse::<TypeKind>()
                        .map_err(|_| CodecError::UnknownTypeKind(name.clone()))?,
                ),
                _ => return Err(CodecError::Malformed("type kind must be a string")),
            };
            Ok(Payload::Type { slot, kind })
        }
        _ => Err(CodecError::Malformed("unknown payload tag")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positional_shapes() {
        let records = vec![
            Record::Absent,
            Record::NoChange,
            Record::Value(Payload::Scalar { value: json!("x") }),
            Record::Value(Payload::Node { kind: Kind::Block }),
            Record::Value(Payload::Nested),
            Record::Value(Payload::List {
                positions: vec![Some(1), None],
            }),
            Record::Value(Payload::Type {
                slot: 3,
                kind: None,
            }),
        ];
        let encoded = encode(&records);
        assert_eq!(
            encoded,
            json!([[0], [1], [2, 0, "x"], [2, 1, "Block"], [2, 2], [2, 3, [1, null]], [2, 4, 3, null]])
        );
        assert_eq!(decode(&encoded).unwrap(), records);
    }

    #[test]
    fn rejects_malformed_records() {
        assert!(matches!(decode(&json!([[]])), Err(CodecError::Malformed(_))));
        assert!(matches!(decode(&json!([[7]])), Err(CodecError::Malformed(_))));
        assert!(matches!(decode(&json!([[2, 1]])), Err(CodecError::Malformed(_))));
        assert!(matches!(
            decode(&json!([[2, 1, "Goto"]])),
            Err(CodecError::UnknownKind(_))
        ));
    }
}
