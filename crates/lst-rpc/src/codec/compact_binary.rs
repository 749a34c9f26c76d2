//! Compact codec carried as CBOR.

use serde_json::Value;

use crate::error::CodecError;
use crate::record::Record;

pub fn encode(records: &[Record]) -> Result<Vec<u8>, CodecError> {
    let compact = super::compact::encode(records);
    let mut out = Vec::new();
    ciborium::ser::into_writer(&compact, &mut out).map_err(|e| CodecError::Cbor(e.to_string()))?;
    Ok(out)
}

pub fn decode(data: &[u8]) -> Result<Vec<Record>, CodecError> {
    let compact: Value =
        ciborium::de::from_reader(data).map_err(|e| CodecError::Cbor(e.to_string()))?;
    super::compact::decode(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Payload;
    use lst_tree::Kind;

    #[test]
    fn cbor_round_trip() {
        let records = vec![
            Record::Value(Payload::Node { kind: Kind::Literal }),
            Record::NoChange,
            Record::Value(Payload::Scalar {
                value: serde_json::json!({"type": "Int", "value": 2}),
            }),
        ];
        let bytes = encode(&records).unwrap();
        assert_eq!(decode(&bytes).unwrap(), records);
    }

    #[test]
    fn garbage_is_a_cbor_error() {
        assert!(matches!(decode(&[0xff, 0x00]), Err(CodecError::Cbor(_))));
    }
}
