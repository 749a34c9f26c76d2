mod common;

use common::*;
use lst_rpc::codec::compact;
use lst_rpc::{decode, encode, Payload, ReceiveQueue, Receiver, Record, Side, SyncError};
use lst_tree::{Kind, TypeArena};
use serde_json::json;

#[test]
fn truncated_stream_is_fatal() {
    let arena = TypeArena::new();
    let tree = method_returning(&arena, 1);
    let mut records = encode(Some(&tree), None, &arena).unwrap();
    records.truncate(records.len() / 2);
    let err = decode(records, None, &mut TypeArena::new()).unwrap_err();
    assert!(matches!(err, SyncError::Truncated));
    assert!(!err.is_compatibility());
}

#[test]
fn abandoned_exchange_leaves_no_pending_frames() {
    let arena = TypeArena::new();
    let tree = compilation_unit(&arena);
    let mut records = encode(Some(&tree), None, &arena).unwrap();
    records.truncate(40);

    let mut remote = TypeArena::new();
    let mut receiver = Receiver::new(ReceiveQueue::new(records.into_iter()), &mut remote);
    assert!(receiver.receive(None).is_err());
    assert_eq!(receiver.pending().depth(), 0);
}

#[test]
fn trailing_records_are_rejected() {
    let arena = TypeArena::new();
    let tree = method_returning(&arena, 1);
    let mut records = encode(Some(&tree), None, &arena).unwrap();
    records.push(Record::Absent);
    records.push(Record::NoChange);
    let err = decode(records, None, &mut TypeArena::new()).unwrap_err();
    assert!(matches!(err, SyncError::TrailingRecords(2)));
}

#[test]
fn no_change_without_baseline_is_fatal() {
    let err = decode(vec![Record::NoChange], None, &mut TypeArena::new()).unwrap_err();
    assert!(matches!(err, SyncError::MissingBaseline));
}

#[test]
fn unknown_node_kind_is_a_compatibility_error() {
    let wire = json!([[2, 1, "Goto"], [1]]);
    let err: SyncError = compact::decode(&wire).unwrap_err().into();
    assert!(err.is_compatibility());
}

#[test]
fn step_order_mismatch_is_detected() {
    let arena = TypeArena::new();
    let mut records = encode(Some(&ident("x")), None, &arena).unwrap();
    // Announce a literal but follow with identifier steps: the literal's
    // required value lands on the identifier's first ABSENT.
    records[0] = Record::Value(Payload::Node {
        kind: Kind::Literal,
    });
    let err = decode(records, None, &mut TypeArena::new()).unwrap_err();
    assert!(matches!(err, SyncError::MissingValue));
}

#[test]
fn scalar_in_place_of_node_is_unexpected() {
    let records = vec![Record::Value(Payload::Scalar { value: json!(1) })];
    let err = decode(records, None, &mut TypeArena::new()).unwrap_err();
    assert!(matches!(
        err,
        SyncError::UnexpectedRecord {
            expected: "node",
            ..
        }
    ));
}

#[test]
fn malformed_scalar_is_reported() {
    let arena = TypeArena::new();
    let mut records = encode(Some(&ident("x")), None, &arena).unwrap();
    let name = records
        .iter()
        .position(|r| *r == Record::Value(Payload::Scalar { value: json!("x") }))
        .unwrap();
    records[name] = Record::Value(Payload::Scalar { value: json!(42) });
    let err = decode(records, None, &mut TypeArena::new()).unwrap_err();
    assert!(matches!(err, SyncError::InvalidScalar(_)));
}
