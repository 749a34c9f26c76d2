mod common;

use std::collections::VecDeque;

use common::*;
use lst_rpc::codec::{compact_binary, verbose};
use lst_rpc::{Record, SinkFn, SyncError, SyncOptions, SyncSession};
use lst_tree::tree::MethodDeclaration;
use lst_tree::{NodeId, J};

/// Sends `tree` from `from` to `to` through the CBOR compact codec, in
/// batches, and returns the received tree.
fn exchange(from: &mut SyncSession, to: &mut SyncSession, tree: &J) -> Option<J> {
    init_tracing();
    let mut wire: Vec<Vec<u8>> = Vec::new();
    from.send_tree(
        tree,
        SinkFn(|batch: Vec<Record>| -> Result<(), SyncError> {
            wire.push(compact_binary::encode(&batch)?);
            Ok(())
        }),
    )
    .unwrap();
    let batches: VecDeque<Vec<Record>> = wire
        .iter()
        .map(|bytes| compact_binary::decode(bytes).unwrap())
        .collect();
    to.receive_tree(*tree.id(), batches).unwrap()
}

#[test]
fn repeated_exchanges_use_cached_baselines() {
    let mut host = SyncSession::new(SyncOptions::default().with_batch_size(4));
    let mut remote = SyncSession::new(SyncOptions::default());

    let t1 = method_returning(host.arena(), 1);
    let r1 = exchange(&mut host, &mut remote, &t1).unwrap();
    assert_eq!(r1, t1);
    assert!(remote.baseline(t1.id()).unwrap().ptr_eq(&r1));

    let t2 = with_return_value(&t1, 2);
    let mut sink = Vec::new();
    let stats = host.send_tree(&t2, &mut sink).unwrap();
    assert_eq!(stats.values, 7);
    assert_eq!(stats.total(), sink.len());

    let r2 = remote
        .receive_tree(*t2.id(), VecDeque::from(vec![sink]))
        .unwrap()
        .unwrap();
    assert_eq!(r2, t2);
    let d1 = r1.downcast::<MethodDeclaration>().unwrap();
    let d2 = r2.downcast::<MethodDeclaration>().unwrap();
    assert!(d2.name.ptr_eq(&d1.name));
}

#[test]
fn trees_flow_back_to_the_host() {
    let mut host = SyncSession::new(SyncOptions::default());
    let mut remote = SyncSession::new(SyncOptions::default().with_batch_size(2));

    let t1 = method_returning(host.arena(), 1);
    let r1 = exchange(&mut host, &mut remote, &t1).unwrap();

    // The remote edits its copy and sends it back.
    let edited = with_return_value(&r1, 5);
    let back = exchange(&mut remote, &mut host, &edited).unwrap();
    assert_eq!(back, edited);
    let h = back.downcast::<MethodDeclaration>().unwrap();
    let orig = t1.downcast::<MethodDeclaration>().unwrap();
    assert!(h.modifiers[0].ptr_eq(&orig.modifiers[0]));
}

#[test]
fn failed_exchange_keeps_the_old_baseline() {
    let mut host = SyncSession::new(SyncOptions::default());
    let mut remote = SyncSession::new(SyncOptions::default());
    let t1 = method_returning(host.arena(), 1);
    let r1 = exchange(&mut host, &mut remote, &t1).unwrap();

    let t2 = with_return_value(&t1, 2);
    let mut sink = Vec::new();
    host.send_tree(&t2, &mut sink).unwrap();
    sink.truncate(5);

    let err = remote
        .receive_tree(*t2.id(), VecDeque::from(vec![sink]))
        .unwrap_err();
    assert!(matches!(err, SyncError::Truncated));
    assert!(remote.baseline(t1.id()).unwrap().ptr_eq(&r1));
}

#[test]
fn receiving_none_forgets_the_tree() {
    let mut host = SyncSession::new(SyncOptions::default());
    let mut remote = SyncSession::new(SyncOptions::default());
    let t1 = method_returning(host.arena(), 1);
    exchange(&mut host, &mut remote, &t1).unwrap();
    assert_eq!(remote.len(), 1);

    let gone = remote
        .receive_tree(*t1.id(), VecDeque::from(vec![vec![Record::Absent]]))
        .unwrap();
    assert!(gone.is_none());
    assert!(remote.is_empty());
    assert!(host.forget(t1.id()).is_some());
}

#[test]
fn verbose_lines_carry_a_whole_exchange() {
    let mut host = SyncSession::new(SyncOptions::default());
    let mut remote = SyncSession::new(SyncOptions::default());
    let tree = compilation_unit(host.arena());

    let mut sink = Vec::new();
    host.send_tree(&tree, &mut sink).unwrap();
    let text = verbose::to_lines(&sink).unwrap();
    let records = verbose::from_lines(&text).unwrap();
    let received = remote
        .receive_tree(*tree.id(), records.into_iter())
        .unwrap();
    assert_eq!(received, Some(tree));
}

#[test]
fn replaced_root_is_cached_under_its_new_id() {
    let mut host = SyncSession::new(SyncOptions::default());
    let mut remote = SyncSession::new(SyncOptions::default());
    let t1 = method_returning(host.arena(), 1);
    exchange(&mut host, &mut remote, &t1).unwrap();

    // Same method under a fresh root node.
    let decl = t1.downcast::<MethodDeclaration>().unwrap();
    let t2: J = MethodDeclaration {
        id: NodeId::random(),
        ..decl.clone()
    }
    .into();
    let mut sink = Vec::new();
    host.send_tree(&t2, &mut sink).unwrap();
    let r2 = remote
        .receive_tree(*t1.id(), VecDeque::from(vec![sink]))
        .unwrap()
        .unwrap();
    assert_eq!(r2, t2);
    assert!(remote.baseline(t1.id()).is_none());
    assert!(remote.baseline(t2.id()).unwrap().ptr_eq(&r2));

    // The next incremental exchange finds the baseline on both ends.
    let t3 = with_return_value(&t2, 3);
    let r3 = exchange(&mut host, &mut remote, &t3).unwrap();
    assert_eq!(r3, t3);
}
