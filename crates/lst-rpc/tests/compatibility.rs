mod common;

use std::io;
use std::sync::{Arc, Mutex};

use common::*;
use lst_rpc::{decode, encode, Payload, Record};
use lst_tree::tree::{Annotation, Identifier, Modifier, ModifierType};
use lst_tree::{Kind, Markers, NodeId, Space, TypeArena, J};
use serde_json::json;

fn extension(keyword: &str) -> J {
    Modifier {
        id: NodeId::random(),
        prefix: Space::empty(),
        markers: Markers::empty(),
        keyword: Some(keyword.into()),
        kind: ModifierType::LanguageExtension,
        annotations: Vec::new(),
    }
    .into()
}

fn receive_modifier(records: Vec<Record>) -> Modifier {
    let decoded = decode(records, None, &mut TypeArena::new())
        .unwrap()
        .unwrap();
    decoded.downcast::<Modifier>().unwrap().clone()
}

#[test]
fn extension_keyword_maps_to_known_concept() {
    let arena = TypeArena::new();
    let records = encode(Some(&extension("sealed")), None, &arena).unwrap();
    let m = receive_modifier(records);
    assert_eq!(m.kind, ModifierType::Sealed);
    assert_eq!(m.keyword.as_deref(), Some("sealed"));
}

#[test]
fn unmappable_keyword_is_kept_verbatim() {
    let arena = TypeArena::new();
    let records = encode(Some(&extension("suspend")), None, &arena).unwrap();
    let m = receive_modifier(records);
    assert_eq!(m.kind, ModifierType::LanguageExtension);
    assert_eq!(m.keyword.as_deref(), Some("suspend"));
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Runs `f` with warnings written to a buffer and returns them.
fn warnings_during<T>(f: impl FnOnce() -> T) -> (T, String) {
    let out = Captured::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, out.text())
}

#[test]
fn only_the_receiver_warns_about_unmappable_keywords() {
    let arena = TypeArena::new();
    let (records, sent) =
        warnings_during(|| encode(Some(&extension("suspend")), None, &arena).unwrap());
    assert!(!sent.contains("no modifier concept"), "{sent}");

    let (m, received) = warnings_during(|| receive_modifier(records));
    assert_eq!(m.kind, ModifierType::LanguageExtension);
    assert!(received.contains("no modifier concept"), "{received}");
}

#[test]
fn sender_keeps_extension_kind_on_the_wire() {
    let arena = TypeArena::new();
    let records = encode(Some(&extension("sealed")), None, &arena).unwrap();
    assert!(records.contains(&Record::Value(Payload::Scalar {
        value: json!("LanguageExtension"),
    })));
}

#[test]
fn unknown_modifier_tag_degrades_to_extension() {
    let arena = TypeArena::new();
    let mut records = encode(Some(&extension("companion")), None, &arena).unwrap();
    let tag = records
        .iter()
        .position(|r| {
            *r == Record::Value(Payload::Scalar {
                value: json!("LanguageExtension"),
            })
        })
        .unwrap();
    records[tag] = Record::Value(Payload::Scalar {
        value: json!("Companion"),
    });
    let m = receive_modifier(records);
    assert_eq!(m.kind, ModifierType::LanguageExtension);
    assert_eq!(m.keyword.as_deref(), Some("companion"));
}

#[test]
fn sender_writes_absent_for_dropped_fields() {
    let arena = TypeArena::new();
    let records = encode(Some(&ident("x")), None, &arena).unwrap();
    let absents = records.iter().filter(|r| **r == Record::Absent).count();
    // Annotations, type and field type.
    assert_eq!(absents, 3);
}

/// A peer that models identifier annotations and field types sends them;
/// they are read and dropped.
#[test]
fn receiver_drops_identifier_annotations_and_field_type() {
    let arena = TypeArena::new();
    let name = ident("x");
    let mut records = encode(Some(&name), None, &arena).unwrap();

    let annotation: J = Annotation {
        id: NodeId::random(),
        prefix: Space::empty(),
        markers: Markers::empty(),
        annotation_type: ident("Nullable"),
        arguments: None,
    }
    .into();

    // Field type is the last step.
    let field_type = records.len() - 1;
    assert_eq!(records[field_type], Record::Absent);
    records.truncate(field_type);
    records.push(Record::Value(Payload::Type {
        slot: 0,
        kind: Some(lst_tree::TypeKind::Primitive),
    }));
    records.push(Record::Value(Payload::Scalar { value: json!("int") }));

    // Annotations are the first step after id, prefix and markers.
    let annotations = records.iter().position(|r| *r == Record::Absent).unwrap();
    let mut spliced = records[..annotations].to_vec();
    spliced.push(Record::Value(Payload::List {
        positions: vec![None],
    }));
    spliced.extend(encode(Some(&annotation), None, &arena).unwrap());
    spliced.extend_from_slice(&records[annotations + 1..]);
    assert!(spliced.contains(&Record::Value(Payload::Node {
        kind: Kind::Annotation
    })));

    let decoded = decode(spliced, None, &mut TypeArena::new())
        .unwrap()
        .unwrap();
    assert_eq!(decoded, name);
    assert_eq!(decoded.downcast::<Identifier>().unwrap().ty, None);
}

#[test]
fn receiver_tolerates_no_change_for_dropped_fields() {
    let arena = TypeArena::new();
    let name = ident("x");
    let mut records = encode(Some(&name), None, &arena).unwrap();
    let last = records.len() - 1;
    records[last] = Record::NoChange;
    let decoded = decode(records, None, &mut TypeArena::new())
        .unwrap()
        .unwrap();
    assert_eq!(decoded, name);
}
