//! Field-level synchronization.
//!
//! Every step of the traversal contract is a field of some type `T: Field`.
//! Handlers are written once over a [`Side`] and receive the field twice: the
//! value being sent (`after`, only ever `Some` on the sending side) and the
//! baseline the peer already holds (`before`). Both sides return the value the
//! field ends up with, so a handler can build its node the same way whichever
//! direction it runs in.
//!
//! On the sending side each field becomes one record:
//! - `ABSENT` when there is no value,
//! - `NO_CHANGE` when the value is [`same`](Field::same) as the baseline,
//! - `VALUE` otherwise, followed by the nested steps of that value, each
//!   compared against the matching part of the baseline.

use indexmap::IndexMap;
use lst_tree::markers::Marker;
use lst_tree::space::Comment;
use lst_tree::tree::{
    AssignmentOperator, BinaryOperator, CaseKind, LiteralValue, ModifierType, UnaryOperator,
    WildcardBound,
};
use lst_tree::types::{ClassKind, ElementValue, Variance};
use lst_tree::{
    Container, LeftPadded, Markers, NodeId, PrimitiveKind, RightPadded, Space, TypeHandle, J,
};

use crate::context::PendingStack;
use crate::contract;
use crate::error::SyncError;
use crate::record::{unexpected, Payload};

/// One direction of an exchange.
pub trait Side: Sized {
    /// Synchronizes a value announced by a [`Payload`].
    fn value<T: Value>(
        &mut self,
        after: Option<&T>,
        before: Option<&T>,
    ) -> Result<Option<T>, SyncError>;

    /// Synchronizes a reference into the type graph.
    fn type_ref(
        &mut self,
        after: Option<TypeHandle>,
        before: Option<TypeHandle>,
    ) -> Result<Option<TypeHandle>, SyncError>;

    /// A step this side's model has no room for. The sending side writes
    /// `ABSENT`; the receiving side reads whatever the peer wrote and drops it.
    fn discard<T: Field>(&mut self, what: &'static str) -> Result<(), SyncError>;

    fn pending(&mut self) -> &mut PendingStack;

    fn field<T: Field>(
        &mut self,
        after: Option<&T>,
        before: Option<&T>,
    ) -> Result<Option<T>, SyncError> {
        T::sync(self, after, before)
    }

    /// A field that must end up with a value.
    fn required<T: Field>(&mut self, after: Option<&T>, before: Option<&T>) -> Result<T, SyncError> {
        self.field(after, before)?.ok_or(SyncError::MissingValue)
    }
}

pub trait Field: Clone {
    /// The cheap "unchanged" test.
    fn same(&self, other: &Self) -> bool;

    /// Identity used to line up list elements with their baseline.
    fn key(&self) -> Option<NodeId> {
        None
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError>;
}

/// A field whose `VALUE` record carries a [`Payload`].
pub trait Value: Field {
    fn payload(&self, before: Option<&Self>) -> Result<Payload, SyncError>;

    /// Steps that follow the payload. `after` is `None` on the receiving side.
    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError>;
}

// ── Scalars ────────────────────────────────────────────────────────────────

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }

                fn sync<S: Side>(
                    side: &mut S,
                    after: Option<&Self>,
                    before: Option<&Self>,
                ) -> Result<Option<Self>, SyncError> {
                    side.value(after, before)
                }
            }

            impl Value for $ty {
                fn payload(&self, _before: Option<&Self>) -> Result<Payload, SyncError> {
                    Ok(Payload::Scalar {
                        value: serde_json::to_value(self)?,
                    })
                }

                fn walk<S: Side>(
                    _side: &mut S,
                    payload: Payload,
                    after: Option<&Self>,
                    _before: Option<&Self>,
                ) -> Result<Self, SyncError> {
                    match after {
                        Some(a) => Ok(a.clone()),
                        None => payload.into_scalar(),
                    }
                }
            }
        )*
    };
}

scalar!(
    String,
    bool,
    u64,
    NodeId,
    Comment,
    Marker,
    LiteralValue,
    BinaryOperator,
    AssignmentOperator,
    UnaryOperator,
    CaseKind,
    WildcardBound,
    ModifierType,
    PrimitiveKind,
    ClassKind,
    Variance,
    ElementValue,
);

// ── Nodes ──────────────────────────────────────────────────────────────────

impl Field for J {
    fn same(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }

    fn key(&self) -> Option<NodeId> {
        Some(*self.id())
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.value(after, before)
    }
}

impl Value for J {
    fn payload(&self, _before: Option<&Self>) -> Result<Payload, SyncError> {
        Ok(Payload::Node { kind: self.kind() })
    }

    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError> {
        match payload {
            Payload::Node { kind } => contract::visit(side, kind, after, before),
            other => Err(unexpected("node", &other)),
        }
    }
}

// ── Formatting ─────────────────────────────────────────────────────────────

fn expect_nested(payload: Payload) -> Result<(), SyncError> {
    match payload {
        Payload::Nested => Ok(()),
        other => Err(unexpected("nested", &other)),
    }
}

impl Field for Space {
    fn same(&self, other: &Self) -> bool {
        self == other
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.value(after, before)
    }
}

impl Value for Space {
    fn payload(&self, _before: Option<&Self>) -> Result<Payload, SyncError> {
        Ok(Payload::Nested)
    }

    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError> {
        expect_nested(payload)?;
        let whitespace =
            side.required(after.map(|s| &s.whitespace), before.map(|s| &s.whitespace))?;
        let comments = side.required(after.map(|s| &s.comments), before.map(|s| &s.comments))?;
        Ok(Space {
            whitespace,
            comments,
        })
    }
}

impl Field for Markers {
    fn same(&self, other: &Self) -> bool {
        self == other
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.value(after, before)
    }
}

impl Value for Markers {
    fn payload(&self, _before: Option<&Self>) -> Result<Payload, SyncError> {
        Ok(Payload::Nested)
    }

    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError> {
        expect_nested(payload)?;
        let id = side.required(after.map(|m| &m.id), before.map(|m| &m.id))?;
        let markers = side.required(after.map(|m| &m.markers), before.map(|m| &m.markers))?;
        Ok(Markers { id, markers })
    }
}

// ── Padding ────────────────────────────────────────────────────────────────

impl<T: Field> Field for RightPadded<T> {
    fn same(&self, other: &Self) -> bool {
        self.element.same(&other.element)
            && self.after == other.after
            && self.markers == other.markers
    }

    fn key(&self) -> Option<NodeId> {
        self.element.key()
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.value(after, before)
    }
}

impl<T: Field> Value for RightPadded<T> {
    fn payload(&self, _before: Option<&Self>) -> Result<Payload, SyncError> {
        Ok(Payload::Nested)
    }

    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError> {
        expect_nested(payload)?;
        let element = side.required(after.map(|p| &p.element), before.map(|p| &p.element))?;
        let space = side.required(after.map(|p| &p.after), before.map(|p| &p.after))?;
        let markers = side.required(after.map(|p| &p.markers), before.map(|p| &p.markers))?;
        Ok(RightPadded {
            element,
            after: space,
            markers,
        })
    }
}

impl<T: Field> Field for LeftPadded<T> {
    fn same(&self, other: &Self) -> bool {
        self.before == other.before && self.element.same(&other.element)
    }

    fn key(&self) -> Option<NodeId> {
        self.element.key()
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.value(after, before)
    }
}

impl<T: Field> Value for LeftPadded<T> {
    fn payload(&self, _before: Option<&Self>) -> Result<Payload, SyncError> {
        Ok(Payload::Nested)
    }

    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError> {
        expect_nested(payload)?;
        let space = side.required(after.map(|p| &p.before), before.map(|p| &p.before))?;
        let element = side.required(after.map(|p| &p.element), before.map(|p| &p.element))?;
        Ok(LeftPadded {
            before: space,
            element,
        })
    }
}

impl<T: Field> Field for Container<T> {
    fn same(&self, other: &Self) -> bool {
        self.before == other.before
            && self.markers == other.markers
            && self.elements.same(&other.elements)
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.value(after, before)
    }
}

impl<T: Field> Value for Container<T> {
    fn payload(&self, _before: Option<&Self>) -> Result<Payload, SyncError> {
        Ok(Payload::Nested)
    }

    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError> {
        expect_nested(payload)?;
        let space = side.required(after.map(|c| &c.before), before.map(|c| &c.before))?;
        let elements = side.required(after.map(|c| &c.elements), before.map(|c| &c.elements))?;
        let markers = side.required(after.map(|c| &c.markers), before.map(|c| &c.markers))?;
        Ok(Container {
            before: space,
            elements,
            markers,
        })
    }
}

// ── Lists ──────────────────────────────────────────────────────────────────

impl<T: Field> Field for Vec<T> {
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same(b))
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.value(after, before)
    }
}

impl<T: Field> Value for Vec<T> {
    /// Elements with a key are matched to the baseline element with the same
    /// key wherever it moved; the rest are matched by index.
    fn payload(&self, before: Option<&Self>) -> Result<Payload, SyncError> {
        let before: &[T] = before.map_or(&[], Vec::as_slice);
        let mut keyed: IndexMap<NodeId, usize> = IndexMap::with_capacity(before.len());
        for (i, b) in before.iter().enumerate() {
            if let Some(key) = b.key() {
                keyed.entry(key).or_insert(i);
            }
        }
        let positions = self
            .iter()
            .enumerate()
            .map(|(i, element)| {
                let found = match element.key() {
                    Some(key) => keyed.get(&key).copied(),
                    None => (i < before.len()).then_some(i),
                };
                found.map(|p| p as u32)
            })
            .collect();
        Ok(Payload::List { positions })
    }

    fn walk<S: Side>(
        side: &mut S,
        payload: Payload,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Self, SyncError> {
        let positions = match payload {
            Payload::List { positions } => positions,
            other => return Err(unexpected("list", &other)),
        };
        let mut out = Vec::with_capacity(positions.len());
        for (i, position) in positions.into_iter().enumerate() {
            let baseline = position.and_then(|p| before.and_then(|b| b.get(p as usize)));
            out.push(side.required(after.and_then(|a| a.get(i)), baseline)?);
        }
        Ok(out)
    }
}

// ── Types ──────────────────────────────────────────────────────────────────

impl Field for TypeHandle {
    fn same(&self, other: &Self) -> bool {
        self == other
    }

    fn sync<S: Side>(
        side: &mut S,
        after: Option<&Self>,
        before: Option<&Self>,
    ) -> Result<Option<Self>, SyncError> {
        side.type_ref(after.copied(), before.copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lst_tree::tree::Identifier;

    fn names(n: usize) -> Vec<J> {
        (0..n)
            .map(|i| Identifier::build(format!("v{i}"), None).into())
            .collect()
    }

    #[test]
    fn keyed_elements_follow_their_baseline_position() {
        let before = names(4);
        let mut after = before.clone();
        after.reverse();
        after.push(Identifier::build("fresh", None).into());

        let Payload::List { positions } = after.payload(Some(&before)).unwrap() else {
            panic!("not a list");
        };
        assert_eq!(positions, vec![Some(3), Some(2), Some(1), Some(0), None]);
    }

    #[test]
    fn unkeyed_elements_match_by_index() {
        let before = vec!["a".to_owned(), "b".to_owned()];
        let after = vec!["b".to_owned(), "c".to_owned(), "d".to_owned()];
        let Payload::List { positions } = after.payload(Some(&before)).unwrap() else {
            panic!("not a list");
        };
        assert_eq!(positions, vec![Some(0), Some(1), None]);
    }

    #[test]
    fn long_reversed_lists_are_matched_in_one_pass() {
        let before = names(50_000);
        let mut after = before.clone();
        after.reverse();
        let Payload::List { positions } = after.payload(Some(&before)).unwrap() else {
            panic!("not a list");
        };
        assert_eq!(positions.first(), Some(&Some(49_999)));
        assert_eq!(positions.last(), Some(&Some(0)));
    }
}
