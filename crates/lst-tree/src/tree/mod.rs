//! Syntax node kinds.
//!
//! [`J`] is a closed enum: every kind is a variant holding an `Arc` to an
//! immutable value record. A changed tree is a new value that shares every
//! unchanged child by reference, so `Arc::ptr_eq` (see [`J::ptr_eq`]) is the
//! cheap "unchanged" test.
//!
//! Adding a kind to [`tree_kinds!`] extends [`J`] and [`Kind`] together; every
//! exhaustive `match` over them then fails to compile until it handles the
//! new kind.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::NodeId;
use crate::markers::Markers;
use crate::space::Space;

/// Identity and leading formatting common to every node.
pub trait Tree {
    fn id(&self) -> &NodeId;
    fn prefix(&self) -> &Space;
    fn markers(&self) -> &Markers;
}

/// A concrete kind record that can be wrapped in, or viewed through, [`J`].
pub trait TreeNode: Tree + Sized {
    const KIND: Kind;

    fn from_j(j: &J) -> Option<&Self>;

    fn into_j(node: Arc<Self>) -> J;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node kind: {0}")]
pub struct UnknownKind(pub String);

macro_rules! impl_tree {
    ($($kind:ident),* $(,)?) => {
        $(
            impl $crate::tree::Tree for $kind {
                fn id(&self) -> &$crate::id::NodeId {
                    &self.id
                }

                fn prefix(&self) -> &$crate::space::Space {
                    &self.prefix
                }

                fn markers(&self) -> &$crate::markers::Markers {
                    &self.markers
                }
            }
        )*
    };
}

// Kind records live in these modules; they use `impl_tree!` above.
mod declarations;
mod expressions;
mod statements;
mod type_trees;
mod vocab;

pub use declarations::*;
pub use expressions::*;
pub use statements::*;
pub use type_trees::*;
pub use vocab::*;

macro_rules! tree_kinds {
    ($($kind:ident),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum J {
            $($kind(Arc<$kind>),)*
        }

        /// Variant tag of [`J`], with a stable string name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Kind {
            $($kind,)*
        }

        impl Kind {
            pub const ALL: &'static [Kind] = &[$(Kind::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Kind::$kind => stringify!($kind),)*
                }
            }
        }

        impl FromStr for Kind {
            type Err = UnknownKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($kind) => Ok(Kind::$kind),)*
                    _ => Err(UnknownKind(s.to_owned())),
                }
            }
        }

        impl J {
            pub fn kind(&self) -> Kind {
                match self {
                    $(J::$kind(_) => Kind::$kind,)*
                }
            }

            pub fn id(&self) -> &NodeId {
                match self {
                    $(J::$kind(n) => n.id(),)*
                }
            }

            pub fn prefix(&self) -> &Space {
                match self {
                    $(J::$kind(n) => n.prefix(),)*
                }
            }

            pub fn markers(&self) -> &Markers {
                match self {
                    $(J::$kind(n) => n.markers(),)*
                }
            }

            /// Whether both values are the very same node record.
            pub fn ptr_eq(&self, other: &J) -> bool {
                match (self, other) {
                    $((J::$kind(a), J::$kind(b)) => Arc::ptr_eq(a, b),)*
                    _ => false,
                }
            }
        }

        $(
            impl TreeNode for $kind {
                const KIND: Kind = Kind::$kind;

                fn from_j(j: &J) -> Option<&Self> {
                    match j {
                        J::$kind(n) => Some(n.as_ref()),
                        _ => None,
                    }
                }

                fn into_j(node: Arc<Self>) -> J {
                    J::$kind(node)
                }
            }

            impl From<$kind> for J {
                fn from(node: $kind) -> J {
                    J::$kind(Arc::new(node))
                }
            }
        )*
    };
}

tree_kinds! {
    AnnotatedType,
    Annotation,
    ArrayAccess,
    ArrayDimension,
    ArrayType,
    Assert,
    Assignment,
    AssignmentOperation,
    Binary,
    Block,
    Break,
    Case,
    Catch,
    ClassDeclaration,
    ClassDeclarationKind,
    CompilationUnit,
    Continue,
    ControlParentheses,
    DoWhileLoop,
    Else,
    Empty,
    EnumValue,
    EnumValueSet,
    ExpressionStatement,
    FieldAccess,
    ForControl,
    ForEachControl,
    ForEachLoop,
    ForLoop,
    Identifier,
    If,
    Import,
    InstanceOf,
    IntersectionType,
    Label,
    Lambda,
    LambdaParameters,
    Literal,
    MemberReference,
    MethodDeclaration,
    MethodInvocation,
    Modifier,
    MultiCatch,
    NamedVariable,
    NewArray,
    NewClass,
    NullableType,
    Package,
    ParameterizedType,
    Parentheses,
    Primitive,
    Return,
    Switch,
    SwitchExpression,
    Synchronized,
    Ternary,
    Throw,
    Try,
    TryResource,
    TypeCast,
    TypeParameter,
    TypeParameters,
    Unary,
    Unknown,
    UnknownSource,
    VariableDeclarations,
    WhileLoop,
    Wildcard,
    Yield,
}

impl Kind {
    /// Kinds without leading space or markers of their own; they report the
    /// prefix and markers of a child instead.
    pub fn delegates_prefix(self) -> bool {
        matches!(self, Kind::ExpressionStatement)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl J {
    /// Views this node as a concrete kind.
    pub fn downcast<T: TreeNode>(&self) -> Option<&T> {
        T::from_j(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::Marker;

    fn ident(name: &str) -> J {
        Identifier::build(name, None).into()
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(kind.name().parse::<Kind>().unwrap(), *kind);
        }
        assert_eq!(
            "Goto".parse::<Kind>().unwrap_err(),
            UnknownKind("Goto".into())
        );
    }

    #[test]
    fn expression_statement_delegates_prefix() {
        let inner = Identifier {
            prefix: Space::format("\n    "),
            markers: Markers::empty().add(Marker::search_result(None)),
            ..Identifier::build("x", None)
        };
        let stmt: J = ExpressionStatement {
            id: NodeId::random(),
            expression: inner.clone().into(),
        }
        .into();
        assert!(stmt.kind().delegates_prefix());
        assert_eq!(stmt.prefix(), &inner.prefix);
        assert_eq!(stmt.markers(), &inner.markers);
        assert_ne!(stmt.id(), &inner.id);
    }

    #[test]
    fn ptr_eq_is_identity_not_equality() {
        let a = ident("a");
        let shared = a.clone();
        let copy: J = a.downcast::<Identifier>().unwrap().clone().into();
        assert!(a.ptr_eq(&shared));
        assert!(!a.ptr_eq(&copy));
        assert_eq!(a, copy);
    }

    #[test]
    fn downcast_checks_kind() {
        let a = ident("a");
        assert!(a.downcast::<Identifier>().is_some());
        assert!(a.downcast::<Literal>().is_none());
        assert_eq!(a.kind(), Identifier::KIND);
    }
}
