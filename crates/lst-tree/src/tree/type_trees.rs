//! Kinds that spell out a type in source.

use super::vocab::WildcardBound;
use super::J;
use crate::id::NodeId;
use crate::markers::Markers;
use crate::padding::{Container, LeftPadded, RightPadded};
use crate::space::Space;
use crate::types::{PrimitiveKind, TypeHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedType {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub annotations: Vec<J>,
    pub type_expression: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub element_type: J,
    pub annotations: Vec<J>,
    /// `[]`: space before `[` and, as the element, space before `]`.
    pub dimension: LeftPadded<Space>,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionType {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub bounds: Container<J>,
}

/// `catch (A | B e)` alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiCatch {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub alternatives: Vec<RightPadded<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullableType {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub annotations: Vec<J>,
    pub type_tree: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedType {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub clazz: J,
    pub type_parameters: Option<Container<J>>,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub kind: PrimitiveKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub bound: Option<LeftPadded<WildcardBound>>,
    pub bounded_type: Option<J>,
}

impl_tree!(
    AnnotatedType,
    ArrayType,
    IntersectionType,
    MultiCatch,
    NullableType,
    ParameterizedType,
    Primitive,
    Wildcard,
);
