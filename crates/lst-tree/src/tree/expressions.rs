//! Expression kinds.

use super::vocab::{AssignmentOperator, BinaryOperator, LiteralValue, UnaryOperator};
use super::J;
use crate::id::NodeId;
use crate::markers::Markers;
use crate::padding::{Container, LeftPadded, RightPadded};
use crate::space::Space;
use crate::types::TypeHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub annotation_type: J,
    pub arguments: Option<Container<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub indexed: J,
    pub dimension: J,
}

/// The `[index]` part of an array access.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDimension {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub index: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub variable: J,
    pub assignment: LeftPadded<J>,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentOperation {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub variable: J,
    pub operator: LeftPadded<AssignmentOperator>,
    pub assignment: J,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub left: J,
    pub operator: LeftPadded<BinaryOperator>,
    pub right: J,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlParentheses {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub tree: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccess {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub target: J,
    pub name: LeftPadded<J>,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub simple_name: String,
    pub ty: Option<TypeHandle>,
}

impl Identifier {
    /// A fresh, unformatted identifier.
    pub fn build(simple_name: impl Into<String>, ty: Option<TypeHandle>) -> Self {
        Self {
            id: NodeId::random(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            simple_name: simple_name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceOf {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub expression: RightPadded<J>,
    pub clazz: J,
    pub pattern: Option<J>,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub parameters: J,
    pub arrow: Space,
    pub body: J,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParameters {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub parenthesized: bool,
    pub parameters: Vec<RightPadded<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub value: LiteralValue,
    pub value_source: Option<String>,
    pub ty: Option<TypeHandle>,
}

impl Literal {
    pub fn build(value: LiteralValue, value_source: Option<String>, ty: Option<TypeHandle>) -> Self {
        Self {
            id: NodeId::random(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            value,
            value_source,
            ty,
        }
    }
}

/// `Type::method` and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberReference {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub containing: RightPadded<J>,
    pub type_parameters: Option<Container<J>>,
    pub reference: LeftPadded<J>,
    pub ty: Option<TypeHandle>,
    pub method_type: Option<TypeHandle>,
    pub variable_type: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInvocation {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub select: Option<RightPadded<J>>,
    pub type_parameters: Option<Container<J>>,
    pub name: J,
    pub arguments: Container<J>,
    pub method_type: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArray {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub type_expression: Option<J>,
    pub dimensions: Vec<J>,
    pub initializer: Option<Container<J>>,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClass {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    /// `outer.` in `outer.new Inner()`.
    pub enclosing: Option<RightPadded<J>>,
    /// Space before the `new` keyword.
    pub new: Space,
    pub clazz: Option<J>,
    pub arguments: Container<J>,
    pub body: Option<J>,
    pub constructor_type: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parentheses {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub tree: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchExpression {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub selector: J,
    pub cases: J,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ternary {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub condition: J,
    pub true_part: LeftPadded<J>,
    pub false_part: LeftPadded<J>,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeCast {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub clazz: J,
    pub expression: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub operator: LeftPadded<UnaryOperator>,
    pub expression: J,
    pub ty: Option<TypeHandle>,
}

impl_tree!(
    Annotation,
    ArrayAccess,
    ArrayDimension,
    Assignment,
    AssignmentOperation,
    Binary,
    ControlParentheses,
    FieldAccess,
    Identifier,
    InstanceOf,
    Lambda,
    LambdaParameters,
    Literal,
    MemberReference,
    MethodInvocation,
    NewArray,
    NewClass,
    Parentheses,
    SwitchExpression,
    Ternary,
    TypeCast,
    Unary,
);
