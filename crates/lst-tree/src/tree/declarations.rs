//! Declaration kinds: compilation units, classes, methods, variables.

use super::vocab::ModifierType;
use super::J;
use crate::id::NodeId;
use crate::markers::Markers;
use crate::padding::{Container, LeftPadded, RightPadded};
use crate::space::Space;
use crate::types::{ClassKind, TypeHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub leading_annotations: Vec<J>,
    pub modifiers: Vec<J>,
    /// A [`ClassDeclarationKind`] node: the `class`/`interface`/... keyword.
    pub kind: J,
    pub name: J,
    pub type_parameters: Option<Container<J>>,
    /// Record components and similar header parameters.
    pub primary_constructor: Option<Container<J>>,
    pub extends: Option<LeftPadded<J>>,
    pub implements: Option<Container<J>>,
    pub permits: Option<Container<J>>,
    pub body: J,
    pub ty: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclarationKind {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub annotations: Vec<J>,
    pub kind: ClassKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub source_path: String,
    pub charset: Option<String>,
    pub package_declaration: Option<RightPadded<J>>,
    pub imports: Vec<RightPadded<J>>,
    pub classes: Vec<J>,
    pub eof: Space,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub annotations: Vec<J>,
    pub name: J,
    pub initializer: Option<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueSet {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub enums: Vec<RightPadded<J>>,
    pub terminated_with_semicolon: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    /// The padding holds the space before `static`.
    pub is_static: LeftPadded<bool>,
    pub qualid: J,
    pub alias: Option<LeftPadded<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub leading_annotations: Vec<J>,
    pub modifiers: Vec<J>,
    pub type_parameters: Option<J>,
    pub return_type_expression: Option<J>,
    pub name: J,
    pub parameters: Container<J>,
    pub throws: Option<Container<J>>,
    pub body: Option<J>,
    /// `default value` of an annotation member.
    pub default_value: Option<LeftPadded<J>>,
    pub method_type: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    /// Literal source keyword; required to print `LanguageExtension`.
    pub keyword: Option<String>,
    pub kind: ModifierType,
    pub annotations: Vec<J>,
}

impl Modifier {
    pub fn build(kind: ModifierType, prefix: Space) -> Self {
        Self {
            id: NodeId::random(),
            prefix,
            markers: Markers::empty(),
            keyword: kind.keyword().map(str::to_owned),
            kind,
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedVariable {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub name: J,
    /// `[]` pairs written after the name; each padding holds the space inside.
    pub dimensions_after_name: Vec<LeftPadded<Space>>,
    pub initializer: Option<LeftPadded<J>>,
    pub variable_type: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub expression: J,
    pub annotations: Vec<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub annotations: Vec<J>,
    pub modifiers: Vec<J>,
    pub name: J,
    pub bounds: Option<Container<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameters {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub annotations: Vec<J>,
    pub type_parameters: Vec<RightPadded<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarations {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub leading_annotations: Vec<J>,
    pub modifiers: Vec<J>,
    pub type_expression: Option<J>,
    /// Space before `...` of a varargs parameter.
    pub varargs: Option<Space>,
    pub variables: Vec<RightPadded<J>>,
}

impl_tree!(
    ClassDeclaration,
    ClassDeclarationKind,
    CompilationUnit,
    EnumValue,
    EnumValueSet,
    Import,
    MethodDeclaration,
    Modifier,
    NamedVariable,
    Package,
    TypeParameter,
    TypeParameters,
    VariableDeclarations,
);
