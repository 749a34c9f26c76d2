//! Statement and control-flow kinds.

use super::vocab::CaseKind;
use super::{Tree, J};
use crate::id::NodeId;
use crate::markers::Markers;
use crate::padding::{Container, LeftPadded, RightPadded};
use crate::space::Space;

#[derive(Debug, Clone, PartialEq)]
pub struct Assert {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub condition: J,
    pub detail: Option<LeftPadded<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    /// `static { ... }` initializer; the padding holds the space before `{`.
    pub is_static: RightPadded<bool>,
    pub statements: Vec<RightPadded<J>>,
    /// Space before the closing brace.
    pub end: Space,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Break {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub label: Option<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub kind: CaseKind,
    pub case_labels: Container<J>,
    pub statements: Container<J>,
    /// Right-hand side of a `case X ->` rule.
    pub body: Option<RightPadded<J>>,
    pub guard: Option<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub parameter: J,
    pub body: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Continue {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub label: Option<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub body: RightPadded<J>,
    pub while_condition: LeftPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Else {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub body: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Empty {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
}

/// An expression used in statement position.
///
/// Carries no formatting of its own: its prefix and markers are those of the
/// wrapped expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub id: NodeId,
    pub expression: J,
}

impl Tree for ExpressionStatement {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn prefix(&self) -> &Space {
        self.expression.prefix()
    }

    fn markers(&self) -> &Markers {
        self.expression.markers()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForControl {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub init: Vec<RightPadded<J>>,
    pub condition: RightPadded<J>,
    pub update: Vec<RightPadded<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachControl {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub variable: RightPadded<J>,
    pub iterable: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub control: J,
    pub body: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub control: J,
    pub body: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub condition: J,
    pub then_part: RightPadded<J>,
    pub else_part: Option<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub label: RightPadded<J>,
    pub statement: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub expression: Option<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub selector: J,
    pub cases: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synchronized {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub lock: J,
    pub body: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Throw {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub exception: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub resources: Option<Container<J>>,
    pub body: J,
    pub catches: Vec<J>,
    pub finally: Option<LeftPadded<J>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryResource {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub variable_declarations: J,
    pub terminated_with_semicolon: bool,
}

/// Source the parser could not model, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Unknown {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub source: J,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownSource {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub condition: J,
    pub body: RightPadded<J>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Yield {
    pub id: NodeId,
    pub prefix: Space,
    pub markers: Markers,
    pub implicit: bool,
    pub value: J,
}

impl_tree!(
    Assert,
    Block,
    Break,
    Case,
    Catch,
    Continue,
    DoWhileLoop,
    Else,
    Empty,
    ForControl,
    ForEachControl,
    ForEachLoop,
    ForLoop,
    If,
    Label,
    Return,
    Switch,
    Synchronized,
    Throw,
    Try,
    TryResource,
    Unknown,
    UnknownSource,
    WhileLoop,
    Yield,
);
