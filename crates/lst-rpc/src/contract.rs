//! The traversal contract: the fixed field order of every node kind.
//!
//! This module is the protocol schema. The sender and the receiver both run
//! these handlers, so the order in which a handler visits fields is the order
//! in which records appear on the wire. Reordering, adding or removing a step
//! here is a breaking protocol change.
//!
//! Every node starts with three implicit steps, `id`, `prefix` and `markers`,
//! which [`visit`] reads and parks on the pending stack. Kinds that borrow
//! their prefix from a child (see [`Kind::delegates_prefix`]) skip the last
//! two. The kind handler then visits its own fields in declaration order,
//! pops the frame and builds the node.

use std::sync::Arc;

use lst_tree::tree::*;
use lst_tree::{Kind, Markers, Space, TreeNode, J};
use tracing::{debug, warn};

use crate::context::Pending;
use crate::error::SyncError;
use crate::field::Side;

/// Required field of a node record.
macro_rules! req {
    ($s:ident, $a:ident, $b:ident, $f:ident) => {
        $s.required($a.map(|n| &n.$f), $b.map(|n| &n.$f))?
    };
}

/// `Option` field of a node record; `None` travels as `ABSENT`.
macro_rules! opt {
    ($s:ident, $a:ident, $b:ident, $f:ident) => {
        $s.field($a.and_then(|n| n.$f.as_ref()), $b.and_then(|n| n.$f.as_ref()))?
    };
}

/// Synchronizes one node of `kind`. `after` is the node being sent (sending
/// side only); `before` is the baseline, ignored unless it has the same kind.
pub fn visit<S: Side>(
    s: &mut S,
    kind: Kind,
    after: Option<&J>,
    before: Option<&J>,
) -> Result<J, SyncError> {
    let before = before.filter(|b| b.kind() == kind);
    let id = s.required(after.map(J::id), before.map(J::id))?;
    let (prefix, markers) = if kind.delegates_prefix() {
        (Space::empty(), Markers::empty())
    } else {
        (
            s.required(after.map(J::prefix), before.map(J::prefix))?,
            s.required(after.map(J::markers), before.map(J::markers))?,
        )
    };
    s.pending().push(Pending { id, prefix, markers });

    match kind {
        Kind::AnnotatedType => node(s, after, before, annotated_type),
        Kind::Annotation => node(s, after, before, annotation),
        Kind::ArrayAccess => node(s, after, before, array_access),
        Kind::ArrayDimension => node(s, after, before, array_dimension),
        Kind::ArrayType => node(s, after, before, array_type),
        Kind::Assert => node(s, after, before, assert),
        Kind::Assignment => node(s, after, before, assignment),
        Kind::AssignmentOperation => node(s, after, before, assignment_operation),
        Kind::Binary => node(s, after, before, binary),
        Kind::Block => node(s, after, before, block),
        Kind::Break => node(s, after, before, break_),
        Kind::Case => node(s, after, before, case),
        Kind::Catch => node(s, after, before, catch),
        Kind::ClassDeclaration => node(s, after, before, class_declaration),
        Kind::ClassDeclarationKind => node(s, after, before, class_declaration_kind),
        Kind::CompilationUnit => node(s, after, before, compilation_unit),
        Kind::Continue => node(s, after, before, continue_),
        Kind::ControlParentheses => node(s, after, before, control_parentheses),
        Kind::DoWhileLoop => node(s, after, before, do_while_loop),
        Kind::Else => node(s, after, before, else_),
        Kind::Empty => node(s, after, before, empty),
        Kind::EnumValue => node(s, after, before, enum_value),
        Kind::EnumValueSet => node(s, after, before, enum_value_set),
        Kind::ExpressionStatement => node(s, after, before, expression_statement),
        Kind::FieldAccess => node(s, after, before, field_access),
        Kind::ForControl => node(s, after, before, for_control),
        Kind::ForEachControl => node(s, after, before, for_each_control),
        Kind::ForEachLoop => node(s, after, before, for_each_loop),
        Kind::ForLoop => node(s, after, before, for_loop),
        Kind::Identifier => node(s, after, before, identifier),
        Kind::If => node(s, after, before, if_),
        Kind::Import => node(s, after, before, import),
        Kind::InstanceOf => node(s, after, before, instance_of),
        Kind::IntersectionType => node(s, after, before, intersection_type),
        Kind::Label => node(s, after, before, label),
        Kind::Lambda => node(s, after, before, lambda),
        Kind::LambdaParameters => node(s, after, before, lambda_parameters),
        Kind::Literal => node(s, after, before, literal),
        Kind::MemberReference => node(s, after, before, member_reference),
        Kind::MethodDeclaration => node(s, after, before, method_declaration),
        Kind::MethodInvocation => node(s, after, before, method_invocation),
        Kind::Modifier => node(s, after, before, modifier),
        Kind::MultiCatch => node(s, after, before, multi_catch),
        Kind::NamedVariable => node(s, after, before, named_variable),
        Kind::NewArray => node(s, after, before, new_array),
        Kind::NewClass => node(s, after, before, new_class),
        Kind::NullableType => node(s, after, before, nullable_type),
        Kind::Package => node(s, after, before, package),
        Kind::ParameterizedType => node(s, after, before, parameterized_type),
        Kind::Parentheses => node(s, after, before, parentheses),
        Kind::Primitive => node(s, after, before, primitive),
        Kind::Return => node(s, after, before, return_),
        Kind::Switch => node(s, after, before, switch),
        Kind::SwitchExpression => node(s, after, before, switch_expression),
        Kind::Synchronized => node(s, after, before, synchronized),
        Kind::Ternary => node(s, after, before, ternary),
        Kind::Throw => node(s, after, before, throw),
        Kind::Try => node(s, after, before, try_),
        Kind::TryResource => node(s, after, before, try_resource),
        Kind::TypeCast => node(s, after, before, type_cast),
        Kind::TypeParameter => node(s, after, before, type_parameter),
        Kind::TypeParameters => node(s, after, before, type_parameters),
        Kind::Unary => node(s, after, before, unary),
        Kind::Unknown => node(s, after, before, unknown),
        Kind::UnknownSource => node(s, after, before, unknown_source),
        Kind::VariableDeclarations => node(s, after, before, variable_declarations),
        Kind::WhileLoop => node(s, after, before, while_loop),
        Kind::Wildcard => node(s, after, before, wildcard),
        Kind::Yield => node(s, after, before, yield_),
    }
}

type Handler<S, T> = fn(&mut S, Option<&T>, Option<&T>) -> Result<T, SyncError>;

fn node<S: Side, T: TreeNode>(
    s: &mut S,
    after: Option<&J>,
    before: Option<&J>,
    handler: Handler<S, T>,
) -> Result<J, SyncError> {
    let after = match after {
        Some(j) => Some(T::from_j(j).ok_or(SyncError::KindMismatch {
            expected: T::KIND,
            found: j.kind(),
        })?),
        None => None,
    };
    let built = handler(s, after, before.and_then(T::from_j))?;
    Ok(T::into_j(Arc::new(built)))
}

// ── Expressions ────────────────────────────────────────────────────────────

fn annotation<S: Side>(
    s: &mut S,
    a: Option<&Annotation>,
    b: Option<&Annotation>,
) -> Result<Annotation, SyncError> {
    let annotation_type = req!(s, a, b, annotation_type);
    let arguments = opt!(s, a, b, arguments);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Annotation {
        id,
        prefix,
        markers,
        annotation_type,
        arguments,
    })
}

fn array_access<S: Side>(
    s: &mut S,
    a: Option<&ArrayAccess>,
    b: Option<&ArrayAccess>,
) -> Result<ArrayAccess, SyncError> {
    let indexed = req!(s, a, b, indexed);
    let dimension = req!(s, a, b, dimension);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ArrayAccess {
        id,
        prefix,
        markers,
        indexed,
        dimension,
    })
}

fn array_dimension<S: Side>(
    s: &mut S,
    a: Option<&ArrayDimension>,
    b: Option<&ArrayDimension>,
) -> Result<ArrayDimension, SyncError> {
    let index = req!(s, a, b, index);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ArrayDimension {
        id,
        prefix,
        markers,
        index,
    })
}

fn assignment<S: Side>(
    s: &mut S,
    a: Option<&Assignment>,
    b: Option<&Assignment>,
) -> Result<Assignment, SyncError> {
    let variable = req!(s, a, b, variable);
    let assignment = req!(s, a, b, assignment);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Assignment {
        id,
        prefix,
        markers,
        variable,
        assignment,
        ty,
    })
}

fn assignment_operation<S: Side>(
    s: &mut S,
    a: Option<&AssignmentOperation>,
    b: Option<&AssignmentOperation>,
) -> Result<AssignmentOperation, SyncError> {
    let variable = req!(s, a, b, variable);
    let operator = req!(s, a, b, operator);
    let assignment = req!(s, a, b, assignment);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(AssignmentOperation {
        id,
        prefix,
        markers,
        variable,
        operator,
        assignment,
        ty,
    })
}

fn binary<S: Side>(s: &mut S, a: Option<&Binary>, b: Option<&Binary>) -> Result<Binary, SyncError> {
    let left = req!(s, a, b, left);
    let operator = req!(s, a, b, operator);
    let right = req!(s, a, b, right);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Binary {
        id,
        prefix,
        markers,
        left,
        operator,
        right,
        ty,
    })
}

fn control_parentheses<S: Side>(
    s: &mut S,
    a: Option<&ControlParentheses>,
    b: Option<&ControlParentheses>,
) -> Result<ControlParentheses, SyncError> {
    let tree = req!(s, a, b, tree);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ControlParentheses {
        id,
        prefix,
        markers,
        tree,
    })
}

fn field_access<S: Side>(
    s: &mut S,
    a: Option<&FieldAccess>,
    b: Option<&FieldAccess>,
) -> Result<FieldAccess, SyncError> {
    let target = req!(s, a, b, target);
    let name = req!(s, a, b, name);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(FieldAccess {
        id,
        prefix,
        markers,
        target,
        name,
        ty,
    })
}

/// Peers that model per-identifier annotations and a separate field type
/// send them around the name; this model keeps neither.
fn identifier<S: Side>(
    s: &mut S,
    a: Option<&Identifier>,
    b: Option<&Identifier>,
) -> Result<Identifier, SyncError> {
    s.discard::<Vec<J>>("Identifier.annotations")?;
    let simple_name = req!(s, a, b, simple_name);
    let ty = opt!(s, a, b, ty);
    s.discard::<lst_tree::TypeHandle>("Identifier.fieldType")?;
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Identifier {
        id,
        prefix,
        markers,
        simple_name,
        ty,
    })
}

fn instance_of<S: Side>(
    s: &mut S,
    a: Option<&InstanceOf>,
    b: Option<&InstanceOf>,
) -> Result<InstanceOf, SyncError> {
    let expression = req!(s, a, b, expression);
    let clazz = req!(s, a, b, clazz);
    let pattern = opt!(s, a, b, pattern);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(InstanceOf {
        id,
        prefix,
        markers,
        expression,
        clazz,
        pattern,
        ty,
    })
}

fn lambda<S: Side>(s: &mut S, a: Option<&Lambda>, b: Option<&Lambda>) -> Result<Lambda, SyncError> {
    let parameters = req!(s, a, b, parameters);
    let arrow = req!(s, a, b, arrow);
    let body = req!(s, a, b, body);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Lambda {
        id,
        prefix,
        markers,
        parameters,
        arrow,
        body,
        ty,
    })
}

fn lambda_parameters<S: Side>(
    s: &mut S,
    a: Option<&LambdaParameters>,
    b: Option<&LambdaParameters>,
) -> Result<LambdaParameters, SyncError> {
    let parenthesized = req!(s, a, b, parenthesized);
    let parameters = req!(s, a, b, parameters);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(LambdaParameters {
        id,
        prefix,
        markers,
        parenthesized,
        parameters,
    })
}

fn literal<S: Side>(s: &mut S, a: Option<&Literal>, b: Option<&Literal>) -> Result<Literal, SyncError> {
    let value = req!(s, a, b, value);
    let value_source = opt!(s, a, b, value_source);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Literal {
        id,
        prefix,
        markers,
        value,
        value_source,
        ty,
    })
}

fn member_reference<S: Side>(
    s: &mut S,
    a: Option<&MemberReference>,
    b: Option<&MemberReference>,
) -> Result<MemberReference, SyncError> {
    let containing = req!(s, a, b, containing);
    let type_parameters = opt!(s, a, b, type_parameters);
    let reference = req!(s, a, b, reference);
    let ty = opt!(s, a, b, ty);
    let method_type = opt!(s, a, b, method_type);
    let variable_type = opt!(s, a, b, variable_type);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(MemberReference {
        id,
        prefix,
        markers,
        containing,
        type_parameters,
        reference,
        ty,
        method_type,
        variable_type,
    })
}

fn method_invocation<S: Side>(
    s: &mut S,
    a: Option<&MethodInvocation>,
    b: Option<&MethodInvocation>,
) -> Result<MethodInvocation, SyncError> {
    let select = opt!(s, a, b, select);
    let type_parameters = opt!(s, a, b, type_parameters);
    let name = req!(s, a, b, name);
    let arguments = req!(s, a, b, arguments);
    let method_type = opt!(s, a, b, method_type);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(MethodInvocation {
        id,
        prefix,
        markers,
        select,
        type_parameters,
        name,
        arguments,
        method_type,
    })
}

fn new_array<S: Side>(
    s: &mut S,
    a: Option<&NewArray>,
    b: Option<&NewArray>,
) -> Result<NewArray, SyncError> {
    let type_expression = opt!(s, a, b, type_expression);
    let dimensions = req!(s, a, b, dimensions);
    let initializer = opt!(s, a, b, initializer);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(NewArray {
        id,
        prefix,
        markers,
        type_expression,
        dimensions,
        initializer,
        ty,
    })
}

fn new_class<S: Side>(
    s: &mut S,
    a: Option<&NewClass>,
    b: Option<&NewClass>,
) -> Result<NewClass, SyncError> {
    let enclosing = opt!(s, a, b, enclosing);
    let new = req!(s, a, b, new);
    let clazz = opt!(s, a, b, clazz);
    let arguments = req!(s, a, b, arguments);
    let body = opt!(s, a, b, body);
    let constructor_type = opt!(s, a, b, constructor_type);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(NewClass {
        id,
        prefix,
        markers,
        enclosing,
        new,
        clazz,
        arguments,
        body,
        constructor_type,
    })
}

fn parentheses<S: Side>(
    s: &mut S,
    a: Option<&Parentheses>,
    b: Option<&Parentheses>,
) -> Result<Parentheses, SyncError> {
    let tree = req!(s, a, b, tree);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Parentheses {
        id,
        prefix,
        markers,
        tree,
    })
}

fn switch_expression<S: Side>(
    s: &mut S,
    a: Option<&SwitchExpression>,
    b: Option<&SwitchExpression>,
) -> Result<SwitchExpression, SyncError> {
    let selector = req!(s, a, b, selector);
    let cases = req!(s, a, b, cases);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(SwitchExpression {
        id,
        prefix,
        markers,
        selector,
        cases,
        ty,
    })
}

fn ternary<S: Side>(s: &mut S, a: Option<&Ternary>, b: Option<&Ternary>) -> Result<Ternary, SyncError> {
    let condition = req!(s, a, b, condition);
    let true_part = req!(s, a, b, true_part);
    let false_part = req!(s, a, b, false_part);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Ternary {
        id,
        prefix,
        markers,
        condition,
        true_part,
        false_part,
        ty,
    })
}

fn type_cast<S: Side>(
    s: &mut S,
    a: Option<&TypeCast>,
    b: Option<&TypeCast>,
) -> Result<TypeCast, SyncError> {
    let clazz = req!(s, a, b, clazz);
    let expression = req!(s, a, b, expression);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(TypeCast {
        id,
        prefix,
        markers,
        clazz,
        expression,
    })
}

fn unary<S: Side>(s: &mut S, a: Option<&Unary>, b: Option<&Unary>) -> Result<Unary, SyncError> {
    let operator = req!(s, a, b, operator);
    let expression = req!(s, a, b, expression);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Unary {
        id,
        prefix,
        markers,
        operator,
        expression,
        ty,
    })
}

// ── Statements ─────────────────────────────────────────────────────────────

fn assert<S: Side>(s: &mut S, a: Option<&Assert>, b: Option<&Assert>) -> Result<Assert, SyncError> {
    let condition = req!(s, a, b, condition);
    let detail = opt!(s, a, b, detail);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Assert {
        id,
        prefix,
        markers,
        condition,
        detail,
    })
}

fn block<S: Side>(s: &mut S, a: Option<&Block>, b: Option<&Block>) -> Result<Block, SyncError> {
    let is_static = req!(s, a, b, is_static);
    let statements = req!(s, a, b, statements);
    let end = req!(s, a, b, end);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Block {
        id,
        prefix,
        markers,
        is_static,
        statements,
        end,
    })
}

fn break_<S: Side>(s: &mut S, a: Option<&Break>, b: Option<&Break>) -> Result<Break, SyncError> {
    let label = opt!(s, a, b, label);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Break {
        id,
        prefix,
        markers,
        label,
    })
}

fn case<S: Side>(s: &mut S, a: Option<&Case>, b: Option<&Case>) -> Result<Case, SyncError> {
    let kind = req!(s, a, b, kind);
    let case_labels = req!(s, a, b, case_labels);
    let statements = req!(s, a, b, statements);
    let body = opt!(s, a, b, body);
    let guard = opt!(s, a, b, guard);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Case {
        id,
        prefix,
        markers,
        kind,
        case_labels,
        statements,
        body,
        guard,
    })
}

fn catch<S: Side>(s: &mut S, a: Option<&Catch>, b: Option<&Catch>) -> Result<Catch, SyncError> {
    let parameter = req!(s, a, b, parameter);
    let body = req!(s, a, b, body);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Catch {
        id,
        prefix,
        markers,
        parameter,
        body,
    })
}

fn continue_<S: Side>(
    s: &mut S,
    a: Option<&Continue>,
    b: Option<&Continue>,
) -> Result<Continue, SyncError> {
    let label = opt!(s, a, b, label);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Continue {
        id,
        prefix,
        markers,
        label,
    })
}

fn do_while_loop<S: Side>(
    s: &mut S,
    a: Option<&DoWhileLoop>,
    b: Option<&DoWhileLoop>,
) -> Result<DoWhileLoop, SyncError> {
    let body = req!(s, a, b, body);
    let while_condition = req!(s, a, b, while_condition);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(DoWhileLoop {
        id,
        prefix,
        markers,
        body,
        while_condition,
    })
}

fn else_<S: Side>(s: &mut S, a: Option<&Else>, b: Option<&Else>) -> Result<Else, SyncError> {
    let body = req!(s, a, b, body);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Else {
        id,
        prefix,
        markers,
        body,
    })
}

fn empty<S: Side>(s: &mut S, _a: Option<&Empty>, _b: Option<&Empty>) -> Result<Empty, SyncError> {
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Empty {
        id,
        prefix,
        markers,
    })
}

fn expression_statement<S: Side>(
    s: &mut S,
    a: Option<&ExpressionStatement>,
    b: Option<&ExpressionStatement>,
) -> Result<ExpressionStatement, SyncError> {
    let expression = req!(s, a, b, expression);
    let Pending { id, .. } = s.pending().pop()?;
    Ok(ExpressionStatement { id, expression })
}

fn for_control<S: Side>(
    s: &mut S,
    a: Option<&ForControl>,
    b: Option<&ForControl>,
) -> Result<ForControl, SyncError> {
    let init = req!(s, a, b, init);
    let condition = req!(s, a, b, condition);
    let update = req!(s, a, b, update);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ForControl {
        id,
        prefix,
        markers,
        init,
        condition,
        update,
    })
}

fn for_each_control<S: Side>(
    s: &mut S,
    a: Option<&ForEachControl>,
    b: Option<&ForEachControl>,
) -> Result<ForEachControl, SyncError> {
    let variable = req!(s, a, b, variable);
    let iterable = req!(s, a, b, iterable);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ForEachControl {
        id,
        prefix,
        markers,
        variable,
        iterable,
    })
}

fn for_each_loop<S: Side>(
    s: &mut S,
    a: Option<&ForEachLoop>,
    b: Option<&ForEachLoop>,
) -> Result<ForEachLoop, SyncError> {
    let control = req!(s, a, b, control);
    let body = req!(s, a, b, body);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ForEachLoop {
        id,
        prefix,
        markers,
        control,
        body,
    })
}

fn for_loop<S: Side>(s: &mut S, a: Option<&ForLoop>, b: Option<&ForLoop>) -> Result<ForLoop, SyncError> {
    let control = req!(s, a, b, control);
    let body = req!(s, a, b, body);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ForLoop {
        id,
        prefix,
        markers,
        control,
        body,
    })
}

fn if_<S: Side>(s: &mut S, a: Option<&If>, b: Option<&If>) -> Result<If, SyncError> {
    let condition = req!(s, a, b, condition);
    let then_part = req!(s, a, b, then_part);
    let else_part = opt!(s, a, b, else_part);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(If {
        id,
        prefix,
        markers,
        condition,
        then_part,
        else_part,
    })
}

fn label<S: Side>(s: &mut S, a: Option<&Label>, b: Option<&Label>) -> Result<Label, SyncError> {
    let label = req!(s, a, b, label);
    let statement = req!(s, a, b, statement);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Label {
        id,
        prefix,
        markers,
        label,
        statement,
    })
}

fn return_<S: Side>(s: &mut S, a: Option<&Return>, b: Option<&Return>) -> Result<Return, SyncError> {
    let expression = opt!(s, a, b, expression);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Return {
        id,
        prefix,
        markers,
        expression,
    })
}

fn switch<S: Side>(s: &mut S, a: Option<&Switch>, b: Option<&Switch>) -> Result<Switch, SyncError> {
    let selector = req!(s, a, b, selector);
    let cases = req!(s, a, b, cases);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Switch {
        id,
        prefix,
        markers,
        selector,
        cases,
    })
}

fn synchronized<S: Side>(
    s: &mut S,
    a: Option<&Synchronized>,
    b: Option<&Synchronized>,
) -> Result<Synchronized, SyncError> {
    let lock = req!(s, a, b, lock);
    let body = req!(s, a, b, body);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Synchronized {
        id,
        prefix,
        markers,
        lock,
        body,
    })
}

fn throw<S: Side>(s: &mut S, a: Option<&Throw>, b: Option<&Throw>) -> Result<Throw, SyncError> {
    let exception = req!(s, a, b, exception);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Throw {
        id,
        prefix,
        markers,
        exception,
    })
}

fn try_<S: Side>(s: &mut S, a: Option<&Try>, b: Option<&Try>) -> Result<Try, SyncError> {
    let resources = opt!(s, a, b, resources);
    let body = req!(s, a, b, body);
    let catches = req!(s, a, b, catches);
    let finally = opt!(s, a, b, finally);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Try {
        id,
        prefix,
        markers,
        resources,
        body,
        catches,
        finally,
    })
}

fn try_resource<S: Side>(
    s: &mut S,
    a: Option<&TryResource>,
    b: Option<&TryResource>,
) -> Result<TryResource, SyncError> {
    let variable_declarations = req!(s, a, b, variable_declarations);
    let terminated_with_semicolon = req!(s, a, b, terminated_with_semicolon);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(TryResource {
        id,
        prefix,
        markers,
        variable_declarations,
        terminated_with_semicolon,
    })
}

fn unknown<S: Side>(s: &mut S, a: Option<&Unknown>, b: Option<&Unknown>) -> Result<Unknown, SyncError> {
    let source = req!(s, a, b, source);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Unknown {
        id,
        prefix,
        markers,
        source,
    })
}

fn unknown_source<S: Side>(
    s: &mut S,
    a: Option<&UnknownSource>,
    b: Option<&UnknownSource>,
) -> Result<UnknownSource, SyncError> {
    let text = req!(s, a, b, text);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(UnknownSource {
        id,
        prefix,
        markers,
        text,
    })
}

fn while_loop<S: Side>(
    s: &mut S,
    a: Option<&WhileLoop>,
    b: Option<&WhileLoop>,
) -> Result<WhileLoop, SyncError> {
    let condition = req!(s, a, b, condition);
    let body = req!(s, a, b, body);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(WhileLoop {
        id,
        prefix,
        markers,
        condition,
        body,
    })
}

fn yield_<S: Side>(s: &mut S, a: Option<&Yield>, b: Option<&Yield>) -> Result<Yield, SyncError> {
    let implicit = req!(s, a, b, implicit);
    let value = req!(s, a, b, value);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Yield {
        id,
        prefix,
        markers,
        implicit,
        value,
    })
}

// ── Declarations ───────────────────────────────────────────────────────────

fn class_declaration<S: Side>(
    s: &mut S,
    a: Option<&ClassDeclaration>,
    b: Option<&ClassDeclaration>,
) -> Result<ClassDeclaration, SyncError> {
    let leading_annotations = req!(s, a, b, leading_annotations);
    let modifiers = req!(s, a, b, modifiers);
    let kind = req!(s, a, b, kind);
    let name = req!(s, a, b, name);
    let type_parameters = opt!(s, a, b, type_parameters);
    let primary_constructor = opt!(s, a, b, primary_constructor);
    let extends = opt!(s, a, b, extends);
    let implements = opt!(s, a, b, implements);
    let permits = opt!(s, a, b, permits);
    let body = req!(s, a, b, body);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ClassDeclaration {
        id,
        prefix,
        markers,
        leading_annotations,
        modifiers,
        kind,
        name,
        type_parameters,
        primary_constructor,
        extends,
        implements,
        permits,
        body,
        ty,
    })
}

fn class_declaration_kind<S: Side>(
    s: &mut S,
    a: Option<&ClassDeclarationKind>,
    b: Option<&ClassDeclarationKind>,
) -> Result<ClassDeclarationKind, SyncError> {
    let annotations = req!(s, a, b, annotations);
    let kind = req!(s, a, b, kind);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ClassDeclarationKind {
        id,
        prefix,
        markers,
        annotations,
        kind,
    })
}

fn compilation_unit<S: Side>(
    s: &mut S,
    a: Option<&CompilationUnit>,
    b: Option<&CompilationUnit>,
) -> Result<CompilationUnit, SyncError> {
    let source_path = req!(s, a, b, source_path);
    let charset = opt!(s, a, b, charset);
    let package_declaration = opt!(s, a, b, package_declaration);
    let imports = req!(s, a, b, imports);
    let classes = req!(s, a, b, classes);
    let eof = req!(s, a, b, eof);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(CompilationUnit {
        id,
        prefix,
        markers,
        source_path,
        charset,
        package_declaration,
        imports,
        classes,
        eof,
    })
}

fn enum_value<S: Side>(
    s: &mut S,
    a: Option<&EnumValue>,
    b: Option<&EnumValue>,
) -> Result<EnumValue, SyncError> {
    let annotations = req!(s, a, b, annotations);
    let name = req!(s, a, b, name);
    let initializer = opt!(s, a, b, initializer);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(EnumValue {
        id,
        prefix,
        markers,
        annotations,
        name,
        initializer,
    })
}

fn enum_value_set<S: Side>(
    s: &mut S,
    a: Option<&EnumValueSet>,
    b: Option<&EnumValueSet>,
) -> Result<EnumValueSet, SyncError> {
    let enums = req!(s, a, b, enums);
    let terminated_with_semicolon = req!(s, a, b, terminated_with_semicolon);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(EnumValueSet {
        id,
        prefix,
        markers,
        enums,
        terminated_with_semicolon,
    })
}

fn import<S: Side>(s: &mut S, a: Option<&Import>, b: Option<&Import>) -> Result<Import, SyncError> {
    let is_static = req!(s, a, b, is_static);
    let qualid = req!(s, a, b, qualid);
    let alias = opt!(s, a, b, alias);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Import {
        id,
        prefix,
        markers,
        is_static,
        qualid,
        alias,
    })
}

fn method_declaration<S: Side>(
    s: &mut S,
    a: Option<&MethodDeclaration>,
    b: Option<&MethodDeclaration>,
) -> Result<MethodDeclaration, SyncError> {
    let leading_annotations = req!(s, a, b, leading_annotations);
    let modifiers = req!(s, a, b, modifiers);
    let type_parameters = opt!(s, a, b, type_parameters);
    let return_type_expression = opt!(s, a, b, return_type_expression);
    s.discard::<Vec<J>>("MethodDeclaration.name.annotations")?;
    let name = req!(s, a, b, name);
    let parameters = req!(s, a, b, parameters);
    let throws = opt!(s, a, b, throws);
    let body = opt!(s, a, b, body);
    let default_value = opt!(s, a, b, default_value);
    let method_type = opt!(s, a, b, method_type);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(MethodDeclaration {
        id,
        prefix,
        markers,
        leading_annotations,
        modifiers,
        type_parameters,
        return_type_expression,
        name,
        parameters,
        throws,
        body,
        default_value,
        method_type,
    })
}

fn modifier<S: Side>(
    s: &mut S,
    a: Option<&Modifier>,
    b: Option<&Modifier>,
) -> Result<Modifier, SyncError> {
    let keyword: Option<String> = opt!(s, a, b, keyword);
    let kind: ModifierType = req!(s, a, b, kind);
    let annotations = req!(s, a, b, annotations);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    // The sending side passes its own modifiers through as they are.
    let kind = match a {
        Some(_) => kind,
        None => resolve_received(kind, keyword.as_deref()),
    };
    Ok(Modifier {
        id,
        prefix,
        markers,
        keyword,
        kind,
        annotations,
    })
}

fn resolve_received(kind: ModifierType, keyword: Option<&str>) -> ModifierType {
    let resolved = kind.resolve(keyword);
    if kind == ModifierType::LanguageExtension {
        if resolved == kind {
            warn!(keyword = ?keyword, "no modifier concept for keyword, keeping it verbatim");
        } else {
            debug!(keyword = ?keyword, resolved = resolved.name(), "mapped extension modifier");
        }
    }
    resolved
}

fn named_variable<S: Side>(
    s: &mut S,
    a: Option<&NamedVariable>,
    b: Option<&NamedVariable>,
) -> Result<NamedVariable, SyncError> {
    let name = req!(s, a, b, name);
    let dimensions_after_name = req!(s, a, b, dimensions_after_name);
    let initializer = opt!(s, a, b, initializer);
    let variable_type = opt!(s, a, b, variable_type);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(NamedVariable {
        id,
        prefix,
        markers,
        name,
        dimensions_after_name,
        initializer,
        variable_type,
    })
}

fn package<S: Side>(s: &mut S, a: Option<&Package>, b: Option<&Package>) -> Result<Package, SyncError> {
    let expression = req!(s, a, b, expression);
    let annotations = req!(s, a, b, annotations);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Package {
        id,
        prefix,
        markers,
        expression,
        annotations,
    })
}

fn type_parameter<S: Side>(
    s: &mut S,
    a: Option<&TypeParameter>,
    b: Option<&TypeParameter>,
) -> Result<TypeParameter, SyncError> {
    let annotations = req!(s, a, b, annotations);
    let modifiers = req!(s, a, b, modifiers);
    let name = req!(s, a, b, name);
    let bounds = opt!(s, a, b, bounds);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(TypeParameter {
        id,
        prefix,
        markers,
        annotations,
        modifiers,
        name,
        bounds,
    })
}

fn type_parameters<S: Side>(
    s: &mut S,
    a: Option<&TypeParameters>,
    b: Option<&TypeParameters>,
) -> Result<TypeParameters, SyncError> {
    let annotations = req!(s, a, b, annotations);
    let type_parameters = req!(s, a, b, type_parameters);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(TypeParameters {
        id,
        prefix,
        markers,
        annotations,
        type_parameters,
    })
}

fn variable_declarations<S: Side>(
    s: &mut S,
    a: Option<&VariableDeclarations>,
    b: Option<&VariableDeclarations>,
) -> Result<VariableDeclarations, SyncError> {
    let leading_annotations = req!(s, a, b, leading_annotations);
    let modifiers = req!(s, a, b, modifiers);
    let type_expression = opt!(s, a, b, type_expression);
    let varargs = opt!(s, a, b, varargs);
    let variables = req!(s, a, b, variables);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(VariableDeclarations {
        id,
        prefix,
        markers,
        leading_annotations,
        modifiers,
        type_expression,
        varargs,
        variables,
    })
}

// ── Type trees ─────────────────────────────────────────────────────────────

fn annotated_type<S: Side>(
    s: &mut S,
    a: Option<&AnnotatedType>,
    b: Option<&AnnotatedType>,
) -> Result<AnnotatedType, SyncError> {
    let annotations = req!(s, a, b, annotations);
    let type_expression = req!(s, a, b, type_expression);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(AnnotatedType {
        id,
        prefix,
        markers,
        annotations,
        type_expression,
    })
}

fn array_type<S: Side>(
    s: &mut S,
    a: Option<&ArrayType>,
    b: Option<&ArrayType>,
) -> Result<ArrayType, SyncError> {
    let element_type = req!(s, a, b, element_type);
    let annotations = req!(s, a, b, annotations);
    let dimension = req!(s, a, b, dimension);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ArrayType {
        id,
        prefix,
        markers,
        element_type,
        annotations,
        dimension,
        ty,
    })
}

fn intersection_type<S: Side>(
    s: &mut S,
    a: Option<&IntersectionType>,
    b: Option<&IntersectionType>,
) -> Result<IntersectionType, SyncError> {
    let bounds = req!(s, a, b, bounds);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(IntersectionType {
        id,
        prefix,
        markers,
        bounds,
    })
}

fn multi_catch<S: Side>(
    s: &mut S,
    a: Option<&MultiCatch>,
    b: Option<&MultiCatch>,
) -> Result<MultiCatch, SyncError> {
    let alternatives = req!(s, a, b, alternatives);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(MultiCatch {
        id,
        prefix,
        markers,
        alternatives,
    })
}

fn nullable_type<S: Side>(
    s: &mut S,
    a: Option<&NullableType>,
    b: Option<&NullableType>,
) -> Result<NullableType, SyncError> {
    let annotations = req!(s, a, b, annotations);
    let type_tree = req!(s, a, b, type_tree);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(NullableType {
        id,
        prefix,
        markers,
        annotations,
        type_tree,
    })
}

fn parameterized_type<S: Side>(
    s: &mut S,
    a: Option<&ParameterizedType>,
    b: Option<&ParameterizedType>,
) -> Result<ParameterizedType, SyncError> {
    let clazz = req!(s, a, b, clazz);
    let type_parameters = opt!(s, a, b, type_parameters);
    let ty = opt!(s, a, b, ty);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(ParameterizedType {
        id,
        prefix,
        markers,
        clazz,
        type_parameters,
        ty,
    })
}

fn primitive<S: Side>(
    s: &mut S,
    a: Option<&Primitive>,
    b: Option<&Primitive>,
) -> Result<Primitive, SyncError> {
    let kind = req!(s, a, b, kind);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Primitive {
        id,
        prefix,
        markers,
        kind,
    })
}

fn wildcard<S: Side>(
    s: &mut S,
    a: Option<&Wildcard>,
    b: Option<&Wildcard>,
) -> Result<Wildcard, SyncError> {
    let bound = opt!(s, a, b, bound);
    let bounded_type = opt!(s, a, b, bounded_type);
    let Pending { id, prefix, markers } = s.pending().pop()?;
    Ok(Wildcard {
        id,
        prefix,
        markers,
        bound,
        bounded_type,
    })
}
