#![allow(dead_code)]

use lst_tree::markers::Marker;
use lst_tree::tree::*;
use lst_tree::types::{Class, ClassKind, Method};
use lst_tree::{
    Container, JavaType, LeftPadded, Markers, NodeId, PrimitiveKind, RightPadded, Space,
    TypeArena, TypeHandle, J,
};

/// Routes `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ws(s: &str) -> Space {
    Space::format(s)
}

pub fn ident(name: &str) -> J {
    Identifier::build(name, None).into()
}

pub fn ident_at(prefix: &str, name: &str) -> J {
    Identifier {
        prefix: ws(prefix),
        ..Identifier::build(name, None)
    }
    .into()
}

pub fn int_literal(arena: &TypeArena, value: i64) -> J {
    Literal {
        prefix: ws(" "),
        ..Literal::build(
            LiteralValue::Int(value),
            None,
            Some(arena.primitive(PrimitiveKind::Int)),
        )
    }
    .into()
}

pub fn primitive(prefix: &str, kind: PrimitiveKind) -> J {
    Primitive {
        id: NodeId::random(),
        prefix: ws(prefix),
        markers: Markers::empty(),
        kind,
    }
    .into()
}

pub fn statement(element: J) -> RightPadded<J> {
    RightPadded {
        element,
        after: Space::empty(),
        markers: Markers::empty().add(Marker::Semicolon {
            id: NodeId::random(),
        }),
    }
}

pub fn block(prefix: &str, statements: Vec<J>, end: &str) -> J {
    Block {
        id: NodeId::random(),
        prefix: ws(prefix),
        markers: Markers::empty(),
        is_static: RightPadded::bare(false),
        statements: statements.into_iter().map(statement).collect(),
        end: ws(end),
    }
    .into()
}

pub fn return_stmt(expression: Option<J>) -> J {
    Return {
        id: NodeId::random(),
        prefix: ws("\n        "),
        markers: Markers::empty(),
        expression,
    }
    .into()
}

/// `name(arg);` as an expression statement.
pub fn call_statement(arena: &TypeArena, name: &str, arg: i64) -> J {
    let call: J = MethodInvocation {
        id: NodeId::random(),
        prefix: ws("\n        "),
        markers: Markers::empty(),
        select: None,
        type_parameters: None,
        name: ident(name),
        arguments: Container::new(
            Space::empty(),
            vec![RightPadded::bare(int_literal(arena, arg))],
        ),
        method_type: None,
    }
    .into();
    ExpressionStatement {
        id: NodeId::random(),
        expression: call,
    }
    .into()
}

pub fn modifier(kind: ModifierType) -> J {
    Modifier::build(kind, Space::empty()).into()
}

pub fn no_parameters() -> Container<J> {
    let empty: J = Empty {
        id: NodeId::random(),
        prefix: Space::empty(),
        markers: Markers::empty(),
    }
    .into();
    Container::new(Space::empty(), vec![RightPadded::bare(empty)])
}

pub fn method_with_body(name: &str, body: J, method_type: Option<TypeHandle>) -> J {
    MethodDeclaration {
        id: NodeId::random(),
        prefix: ws("\n    "),
        markers: Markers::empty(),
        leading_annotations: Vec::new(),
        modifiers: vec![modifier(ModifierType::Public)],
        type_parameters: None,
        return_type_expression: Some(primitive(" ", PrimitiveKind::Int)),
        name: ident_at(" ", name),
        parameters: no_parameters(),
        throws: None,
        body: Some(body),
        default_value: None,
        method_type,
    }
    .into()
}

/// `public int one() { return <value>; }`
pub fn method_returning(arena: &TypeArena, value: i64) -> J {
    let body = block(
        " ",
        vec![return_stmt(Some(int_literal(arena, value)))],
        "\n    ",
    );
    method_with_body("one", body, None)
}

/// Copy of a [`method_returning`] tree with the returned literal's value
/// replaced. Every node off the path to the literal is shared with `method`.
pub fn with_return_value(method: &J, value: i64) -> J {
    let decl = method.downcast::<MethodDeclaration>().expect("method");
    let body = decl.body.as_ref().expect("body");
    let block = body.downcast::<Block>().expect("block");
    let first = &block.statements[0];
    let ret = first.element.downcast::<Return>().expect("return");
    let lit = ret
        .expression
        .as_ref()
        .and_then(|e| e.downcast::<Literal>())
        .expect("literal");

    let lit: J = Literal {
        value: LiteralValue::Int(value),
        ..lit.clone()
    }
    .into();
    let ret: J = Return {
        expression: Some(lit),
        ..ret.clone()
    }
    .into();
    let mut statements = block.statements.clone();
    statements[0] = RightPadded {
        element: ret,
        ..first.clone()
    };
    let block: J = Block {
        statements,
        ..block.clone()
    }
    .into();
    MethodDeclaration {
        body: Some(block),
        ..decl.clone()
    }
    .into()
}

/// Registers `com.example.One` with a method `one()` whose declaring type
/// points back at the class. Returns `(class, method)`.
pub fn cyclic_class(arena: &mut TypeArena) -> (TypeHandle, TypeHandle) {
    let class = arena.reserve();
    let method = arena.add(JavaType::Method(Method {
        declaring_type: class,
        name: "one".into(),
        flags: 1,
        return_type: arena.primitive(PrimitiveKind::Int),
        parameter_names: Vec::new(),
        parameter_types: Vec::new(),
        thrown_exceptions: Vec::new(),
        annotations: Vec::new(),
        default_value: Vec::new(),
    }));
    let mut ty = Class::new(ClassKind::Class, "com.example.One");
    ty.flags = 1;
    ty.methods = vec![method];
    arena.fill(class, JavaType::Class(ty)).expect("reserved handle");
    (class, method)
}

pub fn class_declaration(name: &str, members: Vec<J>, ty: Option<TypeHandle>) -> J {
    let kind: J = ClassDeclarationKind {
        id: NodeId::random(),
        prefix: ws(" "),
        markers: Markers::empty(),
        annotations: Vec::new(),
        kind: ClassKind::Class,
    }
    .into();
    ClassDeclaration {
        id: NodeId::random(),
        prefix: Space::empty(),
        markers: Markers::empty(),
        leading_annotations: Vec::new(),
        modifiers: vec![modifier(ModifierType::Public)],
        kind,
        name: ident_at(" ", name),
        type_parameters: None,
        primary_constructor: None,
        extends: None,
        implements: None,
        permits: None,
        body: block(" ", members, "\n"),
        ty,
    }
    .into()
}

fn field_access(target: &str, name: &str) -> J {
    FieldAccess {
        id: NodeId::random(),
        prefix: ws(" "),
        markers: Markers::empty(),
        target: ident(target),
        name: LeftPadded::bare(ident(name)),
        ty: None,
    }
    .into()
}

/// A small but varied compilation unit:
///
/// ```text
/// package com.example;
/// import java.util;
/// public class One {
///     // counter
///     private int count = 0;
///     public int one() {
///         if (count > 0) { count += 1; }
///         for (var x : xs) { }
///         return 1;
///     }
/// }
/// ```
pub fn compilation_unit(arena: &TypeArena) -> J {
    let int = arena.primitive(PrimitiveKind::Int);
    let package: J = Package {
        id: NodeId::random(),
        prefix: Space::empty(),
        markers: Markers::empty(),
        expression: field_access("com", "example"),
        annotations: Vec::new(),
    }
    .into();
    let import: J = Import {
        id: NodeId::random(),
        prefix: ws("\n"),
        markers: Markers::empty(),
        is_static: LeftPadded::bare(false),
        qualid: field_access("java", "util"),
        alias: None,
    }
    .into();

    let count_var: J = NamedVariable {
        id: NodeId::random(),
        prefix: ws(" "),
        markers: Markers::empty(),
        name: ident("count"),
        dimensions_after_name: Vec::new(),
        initializer: Some(LeftPadded::new(ws(" "), int_literal(arena, 0))),
        variable_type: None,
    }
    .into();
    let field: J = VariableDeclarations {
        id: NodeId::random(),
        prefix: ws("\n    ").with_comments(vec![lst_tree::Comment::line(" counter", "\n    ")]),
        markers: Markers::empty(),
        leading_annotations: Vec::new(),
        modifiers: vec![modifier(ModifierType::Private)],
        type_expression: Some(primitive(" ", PrimitiveKind::Int)),
        varargs: None,
        variables: vec![RightPadded::bare(count_var)],
    }
    .into();

    let condition: J = ControlParentheses {
        id: NodeId::random(),
        prefix: ws(" "),
        markers: Markers::empty(),
        tree: RightPadded::bare(
            Binary {
                id: NodeId::random(),
                prefix: Space::empty(),
                markers: Markers::empty(),
                left: ident("count"),
                operator: LeftPadded::new(ws(" "), BinaryOperator::GreaterThan),
                right: int_literal(arena, 0),
                ty: Some(arena.primitive(PrimitiveKind::Boolean)),
            }
            .into(),
        ),
    }
    .into();
    let increment: J = AssignmentOperation {
        id: NodeId::random(),
        prefix: ws(" "),
        markers: Markers::empty(),
        variable: ident("count"),
        operator: LeftPadded::new(ws(" "), AssignmentOperator::Addition),
        assignment: int_literal(arena, 1),
        ty: Some(int),
    }
    .into();
    let if_stmt: J = If {
        id: NodeId::random(),
        prefix: ws("\n        "),
        markers: Markers::empty(),
        condition,
        then_part: RightPadded::bare(block(" ", vec![increment], " ")),
        else_part: None,
    }
    .into();

    let loop_var: J = VariableDeclarations {
        id: NodeId::random(),
        prefix: Space::empty(),
        markers: Markers::empty(),
        leading_annotations: Vec::new(),
        modifiers: Vec::new(),
        type_expression: Some(ident("var")),
        varargs: None,
        variables: vec![RightPadded::bare(
            NamedVariable {
                id: NodeId::random(),
                prefix: ws(" "),
                markers: Markers::empty(),
                name: ident("x"),
                dimensions_after_name: Vec::new(),
                initializer: None,
                variable_type: None,
            }
            .into(),
        )],
    }
    .into();
    let for_each: J = ForEachLoop {
        id: NodeId::random(),
        prefix: ws("\n        "),
        markers: Markers::empty(),
        control: ForEachControl {
            id: NodeId::random(),
            prefix: ws(" "),
            markers: Markers::empty(),
            variable: RightPadded::new(loop_var, ws(" ")),
            iterable: RightPadded::bare(ident_at(" ", "xs")),
        }
        .into(),
        body: RightPadded::bare(block(" ", Vec::new(), " ")),
    }
    .into();

    let body = block(
        " ",
        vec![
            if_stmt,
            for_each,
            return_stmt(Some(int_literal(arena, 1))),
        ],
        "\n    ",
    );
    let method = method_with_body("one", body, None);
    let class = class_declaration("One", vec![field, method], None);

    CompilationUnit {
        id: NodeId::random(),
        prefix: Space::empty(),
        markers: Markers::empty(),
        source_path: "com/example/One.java".into(),
        charset: Some("UTF-8".into()),
        package_declaration: Some(RightPadded::bare(package)),
        imports: vec![statement(import)],
        classes: vec![class],
        eof: ws("\n"),
    }
    .into()
}
