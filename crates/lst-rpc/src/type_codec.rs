//! Field order of type descriptors.
//!
//! A descriptor's content is sent once per exchange, the first time its
//! handle is referenced; later references carry only the slot number (see
//! [`Side::type_ref`]). Content is therefore always walked without a
//! baseline.

use lst_tree::types::{
    Annotation, Array, Class, GenericTypeVariable, Intersection, Method, MultiCatch,
    Parameterized, Variable,
};
use lst_tree::{JavaType, PrimitiveKind, TypeKind};

use crate::error::SyncError;
use crate::field::Side;

/// Required descriptor field.
macro_rules! req {
    ($s:ident, $a:ident, $f:ident) => {
        $s.required($a.map(|t| &t.$f), None)?
    };
}

/// `Option` descriptor field.
macro_rules! opt {
    ($s:ident, $a:ident, $f:ident) => {
        $s.field($a.and_then(|t| t.$f.as_ref()), None)?
    };
}

/// Views a descriptor as one variant, for the sending side.
macro_rules! variant {
    ($after:ident, $variant:ident) => {
        $after.and_then(|t| match t {
            JavaType::$variant(inner) => Some(inner),
            _ => None,
        })
    };
}

/// Synchronizes the content of a descriptor of `kind`. `after` is only set on
/// the sending side.
pub fn walk_type<S: Side>(
    s: &mut S,
    kind: TypeKind,
    after: Option<&JavaType>,
) -> Result<JavaType, SyncError> {
    Ok(match kind {
        TypeKind::Unknown => JavaType::Unknown,
        TypeKind::Primitive => {
            let keyword = variant!(after, Primitive).map(|k| k.keyword().to_owned());
            let keyword: String = s.required(keyword.as_ref(), None)?;
            JavaType::Primitive(PrimitiveKind::from_keyword(&keyword)?)
        }
        TypeKind::Class => {
            let a = variant!(after, Class);
            JavaType::Class(Class {
                flags: req!(s, a, flags),
                kind: req!(s, a, kind),
                fully_qualified_name: req!(s, a, fully_qualified_name),
                type_parameters: req!(s, a, type_parameters),
                supertype: opt!(s, a, supertype),
                owning_class: opt!(s, a, owning_class),
                annotations: req!(s, a, annotations),
                interfaces: req!(s, a, interfaces),
                members: req!(s, a, members),
                methods: req!(s, a, methods),
            })
        }
        TypeKind::Parameterized => {
            let a = variant!(after, Parameterized);
            JavaType::Parameterized(Parameterized {
                ty: req!(s, a, ty),
                type_parameters: req!(s, a, type_parameters),
            })
        }
        TypeKind::Array => {
            let a = variant!(after, Array);
            JavaType::Array(Array {
                elem_type: req!(s, a, elem_type),
                annotations: req!(s, a, annotations),
            })
        }
        TypeKind::GenericTypeVariable => {
            let a = variant!(after, GenericTypeVariable);
            JavaType::GenericTypeVariable(GenericTypeVariable {
                name: req!(s, a, name),
                variance: req!(s, a, variance),
                bounds: req!(s, a, bounds),
            })
        }
        TypeKind::Method => {
            let a = variant!(after, Method);
            JavaType::Method(Method {
                declaring_type: req!(s, a, declaring_type),
                name: req!(s, a, name),
                flags: req!(s, a, flags),
                return_type: req!(s, a, return_type),
                parameter_names: req!(s, a, parameter_names),
                parameter_types: req!(s, a, parameter_types),
                thrown_exceptions: req!(s, a, thrown_exceptions),
                annotations: req!(s, a, annotations),
                default_value: req!(s, a, default_value),
            })
        }
        TypeKind::Variable => {
            let a = variant!(after, Variable);
            JavaType::Variable(Variable {
                name: req!(s, a, name),
                owner: opt!(s, a, owner),
                ty: req!(s, a, ty),
                annotations: req!(s, a, annotations),
            })
        }
        TypeKind::Intersection => {
            let a = variant!(after, Intersection);
            JavaType::Intersection(Intersection {
                bounds: req!(s, a, bounds),
            })
        }
        TypeKind::MultiCatch => {
            let a = variant!(after, MultiCatch);
            JavaType::MultiCatch(MultiCatch {
                throwables: req!(s, a, throwables),
            })
        }
        TypeKind::Annotation => {
            let a = variant!(after, Annotation);
            JavaType::Annotation(Annotation {
                ty: req!(s, a, ty),
                values: req!(s, a, values),
            })
        }
    })
}
