//! Semantic type graph.
//!
//! Type descriptors reference each other freely. A class lists its methods
//! and every method points back at its declaring class. Descriptors therefore
//! live in a [`TypeArena`] and refer to one another by [`TypeHandle`]; a cycle
//! is just two integers pointing at each other.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type handle {0} is not in this arena")]
    UnknownHandle(TypeHandle),
    #[error("unknown type kind: {0}")]
    UnknownKind(String),
    #[error("unknown primitive keyword: {0}")]
    UnknownPrimitive(String),
}

/// Index of a descriptor within a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle(pub u32);

impl std::fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Vocabularies ───────────────────────────────────────────────────────────

/// Primitive kinds, serialized by their canonical keyword spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "byte")]
    Byte,
    #[serde(rename = "char")]
    Char,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "String")]
    String,
    #[serde(rename = "None")]
    None,
    #[serde(rename = "null")]
    Null,
}

impl PrimitiveKind {
    /// Arena order; the index of a kind here is its pre-registered handle.
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Double,
        PrimitiveKind::Float,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Short,
        PrimitiveKind::Void,
        PrimitiveKind::String,
        PrimitiveKind::None,
        PrimitiveKind::Null,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Void => "void",
            PrimitiveKind::String => "String",
            PrimitiveKind::None => "None",
            PrimitiveKind::Null => "null",
        }
    }

    pub fn from_keyword(keyword: &str) -> Result<Self, TypeError> {
        Self::ALL
            .into_iter()
            .find(|k| k.keyword() == keyword)
            .ok_or_else(|| TypeError::UnknownPrimitive(keyword.to_owned()))
    }

    fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Enum,
    Interface,
    Annotation,
    Record,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

/// One `name = value` pair of an annotation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementValue {
    pub element: String,
    pub value: serde_json::Value,
}

// ── Descriptors ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub flags: u64,
    pub kind: ClassKind,
    pub fully_qualified_name: String,
    pub type_parameters: Vec<TypeHandle>,
    pub supertype: Option<TypeHandle>,
    pub owning_class: Option<TypeHandle>,
    pub annotations: Vec<TypeHandle>,
    pub interfaces: Vec<TypeHandle>,
    pub members: Vec<TypeHandle>,
    pub methods: Vec<TypeHandle>,
}

impl Class {
    pub fn new(kind: ClassKind, fully_qualified_name: impl Into<String>) -> Self {
        Self {
            flags: 0,
            kind,
            fully_qualified_name: fully_qualified_name.into(),
            type_parameters: Vec::new(),
            supertype: None,
            owning_class: None,
            annotations: Vec::new(),
            interfaces: Vec::new(),
            members: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Simple name, with nested classes separated by `.` rather than `$`.
    pub fn class_name(&self) -> String {
        let fqn = &self.fully_qualified_name;
        let start = fqn.rfind('.').map_or(0, |i| i + 1);
        fqn[start..].replace('$', ".")
    }

    pub fn package_name(&self) -> &str {
        match self.fully_qualified_name.rfind('.') {
            Some(i) => &self.fully_qualified_name[..i],
            None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameterized {
    pub ty: TypeHandle,
    pub type_parameters: Vec<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Array {
    pub elem_type: TypeHandle,
    pub annotations: Vec<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericTypeVariable {
    pub name: String,
    pub variance: Variance,
    pub bounds: Vec<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub declaring_type: TypeHandle,
    pub name: String,
    pub flags: u64,
    pub return_type: TypeHandle,
    pub parameter_names: Vec<String>,
    pub parameter_types: Vec<TypeHandle>,
    pub thrown_exceptions: Vec<TypeHandle>,
    pub annotations: Vec<TypeHandle>,
    pub default_value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub owner: Option<TypeHandle>,
    pub ty: TypeHandle,
    pub annotations: Vec<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intersection {
    pub bounds: Vec<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiCatch {
    pub throwables: Vec<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub ty: TypeHandle,
    pub values: Vec<ElementValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JavaType {
    /// Unattributed type; also the placeholder of a reserved handle.
    Unknown,
    Primitive(PrimitiveKind),
    Class(Class),
    Parameterized(Parameterized),
    Array(Array),
    GenericTypeVariable(GenericTypeVariable),
    Method(Method),
    Variable(Variable),
    Intersection(Intersection),
    MultiCatch(MultiCatch),
    Annotation(Annotation),
}

/// Variant tag of a [`JavaType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Unknown,
    Primitive,
    Class,
    Parameterized,
    Array,
    GenericTypeVariable,
    Method,
    Variable,
    Intersection,
    MultiCatch,
    Annotation,
}

impl TypeKind {
    pub const ALL: [TypeKind; 11] = [
        TypeKind::Unknown,
        TypeKind::Primitive,
        TypeKind::Class,
        TypeKind::Parameterized,
        TypeKind::Array,
        TypeKind::GenericTypeVariable,
        TypeKind::Method,
        TypeKind::Variable,
        TypeKind::Intersection,
        TypeKind::MultiCatch,
        TypeKind::Annotation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Unknown => "Unknown",
            TypeKind::Primitive => "Primitive",
            TypeKind::Class => "Class",
            TypeKind::Parameterized => "Parameterized",
            TypeKind::Array => "Array",
            TypeKind::GenericTypeVariable => "GenericTypeVariable",
            TypeKind::Method => "Method",
            TypeKind::Variable => "Variable",
            TypeKind::Intersection => "Intersection",
            TypeKind::MultiCatch => "MultiCatch",
            TypeKind::Annotation => "Annotation",
        }
    }
}

impl std::str::FromStr for TypeKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| TypeError::UnknownKind(s.to_owned()))
    }
}

impl JavaType {
    pub fn kind(&self) -> TypeKind {
        match self {
            JavaType::Unknown => TypeKind::Unknown,
            JavaType::Primitive(_) => TypeKind::Primitive,
            JavaType::Class(_) => TypeKind::Class,
            JavaType::Parameterized(_) => TypeKind::Parameterized,
            JavaType::Array(_) => TypeKind::Array,
            JavaType::GenericTypeVariable(_) => TypeKind::GenericTypeVariable,
            JavaType::Method(_) => TypeKind::Method,
            JavaType::Variable(_) => TypeKind::Variable,
            JavaType::Intersection(_) => TypeKind::Intersection,
            JavaType::MultiCatch(_) => TypeKind::MultiCatch,
            JavaType::Annotation(_) => TypeKind::Annotation,
        }
    }

    /// Rewrites every handle this descriptor references.
    pub fn map_handles(&mut self, mut f: impl FnMut(TypeHandle) -> TypeHandle) {
        for h in self.handles_mut() {
            *h = f(*h);
        }
    }

    fn handles_mut(&mut self) -> Vec<&mut TypeHandle> {
        use std::iter::once;
        match self {
            JavaType::Unknown | JavaType::Primitive(_) => Vec::new(),
            JavaType::Class(c) => c
                .type_parameters
                .iter_mut()
                .chain(c.supertype.as_mut())
                .chain(c.owning_class.as_mut())
                .chain(c.annotations.iter_mut())
                .chain(c.interfaces.iter_mut())
                .chain(c.members.iter_mut())
                .chain(c.methods.iter_mut())
                .collect(),
            JavaType::Parameterized(p) => once(&mut p.ty).chain(p.type_parameters.iter_mut()).collect(),
            JavaType::Array(a) => once(&mut a.elem_type).chain(a.annotations.iter_mut()).collect(),
            JavaType::GenericTypeVariable(g) => g.bounds.iter_mut().collect(),
            JavaType::Method(m) => once(&mut m.declaring_type)
                .chain(once(&mut m.return_type))
                .chain(m.parameter_types.iter_mut())
                .chain(m.thrown_exceptions.iter_mut())
                .chain(m.annotations.iter_mut())
                .collect(),
            JavaType::Variable(v) => v
                .owner
                .as_mut()
                .into_iter()
                .chain(once(&mut v.ty))
                .chain(v.annotations.iter_mut())
                .collect(),
            JavaType::Intersection(i) => i.bounds.iter_mut().collect(),
            JavaType::MultiCatch(m) => m.throwables.iter_mut().collect(),
            JavaType::Annotation(a) => once(&mut a.ty).collect(),
        }
    }
}

/// Identity under which equal descriptors share a handle. Classes are
/// nominal; every other kind is keyed on its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TypeKey {
    Named(ClassKind, String),
    Content(String),
}

impl TypeKey {
    fn of(ty: &JavaType) -> Option<TypeKey> {
        match ty {
            JavaType::Primitive(_) => None,
            JavaType::Class(c) => Some(TypeKey::Named(c.kind, c.fully_qualified_name.clone())),
            other => serde_json::to_string(other).ok().map(TypeKey::Content),
        }
    }
}

// ── Arena ──────────────────────────────────────────────────────────────────

/// Owner of every type descriptor reachable from a set of trees.
///
/// The first handles are pre-registered primitives, so a primitive kind has
/// the same handle in every arena. Other descriptors are interned: adding one
/// equal to a stored descriptor returns the stored handle.
#[derive(Debug, Clone)]
pub struct TypeArena {
    types: Vec<JavaType>,
    interned: IndexMap<TypeKey, TypeHandle>,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        Self {
            types: PrimitiveKind::ALL.into_iter().map(JavaType::Primitive).collect(),
            interned: IndexMap::new(),
        }
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> TypeHandle {
        TypeHandle(kind.index())
    }

    /// Stores `ty` and returns its handle. Primitives resolve to their
    /// pre-registered handle, and a descriptor equal to one already stored
    /// resolves to that one.
    pub fn add(&mut self, ty: JavaType) -> TypeHandle {
        if let JavaType::Primitive(kind) = ty {
            return self.primitive(kind);
        }
        let key = TypeKey::of(&ty);
        if let Some(&h) = key.as_ref().and_then(|k| self.interned.get(k)) {
            return h;
        }
        let handle = self.push(ty);
        if let Some(key) = key {
            self.interned.insert(key, handle);
        }
        handle
    }

    /// Allocates a placeholder so that other descriptors can reference the
    /// handle before its content is known.
    pub fn reserve(&mut self) -> TypeHandle {
        self.push(JavaType::Unknown)
    }

    pub fn fill(&mut self, handle: TypeHandle, ty: JavaType) -> Result<(), TypeError> {
        let slot = self
            .types
            .get_mut(handle.0 as usize)
            .ok_or(TypeError::UnknownHandle(handle))?;
        if let Some(key) = TypeKey::of(&ty) {
            self.interned.entry(key).or_insert(handle);
        }
        *slot = ty;
        Ok(())
    }

    /// Folds every descriptor stored at or after index `start` into an equal
    /// descriptor stored before it, then compacts the ones left. Returns the
    /// handle each of those descriptors now lives at, indexed from `start`.
    ///
    /// Classes fold by kind and name. Other kinds fold when their content is
    /// equal once the handles they reference have been folded.
    pub fn settle(&mut self, start: usize) -> Vec<TypeHandle> {
        let end = self.types.len();
        if start >= end {
            return Vec::new();
        }
        let older = |interned: &IndexMap<TypeKey, TypeHandle>, key: &TypeKey| {
            interned.get(key).copied().filter(|h| (h.0 as usize) < start)
        };

        let mut folded: Vec<Option<TypeHandle>> = vec![None; end - start];
        for i in start..end {
            if let JavaType::Class(c) = &self.types[i] {
                let key = TypeKey::Named(c.kind, c.fully_qualified_name.clone());
                folded[i - start] = older(&self.interned, &key);
            }
        }
        // Content refers to later entries, so settle those first.
        for i in (start..end).rev() {
            if matches!(self.types[i], JavaType::Class(_)) {
                continue;
            }
            let mut ty = self.types[i].clone();
            ty.map_handles(|h| match h.0 as usize {
                n if n >= start => folded[n - start].unwrap_or(h),
                _ => h,
            });
            folded[i - start] = TypeKey::of(&ty).and_then(|k| older(&self.interned, &k));
        }

        let mut next = start as u32;
        let moved: Vec<TypeHandle> = folded
            .iter()
            .map(|f| {
                f.unwrap_or_else(|| {
                    next += 1;
                    TypeHandle(next - 1)
                })
            })
            .collect();
        let tail = self.types.split_off(start);
        self.interned.retain(|_, h| (h.0 as usize) < start);
        for (mut ty, f) in tail.into_iter().zip(&folded) {
            if f.is_some() {
                continue;
            }
            ty.map_handles(|h| match h.0 as usize {
                n if n >= start => moved[n - start],
                _ => h,
            });
            let key = TypeKey::of(&ty);
            let handle = self.push(ty);
            if let Some(key) = key {
                self.interned.entry(key).or_insert(handle);
            }
        }
        moved
    }

    fn push(&mut self, ty: JavaType) -> TypeHandle {
        self.types.push(ty);
        TypeHandle(self.types.len() as u32 - 1)
    }

    pub fn get(&self, handle: TypeHandle) -> Option<&JavaType> {
        self.types.get(handle.0 as usize)
    }

    pub fn class(&self, handle: TypeHandle) -> Option<&Class> {
        match self.get(handle)? {
            JavaType::Class(c) => Some(c),
            JavaType::Parameterized(p) => self.class(p.ty),
            _ => None,
        }
    }

    pub fn method(&self, handle: TypeHandle) -> Option<&Method> {
        match self.get(handle)? {
            JavaType::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
