//! Scalar vocabularies carried by syntax nodes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    Or,
    And,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Addition => "+",
            BinaryOperator::Subtraction => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::UnsignedRightShift => ">>>",
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    Exponentiation,
    FloorDivision,
    MatrixMultiplication,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    Positive,
    Negative,
    Complement,
    Not,
}

impl UnaryOperator {
    pub fn is_modifying(self) -> bool {
        matches!(
            self,
            UnaryOperator::PreIncrement
                | UnaryOperator::PreDecrement
                | UnaryOperator::PostIncrement
                | UnaryOperator::PostDecrement
        )
    }
}

/// `case X:` statement groups versus `case X ->` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseKind {
    Statement,
    Rule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardBound {
    Extends,
    Super,
}

/// Value of a literal. The exact source spelling lives next to it in
/// `Literal::value_source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(#[serde(with = "float_token")] f64),
    Char(char),
    String(String),
}

/// JSON has no spelling for non-finite numbers, so those travel as the tokens
/// `"NaN"`, `"Infinity"` and `"-Infinity"`. Finite values stay numbers.
mod float_token {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Token(String),
    }

    pub fn serialize<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            return v.serialize(serializer);
        }
        let token = if v.is_nan() {
            "NaN"
        } else if v.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        serializer.serialize_str(token)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Token(t) => match t.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("unknown float token: {other}"))),
            },
        }
    }
}

// ── Modifiers ──────────────────────────────────────────────────────────────

/// Closed modifier vocabulary.
///
/// Peers may know modifiers this set does not. Those travel as
/// [`ModifierType::LanguageExtension`] next to their literal keyword; see
/// [`ModifierType::resolve`]. Unknown tags read from the wire also decode to
/// `LanguageExtension` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModifierType {
    Default,
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Sealed,
    NonSealed,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
    Async,
    Reified,
    Inline,
    LanguageExtension,
}

impl ModifierType {
    pub const ALL: [ModifierType; 18] = [
        ModifierType::Default,
        ModifierType::Public,
        ModifierType::Protected,
        ModifierType::Private,
        ModifierType::Abstract,
        ModifierType::Static,
        ModifierType::Final,
        ModifierType::Sealed,
        ModifierType::NonSealed,
        ModifierType::Transient,
        ModifierType::Volatile,
        ModifierType::Synchronized,
        ModifierType::Native,
        ModifierType::Strictfp,
        ModifierType::Async,
        ModifierType::Reified,
        ModifierType::Inline,
        ModifierType::LanguageExtension,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModifierType::Default => "Default",
            ModifierType::Public => "Public",
            ModifierType::Protected => "Protected",
            ModifierType::Private => "Private",
            ModifierType::Abstract => "Abstract",
            ModifierType::Static => "Static",
            ModifierType::Final => "Final",
            ModifierType::Sealed => "Sealed",
            ModifierType::NonSealed => "NonSealed",
            ModifierType::Transient => "Transient",
            ModifierType::Volatile => "Volatile",
            ModifierType::Synchronized => "Synchronized",
            ModifierType::Native => "Native",
            ModifierType::Strictfp => "Strictfp",
            ModifierType::Async => "Async",
            ModifierType::Reified => "Reified",
            ModifierType::Inline => "Inline",
            ModifierType::LanguageExtension => "LanguageExtension",
        }
    }

    /// Canonical source keyword, if the concept has one.
    pub fn keyword(self) -> Option<&'static str> {
        Some(match self {
            ModifierType::Default => "default",
            ModifierType::Public => "public",
            ModifierType::Protected => "protected",
            ModifierType::Private => "private",
            ModifierType::Abstract => "abstract",
            ModifierType::Static => "static",
            ModifierType::Final => "final",
            ModifierType::Sealed => "sealed",
            ModifierType::NonSealed => "non-sealed",
            ModifierType::Transient => "transient",
            ModifierType::Volatile => "volatile",
            ModifierType::Synchronized => "synchronized",
            ModifierType::Native => "native",
            ModifierType::Strictfp => "strictfp",
            ModifierType::Async => "async",
            ModifierType::Reified => "reified",
            ModifierType::Inline => "inline",
            ModifierType::LanguageExtension => return None,
        })
    }

    /// Maps a source keyword back to a concept of this vocabulary.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.keyword() == Some(keyword))
    }

    /// Settles an extension modifier: if its keyword names a concept of this
    /// vocabulary the concept wins, otherwise the extension (and its raw
    /// keyword) is kept for printing.
    pub fn resolve(self, keyword: Option<&str>) -> Self {
        match self {
            ModifierType::LanguageExtension => keyword
                .and_then(Self::from_keyword)
                .unwrap_or(ModifierType::LanguageExtension),
            other => other,
        }
    }
}

impl From<String> for ModifierType {
    fn from(name: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == name)
            .unwrap_or(ModifierType::LanguageExtension)
    }
}

impl From<ModifierType> for String {
    fn from(m: ModifierType) -> Self {
        m.name().to_owned()
    }
}
