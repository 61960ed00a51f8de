//! Value, Type, and Operator algebra.
//!
//! `Type` is structural rather than nominal: two `Type`s compare equal (and
//! order) by shape alone, with no registry or interning. Arrays and structs
//! own their element/field types directly -- the language admits no
//! recursive type definitions, so there is no cycle to break with an
//! indirection layer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A literal value. `F32`/`F64` both store as `f64`; the literal's
/// `LiteralType` (see [`crate::node::LiteralType`]) disambiguates which
/// primitive width it denotes. `f64` does not implement `Eq`, so total
/// ordering and equality treat `NaN` by bit pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Unknown,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Char(char),
}

impl Value {
    /// Deterministic string form used by both the AST stringifier and test
    /// fixtures: bool as `true`/`false`, numbers base-10, strings unquoted,
    /// the monostate as the literal token `__unknown__`.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Unknown => "__unknown__".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::I64(i) => i.to_string(),
            Value::F64(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Char(c) => c.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Unknown => 0,
                Value::Bool(_) => 1,
                Value::I64(_) => 2,
                Value::F64(_) => 3,
                Value::String(_) => 4,
                Value::Char(_) => 5,
            }
        }
        match (self, other) {
            (Value::Unknown, Value::Unknown) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::I64(a), Value::I64(b)) => a.partial_cmp(b),
            (Value::F64(a), Value::F64(b)) => a.partial_cmp(b).or_else(|| {
                // Order NaNs consistently rather than treating them as
                // incomparable -- Value must be totally comparable.
                Some(a.to_bits().cmp(&b.to_bits()))
            }),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Char(a), Value::Char(b)) => a.partial_cmp(b),
            _ => rank(self).partial_cmp(&rank(other)),
        }
    }
}

/// Primitive type kinds. Declaration order doubles as the cast lattice's
/// row/column order and the total order's tiebreak for `Type::Primitive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Unknown,
    Void,
    Boolean,
    Char,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimitiveKind::Unknown => "__unknown__",
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::String => "string",
        };
        write!(f, "{s}")
    }
}

/// The type algebra: primitive, array, or struct, compared and ordered
/// structurally (no nominal identity).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveKind),
    Array(Box<Type>),
    Struct(Vec<Type>),
}

impl Type {
    pub fn unknown() -> Self {
        Type::Primitive(PrimitiveKind::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Unknown))
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(k) => Some(*k),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(k) => write!(f, "{k}"),
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::Struct(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// One cell of the cast lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastKind {
    Implicit,
    Explicit,
    Impossible,
}

/// The static `(from, to) -> CastKind` table for primitive casts. Equality
/// is always `Implicit`; array casts delegate to element type (handled by
/// the caller, see `TypeResolverVisitor`); struct casts are always
/// `Impossible`.
pub fn cast_kind(from: PrimitiveKind, to: PrimitiveKind) -> CastKind {
    use CastKind::{Explicit, Impossible, Implicit};
    use PrimitiveKind::{Boolean, Char, Float32, Float64, Int32, Int64, String as Str};

    if from == to {
        return Implicit;
    }

    match (from, to) {
        (Boolean, Int32) => Explicit,
        (Boolean, Int64) => Explicit,
        (Boolean, Str) => Explicit,

        (Char, Str) => Implicit,

        (Float32, Boolean) => Explicit,
        (Float32, Float64) => Implicit,
        (Float32, Int32) => Explicit,
        (Float32, Int64) => Explicit,
        (Float32, Str) => Explicit,

        (Float64, Float32) => Explicit,
        (Float64, Int32) => Explicit,
        (Float64, Int64) => Explicit,
        (Float64, Str) => Explicit,

        (Int32, Boolean) => Explicit,
        (Int32, Float32) => Implicit,
        (Int32, Float64) => Implicit,
        (Int32, Int64) => Implicit,
        (Int32, Str) => Explicit,

        (Int64, Boolean) => Explicit,
        (Int64, Float32) => Implicit,
        (Int64, Float64) => Implicit,
        (Int64, Int32) => Explicit,
        (Int64, Str) => Explicit,

        (Str, Float32) => Explicit,
        (Str, Float64) => Explicit,
        (Str, Int32) => Explicit,
        (Str, Int64) => Explicit,

        _ => Impossible,
    }
}

/// The cast lattice applied structurally: primitives delegate to
/// `cast_kind`; arrays delegate to their element type; any cast touching a
/// struct is `Impossible`.
pub fn type_cast_kind(from: &Type, to: &Type) -> CastKind {
    if from == to {
        return CastKind::Implicit;
    }
    match (from, to) {
        (Type::Primitive(f), Type::Primitive(t)) => cast_kind(*f, *t),
        (Type::Array(f), Type::Array(t)) => type_cast_kind(f, t),
        _ => CastKind::Impossible,
    }
}

/// The narrowest type both `a` and `b` can be implicitly cast to, if one
/// exists. Used for arithmetic result-type widening (see
/// `TypeResolverVisitor::visit_binary`).
pub fn common_implicit_type(a: PrimitiveKind, b: PrimitiveKind) -> Option<PrimitiveKind> {
    if a == b {
        return Some(a);
    }
    let candidates = [a, b];
    for &candidate in &candidates {
        if cast_kind(a, candidate) == CastKind::Implicit && cast_kind(b, candidate) == CastKind::Implicit
        {
            return Some(candidate);
        }
    }
    None
}

/// Operators, each with a canonical short display name and an internal
/// name used by the IR/AST printers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    PreIncrement,
    PostIncrement,
    PreDecrement,
    PostDecrement,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    Assign,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    LogicalNot,
    LogicalAnd,
    LogicalOr,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::PreIncrement | Operator::PostIncrement => "++",
            Operator::PreDecrement | Operator::PostDecrement => "--",
            Operator::AddAssign => "+=",
            Operator::SubAssign => "-=",
            Operator::MulAssign => "*=",
            Operator::DivAssign => "/=",
            Operator::ModAssign => "%=",
            Operator::Assign => "=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::LogicalNot => "!",
            Operator::LogicalAnd => "&&",
            Operator::LogicalOr => "||",
        }
    }

    pub fn internal_name(&self) -> &'static str {
        match self {
            Operator::Add => "operator_add",
            Operator::Sub => "operator_sub",
            Operator::Mul => "operator_mul",
            Operator::Div => "operator_div",
            Operator::Mod => "operator_mod",
            Operator::PreIncrement => "operator_pre_increment",
            Operator::PostIncrement => "operator_post_increment",
            Operator::PreDecrement => "operator_pre_decrement",
            Operator::PostDecrement => "operator_post_decrement",
            Operator::AddAssign => "operator_add_assign",
            Operator::SubAssign => "operator_sub_assign",
            Operator::MulAssign => "operator_mul_assign",
            Operator::DivAssign => "operator_div_assign",
            Operator::ModAssign => "operator_mod_assign",
            Operator::Assign => "operator_assign",
            Operator::Equal => "operator_equal",
            Operator::NotEqual => "operator_not_equal",
            Operator::Greater => "operator_greater",
            Operator::GreaterEqual => "operator_greater_equal",
            Operator::Less => "operator_less",
            Operator::LessEqual => "operator_less_equal",
            Operator::LogicalNot => "operator_logical_not",
            Operator::LogicalAnd => "operator_logical_and",
            Operator::LogicalOr => "operator_logical_or",
        }
    }

    /// The non-assign arithmetic operator underlying a compound-assign
    /// operator, used by `DesugarVisitor`.
    pub fn underlying_arithmetic(&self) -> Option<Operator> {
        match self {
            Operator::AddAssign => Some(Operator::Add),
            Operator::SubAssign => Some(Operator::Sub),
            Operator::MulAssign => Some(Operator::Mul),
            Operator::DivAssign => Some(Operator::Div),
            Operator::ModAssign => Some(Operator::Mod),
            _ => None,
        }
    }

    pub fn is_compound_assign(&self) -> bool {
        self.underlying_arithmetic().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_display() {
        assert_eq!(Type::Primitive(PrimitiveKind::Boolean).to_string(), "bool");
        assert_eq!(Type::Primitive(PrimitiveKind::Unknown).to_string(), "__unknown__");
    }

    #[test]
    fn array_display() {
        let arr = Type::Array(Box::new(Type::Primitive(PrimitiveKind::Int32)));
        assert_eq!(arr.to_string(), "int32[]");
    }

    #[test]
    fn struct_display() {
        let s = Type::Struct(vec![
            Type::Primitive(PrimitiveKind::Int32),
            Type::Primitive(PrimitiveKind::String),
        ]);
        assert_eq!(s.to_string(), "(int32, string)");
    }

    #[test]
    fn cast_lattice_matches_published_table() {
        use CastKind::*;
        use PrimitiveKind::*;
        assert_eq!(cast_kind(Boolean, Boolean), Implicit);
        assert_eq!(cast_kind(Boolean, Int32), Explicit);
        assert_eq!(cast_kind(Boolean, Char), Impossible);
        assert_eq!(cast_kind(Char, String), Implicit);
        assert_eq!(cast_kind(Float32, Float64), Implicit);
        assert_eq!(cast_kind(Float64, Float32), Explicit);
        assert_eq!(cast_kind(Int32, Int64), Implicit);
        assert_eq!(cast_kind(Int64, Int32), Explicit);
        assert_eq!(cast_kind(String, Int32), Explicit);
        assert_eq!(cast_kind(String, Char), Impossible);
    }

    #[test]
    fn type_total_order() {
        let a = Type::Primitive(PrimitiveKind::Boolean);
        let b = Type::Primitive(PrimitiveKind::Int32);
        assert!(a < b);
    }

    #[test]
    fn common_implicit_type_widens_within_family() {
        assert_eq!(
            common_implicit_type(PrimitiveKind::Int32, PrimitiveKind::Int64),
            Some(PrimitiveKind::Int64)
        );
        assert_eq!(
            common_implicit_type(PrimitiveKind::Int32, PrimitiveKind::String),
            None
        );
    }

    #[test]
    fn operator_names() {
        assert_eq!(Operator::Add.symbol(), "+");
        assert_eq!(Operator::Add.internal_name(), "operator_add");
        assert_eq!(Operator::AddAssign.underlying_arithmetic(), Some(Operator::Add));
        assert!(Operator::AddAssign.is_compound_assign());
        assert!(!Operator::Add.is_compound_assign());
    }
}
