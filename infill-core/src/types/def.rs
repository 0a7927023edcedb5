use core::fmt;

use super::RecordDef;

/// The declared type of a field, as the schema compiler emitted it.
///
/// This is deliberately wider than what incremental filling supports: maps and unions can be
/// declared here, and are rejected when the record is described.
#[derive(Clone, Copy)]
#[non_exhaustive]
pub enum TypeDef {
    /// A leaf value
    ///
    /// e.g. `String`, `i64`, `bool`
    Scalar(ScalarType),

    /// Another record, nested in place
    ///
    /// The definition is behind a function so records can refer to each other
    /// regardless of declaration order.
    Record(fn() -> &'static RecordDef),

    /// Variable-size homogeneous sequence
    ///
    /// e.g. `Vec<T>`
    List(&'static TypeDef),

    /// May be `null`
    ///
    /// e.g. `Option<T>`
    Option(&'static TypeDef),

    /// String keys to homogeneous values
    ///
    /// e.g. `HashMap<String, T>`
    Map(&'static TypeDef),

    /// One of several types
    ///
    /// e.g. `Union[int, str]` in a source schema
    Union(&'static [TypeDef]),
}

impl TypeDef {
    /// A string field
    pub const STRING: TypeDef = TypeDef::Scalar(ScalarType::String);
    /// An integer field
    pub const INT: TypeDef = TypeDef::Scalar(ScalarType::Int);
    /// A floating-point field
    pub const FLOAT: TypeDef = TypeDef::Scalar(ScalarType::Float);
    /// A boolean field
    pub const BOOL: TypeDef = TypeDef::Scalar(ScalarType::Bool);

    /// Returns true if this is a scalar type
    pub const fn is_scalar(&self) -> bool {
        matches!(self, TypeDef::Scalar(_))
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDef::Scalar(scalar) => write!(f, "{scalar}"),
            TypeDef::Record(def) => write!(f, "{}", def().type_name),
            TypeDef::List(inner) => write!(f, "list<{inner:?}>"),
            TypeDef::Option(inner) => write!(f, "option<{inner:?}>"),
            TypeDef::Map(inner) => write!(f, "map<{inner:?}>"),
            TypeDef::Union(members) => {
                write!(f, "union<")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{member:?}")?;
                }
                write!(f, ">")
            }
        }
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The type of a leaf value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum ScalarType {
    /// UTF-8 text
    String,
    /// Signed 64-bit integer. Floats without a fractional part are accepted.
    Int,
    /// 64-bit float. Integers are accepted.
    Float,
    /// `true` or `false`
    Bool,
    /// A string restricted to the given variants
    Enum(&'static [&'static str]),
}

impl ScalarType {
    /// Name used when reporting a type mismatch
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
            ScalarType::Enum(_) => "enum",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Enum(variants) => {
                write!(f, "enum(")?;
                for (i, variant) in variants.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{variant}")?;
                }
                write!(f, ")")
            }
            other => f.write_str(other.name()),
        }
    }
}
