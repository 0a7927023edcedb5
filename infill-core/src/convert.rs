use alloc::string::String;
use core::fmt;

use crate::{FieldPath, Map, PathSegment, Value};

/// Conversion from a dynamic [`Value`] into a typed Rust value.
///
/// Records implement this (usually through generated code) on top of [`Fields`];
/// `core`/`alloc` types have impls in this crate.
pub trait FromValue: Sized {
    /// Converts `value`, failing if its kind doesn't match.
    fn from_value(value: Value) -> Result<Self, ConvertError>;

    /// The value to use when a record field is absent altogether, if absence is acceptable.
    fn from_missing() -> Option<Self> {
        None
    }
}

/// Error returned when a [`Value`] can't be converted to a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    /// Where in the value the conversion failed
    pub path: FieldPath,
    /// What went wrong
    pub kind: ConvertErrorKind,
}

/// What went wrong during a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConvertErrorKind {
    /// The value had the wrong kind
    Mismatch {
        /// what the target type accepts
        expected: &'static str,
        /// the kind of value that was found
        found: &'static str,
    },
    /// The value has the right kind but doesn't fit the target type
    OutOfRange {
        /// the target type
        target: &'static str,
    },
    /// A field without a fallback was absent
    Missing,
}

impl ConvertError {
    /// A kind mismatch at the current location
    pub fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self {
            path: FieldPath::root(),
            kind: ConvertErrorKind::Mismatch {
                expected,
                found: found.kind_name(),
            },
        }
    }

    /// An out-of-range value at the current location
    pub fn out_of_range(target: &'static str) -> Self {
        Self {
            path: FieldPath::root(),
            kind: ConvertErrorKind::OutOfRange { target },
        }
    }

    /// A missing field
    pub fn missing(field: &str) -> Self {
        Self {
            path: FieldPath::root().field(field),
            kind: ConvertErrorKind::Missing,
        }
    }

    /// Re-roots this error one level deeper, under `segment`
    pub fn within(self, segment: PathSegment) -> Self {
        Self {
            path: self.path.prefixed(&FieldPath::from(alloc::vec![segment])),
            kind: self.kind,
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConvertErrorKind::Mismatch { expected, found } => {
                write!(f, "at {}: expected {expected}, found {found}", self.path)
            }
            ConvertErrorKind::OutOfRange { target } => {
                write!(f, "at {}: value out of range for {target}", self.path)
            }
            ConvertErrorKind::Missing => write!(f, "at {}: missing field", self.path),
        }
    }
}

impl core::error::Error for ConvertError {}

/// The fields of a record value, handed out one at a time to typed conversions.
///
/// ```
/// use infill_core::{ConvertError, Fields, FromValue, Value, map};
///
/// struct Pet {
///     name: String,
///     nickname: Option<String>,
/// }
///
/// impl FromValue for Pet {
///     fn from_value(value: Value) -> Result<Self, ConvertError> {
///         let mut fields = Fields::new(value)?;
///         Ok(Pet {
///             name: fields.take("name")?,
///             nickname: fields.take("nickname")?,
///         })
///     }
/// }
///
/// let pet = Pet::from_value(map! { "name" => "Rex" }).unwrap();
/// assert_eq!(pet.name, "Rex");
/// assert_eq!(pet.nickname, None);
/// ```
#[derive(Debug)]
pub struct Fields {
    map: Map,
}

impl Fields {
    /// Unwraps a map value, failing for any other kind
    pub fn new(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Map(map) => Ok(Self { map }),
            other => Err(ConvertError::mismatch("map", &other)),
        }
    }

    /// Removes and converts the field `name`
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T, ConvertError> {
        match self.map.remove(name) {
            Some(value) => T::from_value(value)
                .map_err(|e| e.within(PathSegment::Field(String::from(name)))),
            None => T::from_missing().ok_or_else(|| ConvertError::missing(name)),
        }
    }
}
