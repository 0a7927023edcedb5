use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use infill_core::{ConvertError, FieldPath};
use owo_colors::OwoColorize;

use crate::RejectReason;

/// Errors raised while turning a record definition into a schema descriptor.
///
/// These are definition bugs: no input can provoke them.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum SchemaError {
    /// The field's declared type can't be filled incrementally (maps, unions, nested lists...)
    UnsupportedType {
        /// The record declaring the field
        record: &'static str,
        /// The field's name
        field: &'static str,
        /// The declared type, rendered
        ty: String,
    },

    /// Two fields answer to the same input key, through their names or aliases
    DuplicateKey {
        /// The record declaring the fields
        record: &'static str,
        /// The key claimed twice
        key: &'static str,
    },

    /// A record contains itself, directly or through other records
    RecursiveRecord {
        /// The records on the cycle, outermost first
        cycle: Vec<&'static str>,
    },

    /// An enum field declares no variants
    EmptyEnum {
        /// The record declaring the field
        record: &'static str,
        /// The field's name
        field: &'static str,
    },

    /// A field carries flags that make no sense for its type
    InvalidFlags {
        /// The record declaring the field
        record: &'static str,
        /// The field's name
        field: &'static str,
        /// What's wrong with them
        reason: &'static str,
    },

    /// A default factory produced a value that doesn't fit the field
    InvalidDefault {
        /// The record declaring the field
        record: &'static str,
        /// The field's name
        field: &'static str,
        /// The problems found in the produced value
        violations: Violations,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnsupportedType { record, field, ty } => write!(
                f,
                "Field '{}::{}' has type {}, which can't be filled incrementally",
                record.blue(),
                field.yellow(),
                ty.red()
            ),
            SchemaError::DuplicateKey { record, key } => write!(
                f,
                "Record '{}' has more than one field answering to '{}'",
                record.blue(),
                key.red()
            ),
            SchemaError::RecursiveRecord { cycle } => {
                write!(f, "Record contains itself: ")?;
                for (i, name) in cycle.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{}", name.blue())?;
                }
                Ok(())
            }
            SchemaError::EmptyEnum { record, field } => write!(
                f,
                "Enum field '{}::{}' declares no variants",
                record.blue(),
                field.yellow()
            ),
            SchemaError::InvalidFlags {
                record,
                field,
                reason,
            } => write!(
                f,
                "Field '{}::{}' has invalid flags: {}",
                record.blue(),
                field.yellow(),
                reason.red()
            ),
            SchemaError::InvalidDefault {
                record,
                field,
                violations,
            } => write!(
                f,
                "Default for '{}::{}' is invalid: {}",
                record.blue(),
                field.yellow(),
                violations
            ),
        }
    }
}

impl core::error::Error for SchemaError {}

/// The top-level input handed to `apply` wasn't a mapping.
///
/// Nested values of the wrong kind are rejected per field instead, in the fill report.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MalformedInputError {
    /// What was handed in instead, e.g. `list`
    pub found: &'static str,
}

impl fmt::Display for MalformedInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Malformed input: expected {}, but got {}",
            "map".green(),
            self.found.red()
        )
    }
}

impl core::error::Error for MalformedInputError {}

/// A path doesn't address any field of the schema.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UnknownPathError {
    /// The record the path was resolved against
    pub record: &'static str,
    /// The offending path, as given
    pub path: String,
}

impl fmt::Display for UnknownPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No field at '{}' in record '{}'",
            self.path.red(),
            self.record.blue()
        )
    }
}

impl core::error::Error for UnknownPathError {}

/// A tracker update was refused.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TrackerError {
    /// The path isn't part of the schema
    UnknownPath(UnknownPathError),

    /// An explicitly provided value can't turn back into a default
    Demotion {
        /// The explicitly filled path
        path: FieldPath,
    },
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::UnknownPath(inner) => inner.fmt(f),
            TrackerError::Demotion { path } => write!(
                f,
                "Field '{}' was filled explicitly and can't be marked as defaulted",
                path.yellow()
            ),
        }
    }
}

impl core::error::Error for TrackerError {}

impl From<UnknownPathError> for TrackerError {
    fn from(value: UnknownPathError) -> Self {
        TrackerError::UnknownPath(value)
    }
}

/// Finalization was attempted while required fields were still unset.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IncompleteError {
    /// The record being built
    pub record: &'static str,
    /// Every required path that's still unset
    pub missing: BTreeSet<FieldPath>,
}

impl fmt::Display for IncompleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record '{}' is incomplete, missing: ", self.record.blue())?;
        for (i, path) in self.missing.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", path.red())?;
        }
        Ok(())
    }
}

impl core::error::Error for IncompleteError {}

/// Errors from finalizing a builder.
#[derive(Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum FinalizeError {
    /// Required fields are still unset
    Incomplete(IncompleteError),

    /// The complete value didn't convert into the target type
    Convert(ConvertError),
}

impl fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalizeError::Incomplete(inner) => inner.fmt(f),
            FinalizeError::Convert(inner) => {
                write!(f, "Conversion failed: {}", inner.red())
            }
        }
    }
}

impl core::error::Error for FinalizeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            FinalizeError::Incomplete(inner) => Some(inner),
            FinalizeError::Convert(inner) => Some(inner),
        }
    }
}

impl From<IncompleteError> for FinalizeError {
    fn from(value: IncompleteError) -> Self {
        FinalizeError::Incomplete(value)
    }
}

impl From<ConvertError> for FinalizeError {
    fn from(value: ConvertError) -> Self {
        FinalizeError::Convert(value)
    }
}

/// One problem found while validating a complete value against a schema.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Violation {
    /// Where the problem is
    pub path: FieldPath,
    /// What the problem is
    pub kind: ViolationKind,
}

/// The kinds of [`Violation`]
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum ViolationKind {
    /// A required field is absent
    Missing,
    /// A key the schema doesn't declare
    Unknown,
    /// A value the field doesn't accept
    Rejected(RejectReason),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: missing", self.path.yellow()),
            ViolationKind::Unknown => write!(f, "{}: unknown field", self.path.yellow()),
            ViolationKind::Rejected(reason) => write!(f, "{}: {}", self.path.yellow(), reason),
        }
    }
}

/// Everything wrong with a value, in the order it was found.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    /// Returns true if nothing was found
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the violations
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, path: FieldPath, kind: ViolationKind) {
        self.0.push(Violation { path, kind });
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl core::error::Error for Violations {}
