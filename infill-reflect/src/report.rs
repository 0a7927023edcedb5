use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use core::fmt;

use infill_core::FieldPath;

/// Why a single value in an input was not accepted.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum RejectReason {
    /// The value's kind doesn't match the field's type
    TypeMismatch {
        /// What the field accepts, e.g. `int` or `map`
        expected: String,
        /// The kind of value that was given
        found: &'static str,
    },

    /// A string that isn't one of the enum's variants
    NotAVariant {
        /// The string that was given
        found: String,
        /// The variants the field accepts
        variants: &'static [&'static str],
    },

    /// An empty list for a field that must hold at least one element
    EmptySequence,

    /// A list element past a rejected one; accepting it would leave a hole
    IndexGap {
        /// The first index that couldn't be filled
        first_missing: usize,
    },
}

impl RejectReason {
    /// A stable, machine-readable code for this reason
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TypeMismatch { .. } => "type_mismatch",
            RejectReason::NotAVariant { .. } => "not_a_variant",
            RejectReason::EmptySequence => "empty_sequence",
            RejectReason::IndexGap { .. } => "index_gap",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TypeMismatch { expected, found } => {
                write!(f, "type_mismatch (expected {expected}, found {found})")
            }
            RejectReason::NotAVariant { found, variants } => {
                write!(f, "not_a_variant ({found:?} is not one of {variants:?})")
            }
            RejectReason::EmptySequence => write!(f, "empty_sequence"),
            RejectReason::IndexGap { first_missing } => {
                write!(f, "index_gap (index {first_missing} was not filled)")
            }
        }
    }
}

/// The outcome of one fill operation (or of initialization).
///
/// Every key of the input ends up in exactly one of `accepted`, `rejected` or `unknown_keys`,
/// at the path of the deepest value it touched. A report is a snapshot: it is never updated
/// after it's handed out.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FillReport {
    pub(crate) accepted: BTreeSet<FieldPath>,
    pub(crate) rejected: BTreeMap<FieldPath, RejectReason>,
    pub(crate) unknown_keys: BTreeSet<FieldPath>,
    pub(crate) defaults_applied: BTreeSet<FieldPath>,
    pub(crate) cleared: BTreeSet<FieldPath>,
}

impl FillReport {
    /// Paths whose values were stored and are now filled explicitly
    pub fn accepted(&self) -> &BTreeSet<FieldPath> {
        &self.accepted
    }

    /// Paths whose values were refused, with the reason. Nothing was stored there.
    pub fn rejected(&self) -> &BTreeMap<FieldPath, RejectReason> {
        &self.rejected
    }

    /// Input keys that don't name any field, at the path they were found
    pub fn unknown_keys(&self) -> &BTreeSet<FieldPath> {
        &self.unknown_keys
    }

    /// Paths that became filled from a default during this operation
    pub fn defaults_applied(&self) -> &BTreeSet<FieldPath> {
        &self.defaults_applied
    }

    /// Paths that an explicit `null` returned to unset
    pub fn cleared(&self) -> &BTreeSet<FieldPath> {
        &self.cleared
    }

    /// Returns true if nothing was rejected and every key was known
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.unknown_keys.is_empty()
    }

    /// Returns true if the operation changed nothing
    pub fn is_noop(&self) -> bool {
        self.accepted.is_empty() && self.defaults_applied.is_empty() && self.cleared.is_empty()
    }

    /// Renders a one-line human readable summary
    pub fn summary(&self) -> String {
        use core::fmt::Write;

        let mut out = String::new();
        let _ = write!(
            out,
            "{} accepted, {} rejected, {} unknown, {} defaulted",
            self.accepted.len(),
            self.rejected.len(),
            self.unknown_keys.len(),
            self.defaults_applied.len()
        );
        if !self.cleared.is_empty() {
            let _ = write!(out, ", {} cleared", self.cleared.len());
        }
        out
    }
}

impl fmt::Display for FillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for path in &self.accepted {
            writeln!(f, "  + {path}")?;
        }
        for (path, reason) in &self.rejected {
            writeln!(f, "  ! {path}: {reason}")?;
        }
        for path in &self.unknown_keys {
            writeln!(f, "  ? {path}")?;
        }
        for path in &self.defaults_applied {
            writeln!(f, "  ~ {path}")?;
        }
        for path in &self.cleared {
            writeln!(f, "  - {path}")?;
        }
        Ok(())
    }
}
