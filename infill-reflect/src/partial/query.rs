use alloc::string::ToString;
use alloc::vec::Vec;

use infill_core::{FieldPath, Value};

use super::Partial;
use crate::{FieldKind, FieldStatus, UnknownPathError};

/// How [`Partial::find_set`] matches a key against paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// The key is a full path
    #[default]
    Exact,
    /// The key is a full path, or else the tail of one (`city` finds `address.city`)
    Suffix,
}

/// Everything known about one tracked path
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct FieldOverview {
    /// The path
    pub path: FieldPath,
    /// Kind of the field the path belongs to
    pub kind: FieldKind,
    /// True if the path is one element of a list
    pub element: bool,
    /// Whether a complete record must have it (never true for list elements)
    pub required: bool,
    /// Whether the value should stay out of human-readable output
    pub sensitive: bool,
    /// A fresh copy of the field's default, if it has one
    pub default: Option<Value>,
    /// Where the current value came from
    pub status: FieldStatus,
    /// The current value, if there is one
    pub value: Option<Value>,
}

impl Partial {
    /// The current value at `path`, if there is one
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        self.value.pointer(path)
    }

    /// One entry for every tracked path, in path order.
    pub fn fields(&self) -> Vec<FieldOverview> {
        self.tracker
            .entries()
            .filter_map(|(path, status)| {
                let resolved = self.schema.resolve(path).ok()?;
                let spec = resolved.spec;
                Some(FieldOverview {
                    path: path.clone(),
                    kind: spec.kind,
                    element: resolved.element,
                    required: spec.required && !resolved.element,
                    sensitive: spec.sensitive,
                    default: if resolved.element {
                        None
                    } else {
                        spec.default.map(|d| d.produce())
                    },
                    status,
                    value: self.get(path).cloned(),
                })
            })
            .collect()
    }

    /// Finds a value the caller has set, by path.
    ///
    /// `key` is a path like `address.city`. With [`MatchMode::Suffix`], if nothing is set at
    /// exactly that path, the first set path ending with it is used, preferring leaf values
    /// over records and lists of records.
    ///
    /// Returns `None` if the key names a declared field that isn't set, and fails if it names
    /// nothing the schema declares.
    pub fn find_set(
        &self,
        key: &str,
        mode: MatchMode,
    ) -> Result<Option<(FieldPath, &Value)>, UnknownPathError> {
        let unknown = || UnknownPathError {
            record: self.schema.type_name,
            path: key.to_string(),
        };
        let path: FieldPath = key.parse().map_err(|_| unknown())?;
        let declared = self.schema.resolve(&path).is_ok();

        if declared && self.tracker.get(&path).is_caller_provided() {
            if let Some(value) = self.get(&path) {
                return Ok(Some((path, value)));
            }
        }

        if mode == MatchMode::Suffix && !path.is_root() {
            let mut leaf = None;
            let mut container = None;
            for (candidate, status) in self.tracker.entries() {
                if !status.is_caller_provided() || !candidate.segments().ends_with(path.segments())
                {
                    continue;
                }
                let Ok(resolved) = self.schema.resolve(candidate) else {
                    continue;
                };
                let slot = if resolved.is_leaf() {
                    &mut leaf
                } else {
                    &mut container
                };
                if slot.is_none() {
                    *slot = Some(candidate);
                }
            }
            if let Some(found) = leaf.or(container) {
                if let Some(value) = self.get(found) {
                    return Ok(Some((found.clone(), value)));
                }
            }

            let tail = path.schema_path();
            let declared_somewhere = self
                .schema
                .paths()
                .iter()
                .any(|p| p.segments().ends_with(tail.segments()));
            if declared || declared_somewhere {
                return Ok(None);
            }
            return Err(unknown());
        }

        if declared { Ok(None) } else { Err(unknown()) }
    }
}
