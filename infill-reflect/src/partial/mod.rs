//! Incremental construction of records, with provenance
//!
//! A [`Partial`] holds a possibly incomplete record value together with a [`Tracker`] that
//! knows, for every path, whether the value there was supplied by the caller, came from a
//! default, or is still missing.
//!
//! # Overview
//!
//! - Inputs are merged with [`Partial::apply`], one mapping at a time. Inputs may be partial:
//!   absent keys are left alone, only the keys that are present are checked.
//! - Problems with individual keys never fail an `apply` call. They are listed in the
//!   returned [`FillReport`], and the rest of the input still goes in.
//! - [`Partial::finalize`] hands out the complete value once nothing required is missing,
//!   and leaves the builder untouched either way.
//!
//! # Basic Usage
//!
//! ```
//! # use infill_core::{FieldDef, RecordDef, TypeDef, Value, map};
//! # use infill_reflect::{Partial, describe_def, FinalizeError};
//! # use std::sync::Arc;
//! static FIELDS: &[FieldDef] = &[
//!     FieldDef::builder().name("name").ty(TypeDef::STRING).build(),
//!     FieldDef::builder().name("age").ty(TypeDef::INT).default(|| Value::Int(0)).build(),
//! ];
//! static PERSON: RecordDef = RecordDef::builder().type_name("Person").fields(FIELDS).build();
//!
//! let mut partial = Partial::new(Arc::new(describe_def(&PERSON)?));
//! assert!(matches!(partial.finalize(), Err(FinalizeError::Incomplete(_))));
//!
//! let report = partial.apply(&map! { "name" => "Ann" })?;
//! assert_eq!(report.accepted().len(), 1);
//! assert_eq!(partial.finalize()?, map! { "name" => "Ann", "age" => 0 });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Lists
//!
//! How a list in an input combines with the list already there is set per builder through
//! [`PartialOptions`]; see [`ListMergePolicy`].

use alloc::collections::BTreeSet;
use alloc::sync::Arc;
use alloc::vec::Vec;

use infill_core::{FieldPath, Map, Value};

use crate::{FillReport, FieldStatus, MalformedInputError, SchemaDescriptor, Tracker, UnknownPathError};

mod apply;
mod finalize;

mod query;
pub use query::*;

mod typed;
pub use typed::*;


/// How a list in an input combines with the list already in the partial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListMergePolicy {
    /// Element `i` of the input fills element `i` of the list, merging into it for records.
    /// Elements past the end are appended. Lists never shrink.
    #[default]
    MergeByIndex,

    /// The input list replaces the current one, along with everything tracked inside it.
    Replace,

    /// The input's elements are added after the current ones.
    Append,
}

/// Construction-time settings for a [`Partial`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub struct PartialOptions {
    /// How lists in inputs combine with existing lists
    pub list_merge: ListMergePolicy,
}

impl PartialOptions {
    /// The default options
    pub const fn new() -> Self {
        Self {
            list_merge: ListMergePolicy::MergeByIndex,
        }
    }

    /// Sets the list merge policy
    pub const fn list_merge(mut self, policy: ListMergePolicy) -> Self {
        self.list_merge = policy;
        self
    }
}

/// Where a builder is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// Nothing has been filled by the caller yet, only defaults
    Empty,
    /// The caller has filled something, but required fields are still missing
    Partial,
    /// Nothing required is missing: [`Partial::finalize`] will succeed
    Complete,
}

/// A record under construction.
///
/// Owns its partial value and tracker exclusively; the schema is shared.
#[derive(Debug, Clone)]
pub struct Partial {
    schema: Arc<SchemaDescriptor>,
    options: PartialOptions,
    value: Map,
    tracker: Tracker,
    /// What seeding the defaults did
    initial: FillReport,
    /// Every input applied so far, in order
    history: Vec<Value>,
}

impl Partial {
    /// Creates a builder for `schema` with default options. Fields with defaults start out filled.
    pub fn new(schema: Arc<SchemaDescriptor>) -> Self {
        Self::with_options(schema, PartialOptions::default())
    }

    /// Creates a builder for `schema`
    pub fn with_options(schema: Arc<SchemaDescriptor>, options: PartialOptions) -> Self {
        let mut tracker = Tracker::unseeded(schema.clone());
        let mut value = Map::new();
        let mut initial = FillReport::default();
        tracker.seed_record(
            &schema,
            &mut value,
            &FieldPath::root(),
            &mut initial.defaults_applied,
        );
        trace!(
            "Created partial {} with {} defaults",
            schema.type_name,
            initial.defaults_applied.len()
        );

        Self {
            schema,
            options,
            value,
            tracker,
            initial,
            history: Vec::new(),
        }
    }

    /// Builds a partial by applying `inputs` in order to a fresh one.
    ///
    /// Applying the [`history`](Self::history) of a partial to a fresh one with the same schema
    /// and options reproduces it exactly.
    pub fn replay<'a>(
        schema: Arc<SchemaDescriptor>,
        options: PartialOptions,
        inputs: impl IntoIterator<Item = &'a Value>,
    ) -> Result<Self, MalformedInputError> {
        let mut partial = Self::with_options(schema, options);
        for input in inputs {
            partial.apply(input)?;
        }
        Ok(partial)
    }

    /// Returns to the state right after construction, dropping all input and history.
    pub fn reset(&mut self) {
        debug!("Resetting partial {}", self.schema.type_name);
        *self = Self::with_options(self.schema.clone(), self.options);
    }

    /// The schema being filled
    pub fn schema(&self) -> &Arc<SchemaDescriptor> {
        &self.schema
    }

    /// The options this builder was created with
    pub fn options(&self) -> PartialOptions {
        self.options
    }

    /// Provenance of every tracked path
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The record as filled so far, in the order fields were first filled
    pub fn value(&self) -> &Map {
        &self.value
    }

    /// The report of construction: which defaults were filled in
    pub fn initial_report(&self) -> &FillReport {
        &self.initial
    }

    /// Every input applied so far, oldest first
    pub fn history(&self) -> &[Value] {
        &self.history
    }

    /// Where this builder is in its lifecycle
    pub fn state(&self) -> BuildState {
        if self.is_complete() {
            BuildState::Complete
        } else if self.tracker.has_input() {
            BuildState::Partial
        } else {
            BuildState::Empty
        }
    }

    /// Returns true if [`finalize`](Self::finalize) would succeed
    pub fn is_complete(&self) -> bool {
        self.tracker.missing_required().is_empty()
    }

    /// See [`Tracker::missing_required`]
    pub fn missing_required(&self) -> BTreeSet<FieldPath> {
        self.tracker.missing_required()
    }

    /// See [`Tracker::missing_optional`]
    pub fn missing_optional(&self) -> BTreeSet<FieldPath> {
        self.tracker.missing_optional()
    }

    /// See [`Tracker::status_of`]
    pub fn status_of(&self, path: &FieldPath) -> Result<FieldStatus, UnknownPathError> {
        self.tracker.status_of(path)
    }
}
