use alloc::collections::{BTreeMap, BTreeSet};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use infill_core::{FieldPath, Map, Value};

use crate::{FieldKind, FieldSpec, SchemaDescriptor, TrackerError, UnknownPathError};

/// Where the value at a path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldStatus {
    /// No value
    Unset,
    /// Supplied by the caller
    FilledExplicit,
    /// Supplied by the field's default
    FilledDefault,
    /// A record or list of records that exists because the caller filled some of its children
    FilledNestedPartial,
}

impl FieldStatus {
    /// Returns true for every status but [`FieldStatus::Unset`]
    pub fn is_filled(self) -> bool {
        !matches!(self, FieldStatus::Unset)
    }

    /// Returns true if the caller put the value there, directly or through children
    pub fn is_caller_provided(self) -> bool {
        matches!(
            self,
            FieldStatus::FilledExplicit | FieldStatus::FilledNestedPartial
        )
    }

    /// A stable, machine-readable name
    pub fn as_str(self) -> &'static str {
        match self {
            FieldStatus::Unset => "unset",
            FieldStatus::FilledExplicit => "filled-explicit",
            FieldStatus::FilledDefault => "filled-default",
            FieldStatus::FilledNestedPartial => "filled-nested-partial",
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-path provenance for one record being built.
///
/// Keeps a status for every field of the root record, for every field of nested records
/// and list elements that exist, and for every list element. Paths that are valid for the
/// schema but have no entry (children of an absent record, elements past the end of a list)
/// are unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracker {
    schema: Arc<SchemaDescriptor>,
    entries: BTreeMap<FieldPath, FieldStatus>,
    /// Filled paths whose value is `null`: they have no children to track
    nulls: BTreeSet<FieldPath>,
}

/// What a tracker held at one path and below it
#[derive(Debug)]
pub(crate) struct Subtree {
    path: FieldPath,
    entries: Vec<(FieldPath, FieldStatus)>,
    nulls: Vec<FieldPath>,
}

impl Tracker {
    /// Creates a tracker for `schema`: fields with a default are filled from it, everything
    /// else is unset.
    pub fn initialize(schema: Arc<SchemaDescriptor>) -> Self {
        let mut tracker = Self::unseeded(schema.clone());
        let mut scratch = Map::new();
        tracker.seed_record(&schema, &mut scratch, &FieldPath::root(), &mut BTreeSet::new());
        tracker
    }

    pub(crate) fn unseeded(schema: Arc<SchemaDescriptor>) -> Self {
        Self {
            schema,
            entries: BTreeMap::new(),
            nulls: BTreeSet::new(),
        }
    }

    /// The schema this tracker is bound to
    pub fn schema(&self) -> &Arc<SchemaDescriptor> {
        &self.schema
    }

    /// Sets the status of `path`.
    ///
    /// Fails if the path isn't part of the schema, or if it would turn an explicitly filled
    /// path into a defaulted one.
    pub fn record(&mut self, path: &FieldPath, status: FieldStatus) -> Result<(), TrackerError> {
        self.schema.resolve(path)?;
        if status == FieldStatus::FilledDefault
            && self.entries.get(path) == Some(&FieldStatus::FilledExplicit)
        {
            return Err(TrackerError::Demotion { path: path.clone() });
        }
        self.set(path.clone(), status);
        Ok(())
    }

    /// Returns the status of `path`, which is unset if the path was never filled.
    pub fn status_of(&self, path: &FieldPath) -> Result<FieldStatus, UnknownPathError> {
        self.schema.resolve(path)?;
        Ok(self.get(path))
    }

    /// Returns true if `path` is filled with an explicit or default `null`
    pub fn is_null(&self, path: &FieldPath) -> bool {
        self.nulls.contains(path)
    }

    /// Returns `path` and everything below it to unset.
    ///
    /// A cleared record keeps unset entries for its fields; a cleared list element disappears.
    pub fn clear(&mut self, path: &FieldPath) -> Result<(), UnknownPathError> {
        let resolved = self.schema.resolve(path)?;
        let element = resolved.element;
        let nested_record = match (resolved.spec.kind, element) {
            (FieldKind::Record, false) => resolved.spec.nested_schema.clone(),
            _ => None,
        };

        self.remove_below(path);
        self.nulls.remove(path);
        if element {
            self.entries.remove(path);
        } else {
            self.set(path.clone(), FieldStatus::Unset);
        }
        if let Some(nested) = nested_record {
            self.seed_unset(&nested, path);
        }
        Ok(())
    }

    /// Every required path that's unset.
    ///
    /// Descends only into records and list elements that exist, so a missing record is
    /// reported once, as itself, rather than through each of its required fields.
    pub fn missing_required(&self) -> BTreeSet<FieldPath> {
        let mut out = BTreeSet::new();
        self.collect_unset(&self.schema, &FieldPath::root(), true, &mut out);
        out
    }

    /// Every optional path without a default that's unset, inside records that exist.
    pub fn missing_optional(&self) -> BTreeSet<FieldPath> {
        let mut out = BTreeSet::new();
        self.collect_unset(&self.schema, &FieldPath::root(), false, &mut out);
        out
    }

    /// Every tracked path with its status, in path order
    pub fn entries(&self) -> impl Iterator<Item = (&FieldPath, FieldStatus)> {
        self.entries.iter().map(|(path, status)| (path, *status))
    }

    /// Every path that holds a value, in path order
    pub fn filled_paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.entries
            .iter()
            .filter(|(_, status)| status.is_filled())
            .map(|(path, _)| path)
    }

    /// Returns true if the caller has filled anything
    pub fn has_input(&self) -> bool {
        self.entries.values().any(|status| status.is_caller_provided())
    }

    /// Number of tracked elements of the list at `path`
    pub fn element_count(&self, path: &FieldPath) -> usize {
        (0..)
            .take_while(|index| self.entries.contains_key(&path.index(*index)))
            .count()
    }

    pub(crate) fn get(&self, path: &FieldPath) -> FieldStatus {
        self.entries
            .get(path)
            .copied()
            .unwrap_or(FieldStatus::Unset)
    }

    /// Sets a status without checks. Used by the builder, which never demotes.
    pub(crate) fn set(&mut self, path: FieldPath, status: FieldStatus) {
        debug_assert!(
            !(status == FieldStatus::FilledDefault
                && self.entries.get(&path) == Some(&FieldStatus::FilledExplicit)),
            "demoting explicit value at {path}"
        );
        self.nulls.remove(&path);
        self.entries.insert(path, status);
    }

    /// Marks `path` as explicitly `null`, dropping whatever was tracked below it.
    pub(crate) fn set_null(&mut self, path: FieldPath) {
        self.set(path.clone(), FieldStatus::FilledExplicit);
        self.mark_null(path);
    }

    /// Records that the value at `path` is `null`, keeping its status.
    pub(crate) fn mark_null(&mut self, path: FieldPath) {
        self.remove_below(&path);
        self.nulls.insert(path);
    }

    /// Returns true if anything strictly below `path` was provided by the caller
    pub(crate) fn has_input_below(&self, path: &FieldPath) -> bool {
        self.entries
            .range(path.clone()..)
            .skip_while(|(p, _)| *p == path)
            .take_while(|(p, _)| path.is_prefix_of(p))
            .any(|(_, status)| status.is_caller_provided())
    }

    /// Forgets everything strictly below `path`
    pub(crate) fn remove_below(&mut self, path: &FieldPath) {
        self.entries
            .retain(|p, _| p == path || !path.is_prefix_of(p));
        self.nulls.retain(|p| p == path || !path.is_prefix_of(p));
    }

    /// Copies out everything tracked at `path` and below it
    pub(crate) fn subtree(&self, path: &FieldPath) -> Subtree {
        Subtree {
            path: path.clone(),
            entries: self
                .entries
                .range(path.clone()..)
                .take_while(|(p, _)| path.is_prefix_of(p))
                .map(|(p, status)| (p.clone(), *status))
                .collect(),
            nulls: self
                .nulls
                .range(path.clone()..)
                .take_while(|p| path.is_prefix_of(p))
                .cloned()
                .collect(),
        }
    }

    /// Puts back what [`Tracker::subtree`] copied, forgetting whatever replaced it.
    pub(crate) fn restore(&mut self, subtree: Subtree) {
        let Subtree {
            path,
            entries,
            nulls,
        } = subtree;
        self.entries.retain(|p, _| !path.is_prefix_of(p));
        self.nulls.retain(|p| !path.is_prefix_of(p));
        self.entries.extend(entries);
        self.nulls.extend(nulls);
    }

    /// Adds unset entries for the fields of `schema` under `prefix`, and of its nested records.
    pub(crate) fn seed_unset(&mut self, schema: &SchemaDescriptor, prefix: &FieldPath) {
        for spec in &schema.fields {
            let path = prefix.field(spec.name);
            if let (FieldKind::Record, Some(nested)) = (spec.kind, spec.nested()) {
                self.seed_unset(nested, &path);
            }
            self.set(path, FieldStatus::Unset);
        }
    }

    /// Fills in a record that just came into existence.
    ///
    /// Values already in `map` came from a default and are tracked as such. Absent fields
    /// with a default get a fresh copy of it; all others are unset. Every path that becomes
    /// defaulted is added to `applied`.
    pub(crate) fn seed_record(
        &mut self,
        schema: &SchemaDescriptor,
        map: &mut Map,
        prefix: &FieldPath,
        applied: &mut BTreeSet<FieldPath>,
    ) {
        for spec in &schema.fields {
            let path = prefix.field(spec.name);
            if let Some(value) = map.get_mut(spec.name) {
                self.seed_default(spec, path, value, applied);
                continue;
            }
            match &spec.default {
                Some(default) => {
                    let mut value = default.produce();
                    self.seed_default(spec, path, &mut value, applied);
                    map.insert(spec.name, value);
                }
                None => {
                    if let (FieldKind::Record, Some(nested)) = (spec.kind, spec.nested()) {
                        self.seed_unset(nested, &path);
                    }
                    self.set(path, FieldStatus::Unset);
                }
            }
        }
    }

    /// Tracks a default value for `spec` at `path`, and everything inside it.
    pub(crate) fn seed_default(
        &mut self,
        spec: &FieldSpec,
        path: FieldPath,
        value: &mut Value,
        applied: &mut BTreeSet<FieldPath>,
    ) {
        match (value, spec.nested()) {
            (Value::Null, _) => {
                self.set(path.clone(), FieldStatus::FilledDefault);
                self.nulls.insert(path.clone());
                applied.insert(path);
                return;
            }
            (Value::Map(map), Some(nested)) => self.seed_record(nested, map, &path, applied),
            (Value::List(items), nested) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let item_path = path.index(index);
                    if let (Value::Map(map), Some(nested)) = (item, nested) {
                        self.seed_record(nested, map, &item_path, applied);
                    }
                    self.set(item_path.clone(), FieldStatus::FilledDefault);
                    applied.insert(item_path);
                }
            }
            _ => {}
        }
        self.set(path.clone(), FieldStatus::FilledDefault);
        applied.insert(path);
    }

    fn collect_unset(
        &self,
        schema: &SchemaDescriptor,
        prefix: &FieldPath,
        required: bool,
        out: &mut BTreeSet<FieldPath>,
    ) {
        for spec in &schema.fields {
            let path = prefix.field(spec.name);
            if !self.get(&path).is_filled() {
                if spec.required == required {
                    out.insert(path);
                }
                continue;
            }
            if self.nulls.contains(&path) {
                continue;
            }
            let Some(nested) = spec.nested() else {
                continue;
            };
            match spec.kind {
                FieldKind::Record => self.collect_unset(nested, &path, required, out),
                FieldKind::ListOfRecord => {
                    for index in 0..self.element_count(&path) {
                        self.collect_unset(nested, &path.index(index), required, out);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe_def;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use infill_core::{FieldDef, FieldFlags, RecordDef, TypeDef};

    static LINE_FIELDS: &[FieldDef] = &[
        FieldDef::builder().name("sku").ty(TypeDef::STRING).build(),
        FieldDef::builder()
            .name("quantity")
            .ty(TypeDef::INT)
            .default(|| Value::Int(1))
            .build(),
    ];
    static LINE: RecordDef = RecordDef::builder()
        .type_name("Line")
        .fields(LINE_FIELDS)
        .build();
    fn line() -> &'static RecordDef {
        &LINE
    }

    static ORDER_FIELDS: &[FieldDef] = &[
        FieldDef::builder().name("id").ty(TypeDef::STRING).build(),
        FieldDef::builder()
            .name("note")
            .ty(TypeDef::STRING)
            .flags(FieldFlags::OPTIONAL)
            .build(),
        FieldDef::builder()
            .name("primary")
            .ty(TypeDef::Record(line))
            .build(),
        FieldDef::builder()
            .name("lines")
            .ty(TypeDef::List(&TypeDef::Record(line)))
            .default(|| Value::List(Vec::new()))
            .build(),
    ];
    static ORDER: RecordDef = RecordDef::builder()
        .type_name("Order")
        .fields(ORDER_FIELDS)
        .build();

    fn tracker() -> Tracker {
        Tracker::initialize(Arc::new(describe_def(&ORDER).unwrap()))
    }

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    fn rendered(paths: &BTreeSet<FieldPath>) -> Vec<String> {
        paths.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn initialization_seeds_defaults() {
        let tracker = tracker();
        assert_eq!(tracker.status_of(&path("lines")), Ok(FieldStatus::FilledDefault));
        assert_eq!(tracker.status_of(&path("id")), Ok(FieldStatus::Unset));
        assert_eq!(tracker.status_of(&path("primary.sku")), Ok(FieldStatus::Unset));
        assert!(!tracker.has_input());
    }

    #[test]
    fn unset_records_count_once() {
        let tracker = tracker();
        assert_eq!(rendered(&tracker.missing_required()), ["id", "primary"]);
        assert_eq!(rendered(&tracker.missing_optional()), ["note"]);
    }

    #[test]
    fn present_records_report_their_own_fields() {
        let mut tracker = tracker();
        tracker
            .record(&path("primary"), FieldStatus::FilledNestedPartial)
            .unwrap();
        tracker
            .record(&path("primary.quantity"), FieldStatus::FilledDefault)
            .unwrap();
        assert_eq!(rendered(&tracker.missing_required()), ["id", "primary.sku"]);
    }

    #[test]
    fn explicit_values_cannot_be_demoted() {
        let mut tracker = tracker();
        tracker.record(&path("id"), FieldStatus::FilledExplicit).unwrap();
        assert_eq!(
            tracker.record(&path("id"), FieldStatus::FilledDefault),
            Err(TrackerError::Demotion { path: path("id") })
        );
        assert_eq!(tracker.status_of(&path("id")), Ok(FieldStatus::FilledExplicit));
    }

    #[test]
    fn unknown_paths_are_errors() {
        let mut tracker = tracker();
        assert!(tracker.status_of(&path("nope")).is_err());
        assert!(tracker.status_of(&path("id[0]")).is_err());
        assert!(matches!(
            tracker.record(&path("primary.nope"), FieldStatus::FilledExplicit),
            Err(TrackerError::UnknownPath(_))
        ));
        // valid for the schema, just not there yet
        assert_eq!(tracker.status_of(&path("lines[4].sku")), Ok(FieldStatus::Unset));
    }

    #[test]
    fn clearing_resets_subtrees() {
        let mut tracker = tracker();
        tracker
            .record(&path("primary"), FieldStatus::FilledNestedPartial)
            .unwrap();
        tracker
            .record(&path("primary.sku"), FieldStatus::FilledExplicit)
            .unwrap();
        tracker.clear(&path("primary")).unwrap();
        assert_eq!(tracker.status_of(&path("primary")), Ok(FieldStatus::Unset));
        assert_eq!(tracker.status_of(&path("primary.sku")), Ok(FieldStatus::Unset));
        assert_eq!(rendered(&tracker.missing_required()), ["id", "primary"]);
    }

    #[test]
    fn list_elements_are_checked_while_present() {
        let mut tracker = tracker();
        tracker
            .record(&path("lines[0]"), FieldStatus::FilledNestedPartial)
            .unwrap();
        tracker
            .record(&path("lines[0].quantity"), FieldStatus::FilledDefault)
            .unwrap();
        assert_eq!(tracker.element_count(&path("lines")), 1);
        assert_eq!(
            rendered(&tracker.missing_required()),
            ["id", "lines[0].sku", "primary"]
        );
    }
}
