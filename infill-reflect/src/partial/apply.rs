use alloc::string::ToString;
use alloc::vec::Vec;

use infill_core::{FieldPath, Map, Value};

use super::{ListMergePolicy, Partial};
use crate::{
    FieldKind, FieldSpec, FieldStatus, FillReport, MalformedInputError, RejectReason,
    SchemaDescriptor, Tracker, check_scalar,
};
use crate::tracker::Subtree;

impl Partial {
    /// Merges one input mapping into the record.
    ///
    /// Keys are matched against field names and aliases. Each present value is checked
    /// against its field: accepted values are stored and tracked as explicit, rejected ones
    /// leave the record untouched at their path, and unknown keys are only reported. Nested
    /// mappings merge into nested records key by key; lists combine with existing lists as
    /// the builder's [`ListMergePolicy`] says.
    ///
    /// An explicit `null` is stored on fields that accept it. On other fields it clears the
    /// field, which then falls back to its default if it has one.
    ///
    /// Fails only if `input` isn't a mapping, in which case nothing changes.
    pub fn apply(&mut self, input: &Value) -> Result<FillReport, MalformedInputError> {
        let Value::Map(map) = input else {
            return Err(MalformedInputError {
                found: input.kind_name(),
            });
        };

        let mut report = FillReport::default();
        Merge {
            tracker: &mut self.tracker,
            report: &mut report,
            policy: self.options.list_merge,
        }
        .record(&self.schema, &mut self.value, &FieldPath::root(), map);
        self.history.push(input.clone());

        debug!(
            "Applied input #{} to {}: {}",
            self.history.len(),
            self.schema.type_name,
            report.summary()
        );
        Ok(report)
    }
}

fn mismatch(expected: &str, found: &Value) -> RejectReason {
    RejectReason::TypeMismatch {
        expected: expected.to_string(),
        found: found.kind_name(),
    }
}

/// One merge in progress: the tracker being updated and the report being written.
struct Merge<'a> {
    tracker: &'a mut Tracker,
    report: &'a mut FillReport,
    policy: ListMergePolicy,
}

impl Merge<'_> {
    fn record(&mut self, schema: &SchemaDescriptor, target: &mut Map, path: &FieldPath, input: &Map) {
        for (key, value) in input.iter() {
            match schema.field(key) {
                Some(spec) => self.field(spec, target, path.field(spec.name), value),
                None => {
                    trace!("Unknown key {key:?} under {path}");
                    self.report.unknown_keys.insert(path.field(key));
                }
            }
        }
    }

    fn field(&mut self, spec: &FieldSpec, target: &mut Map, path: FieldPath, value: &Value) {
        if value.is_null() {
            return self.null(spec, target, path);
        }

        match spec.kind {
            FieldKind::Scalar(ty) => match check_scalar(ty, value) {
                Ok(value) => {
                    target.insert(spec.name, value);
                    self.accept(path);
                }
                Err(reason) => self.reject(path, reason),
            },
            FieldKind::Record => match (value, spec.nested()) {
                (Value::Map(input), Some(nested)) => {
                    self.nested_record(spec, nested, target, path, input)
                }
                _ => self.reject(path, mismatch(spec.kind.expected_name(), value)),
            },
            FieldKind::ListOfScalar(_) | FieldKind::ListOfRecord => match value {
                Value::List(items) => self.list(spec, target, path, items),
                _ => self.reject(path, mismatch(spec.kind.expected_name(), value)),
            },
        }
    }

    fn accept(&mut self, path: FieldPath) {
        trace!("Accepted {path}");
        self.tracker.set(path.clone(), FieldStatus::FilledExplicit);
        self.report.accepted.insert(path);
    }

    fn reject(&mut self, path: FieldPath, reason: RejectReason) {
        trace!("Rejected {path}: {reason}");
        self.report.rejected.insert(path, reason);
    }

    fn null(&mut self, spec: &FieldSpec, target: &mut Map, path: FieldPath) {
        if spec.nullable {
            target.insert(spec.name, Value::Null);
            self.tracker.set_null(path.clone());
            self.report.accepted.insert(path);
            return;
        }

        trace!("Clearing {path}");
        target.remove(spec.name);
        self.tracker.remove_below(&path);
        self.tracker.set(path.clone(), FieldStatus::Unset);
        if let (FieldKind::Record, Some(nested)) = (spec.kind, spec.nested()) {
            self.tracker.seed_unset(nested, &path);
        }
        self.report.cleared.insert(path.clone());

        if let Some(default) = &spec.default {
            let mut value = default.produce();
            self.tracker
                .seed_default(spec, path, &mut value, &mut self.report.defaults_applied);
            target.insert(spec.name, value);
        }
    }

    fn nested_record(
        &mut self,
        spec: &FieldSpec,
        nested: &SchemaDescriptor,
        target: &mut Map,
        path: FieldPath,
        input: &Map,
    ) {
        let created = !matches!(target.get(spec.name), Some(Value::Map(_)));
        let undo = created.then(|| (target.get(spec.name).cloned(), self.tracker.subtree(&path)));

        let slot = target.get_or_insert_with(spec.name, || Value::Null);
        if created {
            let mut fresh = Map::new();
            self.tracker.remove_below(&path);
            self.tracker
                .seed_record(nested, &mut fresh, &path, &mut self.report.defaults_applied);
            *slot = Value::Map(fresh);
        }
        if let Value::Map(map) = slot {
            self.record(nested, map, &path, input);
        }

        if let Some((previous, subtree)) = undo {
            if !self.tracker.has_input_below(&path) {
                // nothing got in: the record doesn't come into existence
                match previous {
                    Some(value) => target.insert(spec.name, value),
                    None => target.remove(spec.name),
                };
                return self.undo(&path, subtree);
            }
        }
        if created || self.tracker.has_input_below(&path) {
            self.tracker.set(path, FieldStatus::FilledNestedPartial);
        }
    }

    fn list(&mut self, spec: &FieldSpec, target: &mut Map, path: FieldPath, items: &[Value]) {
        if items.is_empty() && spec.non_empty {
            return self.reject(path, RejectReason::EmptySequence);
        }

        let current_len = match target.get(spec.name) {
            Some(Value::List(list)) => list.len(),
            _ => 0,
        };
        let (offset, kept_len) = match self.policy {
            ListMergePolicy::MergeByIndex => (0, current_len),
            ListMergePolicy::Replace => (0, 0),
            ListMergePolicy::Append => (current_len, current_len),
        };

        // Check every element before touching anything. Scalars come back coerced, records
        // as `None` since they merge field by field. Once an element past the kept ones is
        // rejected, later ones can't be placed without leaving a hole.
        let mut gap = None;
        let outcomes: Vec<Result<Option<Value>, RejectReason>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let index = offset + i;
                if let Some(first_missing) = gap {
                    return Err(RejectReason::IndexGap { first_missing });
                }
                let outcome = match (spec.kind, item) {
                    (FieldKind::ListOfScalar(ty), _) => check_scalar(ty, item).map(Some),
                    (_, Value::Map(_)) => Ok(None),
                    _ => Err(mismatch(spec.kind.element_name(), item)),
                };
                if outcome.is_err() && index >= kept_len {
                    gap = Some(index);
                }
                outcome
            })
            .collect();

        if !items.is_empty() && outcomes.iter().all(Result::is_err) {
            for (i, outcome) in outcomes.into_iter().enumerate() {
                if let Err(reason) = outcome {
                    self.reject(path.index(offset + i), reason);
                }
            }
            return;
        }

        let list_undo = matches!(spec.kind, FieldKind::ListOfRecord)
            .then(|| (target.get(spec.name).cloned(), self.tracker.subtree(&path)));
        if self.policy == ListMergePolicy::Replace {
            target.remove(spec.name);
            self.tracker.remove_below(&path);
        }
        let slot = target.get_or_insert_with(spec.name, || Value::List(Vec::new()));
        if !matches!(slot, Value::List(_)) {
            *slot = Value::List(Vec::new());
            self.tracker.remove_below(&path);
        }
        let Value::List(list) = slot else {
            return;
        };

        // set once a new element gets nothing, since later ones would leave a hole
        let mut hole = None;
        for (i, (item, outcome)) in items.iter().zip(outcomes).enumerate() {
            let index = offset + i;
            let item_path = path.index(index);
            if let Some(first_missing) = hole {
                self.reject(item_path, RejectReason::IndexGap { first_missing });
                continue;
            }
            match outcome {
                Err(reason) => self.reject(item_path, reason),
                Ok(Some(scalar)) => {
                    match list.get_mut(index) {
                        Some(existing) => *existing = scalar,
                        None => list.push(scalar),
                    }
                    self.accept(item_path);
                }
                Ok(None) => {
                    let (Value::Map(input), Some(nested)) = (item, spec.nested()) else {
                        continue;
                    };
                    let created = !matches!(list.get(index), Some(Value::Map(_)));
                    let undo =
                        created.then(|| (list.get(index).cloned(), self.tracker.subtree(&item_path)));
                    if created {
                        let mut fresh = Map::new();
                        self.tracker.remove_below(&item_path);
                        self.tracker.seed_record(
                            nested,
                            &mut fresh,
                            &item_path,
                            &mut self.report.defaults_applied,
                        );
                        match list.get_mut(index) {
                            Some(existing) => *existing = Value::Map(fresh),
                            None => list.push(Value::Map(fresh)),
                        }
                    }
                    if let Some(Value::Map(element)) = list.get_mut(index) {
                        self.record(nested, element, &item_path, input);
                    }

                    if let Some((previous, subtree)) = undo {
                        if !self.tracker.has_input_below(&item_path) {
                            match previous {
                                Some(value) => list[index] = value,
                                None => {
                                    list.truncate(index);
                                    hole = Some(index);
                                }
                            }
                            self.undo(&item_path, subtree);
                            continue;
                        }
                    }
                    if created || self.tracker.has_input_below(&item_path) {
                        self.tracker.set(item_path, FieldStatus::FilledNestedPartial);
                    }
                }
            }
        }

        let nothing_got_in = !items.is_empty() && !self.tracker.has_input_below(&path);
        match (spec.kind, list_undo) {
            (FieldKind::ListOfScalar(_), _) => self.accept(path),
            (_, Some((previous, subtree))) if nothing_got_in => {
                // no element got in: the list stays as it was
                match previous {
                    Some(value) => target.insert(spec.name, value),
                    None => target.remove(spec.name),
                };
                self.undo(&path, subtree);
            }
            _ => self.tracker.set(path, FieldStatus::FilledNestedPartial),
        }
    }

    /// Puts the tracker back the way `subtree` found it and forgets the defaults that seeding
    /// reported below `path` in the meantime.
    fn undo(&mut self, path: &FieldPath, subtree: Subtree) {
        self.tracker.restore(subtree);
        self.report
            .defaults_applied
            .retain(|p| p == path || !path.is_prefix_of(p));
    }
}
