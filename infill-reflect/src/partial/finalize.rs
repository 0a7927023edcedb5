use infill_core::{Map, Value};

use super::Partial;
use crate::{FieldSpec, FinalizeError, IncompleteError, SchemaDescriptor};

impl Partial {
    /// Returns the complete record, or the required paths that are still missing.
    ///
    /// Fields come out in declaration order; optional fields that were never filled are left
    /// out. Nothing changes either way, so callers can keep filling after a failure and
    /// repeated calls return the same thing.
    pub fn finalize(&self) -> Result<Value, FinalizeError> {
        let missing = self.tracker.missing_required();
        if !missing.is_empty() {
            debug!(
                "Cannot finalize {}: {} required paths missing",
                self.schema.type_name,
                missing.len()
            );
            return Err(IncompleteError {
                record: self.schema.type_name,
                missing,
            }
            .into());
        }

        Ok(Value::Map(materialize(&self.schema, &self.value)))
    }
}

fn materialize(schema: &SchemaDescriptor, map: &Map) -> Map {
    let mut out = Map::new();
    for spec in &schema.fields {
        let value = match (map.get(spec.name), &spec.default) {
            (Some(value), _) => materialize_field(spec, value),
            (None, Some(default)) => default.produce(),
            (None, None) => continue,
        };
        out.insert(spec.name, value);
    }
    out
}

fn materialize_field(spec: &FieldSpec, value: &Value) -> Value {
    match (spec.nested(), value) {
        (Some(nested), Value::Map(map)) => Value::Map(materialize(nested, map)),
        (Some(nested), Value::List(items)) => Value::List(
            items
                .iter()
                .map(|item| match item {
                    Value::Map(map) => Value::Map(materialize(nested, map)),
                    other => other.clone(),
                })
                .collect(),
        ),
        _ => value.clone(),
    }
}
