use alloc::string::{String, ToString};
use alloc::vec::Vec;

use infill_core::{FieldPath, Map, Record, Value};
use infill_reflect::{Builder, FillReport, FinalizeError, Partial};
use log::debug;

use crate::{ApplyJsonError, from_str, to_string};

/// JSON in and out of builders.
///
/// ```
/// # use infill_core::{FieldDef, RecordDef, TypeDef, Value};
/// # use infill_reflect::{Partial, describe_def};
/// # use std::sync::Arc;
/// use infill_json::JsonBuilder;
///
/// static FIELDS: &[FieldDef] = &[
///     FieldDef::builder().name("host").ty(TypeDef::STRING).build(),
///     FieldDef::builder().name("port").ty(TypeDef::INT).default(|| Value::Int(80)).build(),
/// ];
/// static SERVER: RecordDef = RecordDef::builder().type_name("Server").fields(FIELDS).build();
///
/// let mut partial = Partial::new(Arc::new(describe_def(&SERVER)?));
/// partial.apply_json(r#"{"host": "example.com"}"#)?;
/// assert_eq!(partial.finalize_json()?, r#"{"host":"example.com","port":80}"#);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait JsonBuilder {
    /// Parses `json` and applies it as one input.
    ///
    /// Fails if the text isn't JSON or isn't an object, in which case nothing changes.
    fn apply_json(&mut self, json: &str) -> Result<FillReport, ApplyJsonError>;

    /// Finalizes the record and serializes it to compact JSON.
    fn finalize_json(&self) -> Result<String, FinalizeError>;
}

impl JsonBuilder for Partial {
    fn apply_json(&mut self, json: &str) -> Result<FillReport, ApplyJsonError> {
        let input = from_str(json)?;
        debug!("Applying {} bytes of JSON to {}", json.len(), self.schema().type_name);
        Ok(self.apply(&input)?)
    }

    fn finalize_json(&self) -> Result<String, FinalizeError> {
        self.finalize().map(|value| to_string(&value))
    }
}

impl<T: Record> JsonBuilder for Builder<T> {
    fn apply_json(&mut self, json: &str) -> Result<FillReport, ApplyJsonError> {
        let input = from_str(json)?;
        Ok(self.apply(&input)?)
    }

    fn finalize_json(&self) -> Result<String, FinalizeError> {
        self.finalize_value().map(|value| to_string(&value))
    }
}

/// A fill report as a JSON-ready value.
///
/// Paths are rendered as strings (`items[0].name`); rejections map each path to its reason
/// code (`type_mismatch`, ...).
pub fn report_to_value(report: &FillReport) -> Value {
    fn paths<'a>(paths: impl IntoIterator<Item = &'a FieldPath>) -> Value {
        Value::List(
            paths
                .into_iter()
                .map(|path| Value::String(path.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    let rejected: Map = report
        .rejected()
        .iter()
        .map(|(path, reason)| (path.to_string(), Value::from(reason.as_str())))
        .collect();

    let mut out = Map::new();
    out.insert("accepted", paths(report.accepted()));
    out.insert("rejected", Value::Map(rejected));
    out.insert("unknown_keys", paths(report.unknown_keys()));
    out.insert("defaults_applied", paths(report.defaults_applied()));
    out.insert("cleared", paths(report.cleared()));
    Value::Map(out)
}
