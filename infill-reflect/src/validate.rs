use alloc::string::{String, ToString};

use infill_core::{FieldPath, Map, ScalarType, Value};

use crate::{FieldKind, FieldSpec, RejectReason, SchemaDescriptor, ViolationKind, Violations};

/// Checks `value` against a scalar type, returning it in the form the field stores.
///
/// Floats accept integers and integers accept whole floats; nothing converts to or from text.
pub fn check_scalar(ty: ScalarType, value: &Value) -> Result<Value, RejectReason> {
    let mismatch = || RejectReason::TypeMismatch {
        expected: String::from(ty.name()),
        found: value.kind_name(),
    };

    match (ty, value) {
        (ScalarType::String, Value::String(_))
        | (ScalarType::Int, Value::Int(_))
        | (ScalarType::Float, Value::Float(_))
        | (ScalarType::Bool, Value::Bool(_)) => Ok(value.clone()),
        (ScalarType::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
        (ScalarType::Int, Value::Float(x)) => whole(*x).map(Value::Int).ok_or_else(mismatch),
        (ScalarType::Enum(variants), Value::String(s)) => {
            if variants.iter().any(|variant| *variant == s.as_str()) {
                Ok(value.clone())
            } else {
                Err(RejectReason::NotAVariant {
                    found: s.clone(),
                    variants,
                })
            }
        }
        _ => Err(mismatch()),
    }
}

fn whole(x: f64) -> Option<i64> {
    if !x.is_finite() || x < i64::MIN as f64 || x >= i64::MAX as f64 {
        return None;
    }
    let truncated = x as i64;
    (truncated as f64 == x).then_some(truncated)
}

impl SchemaDescriptor {
    /// Checks a complete record value against this schema.
    ///
    /// Every required field must be present, every present value must have its field's type,
    /// lists marked non-empty must have elements and no undeclared keys may appear. Keys must be
    /// canonical names: aliases are an input convenience only.
    pub fn validate(&self, value: &Value) -> Result<(), Violations> {
        let mut violations = Violations::default();
        check_record(self, value, &FieldPath::root(), &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check_record(schema: &SchemaDescriptor, value: &Value, path: &FieldPath, out: &mut Violations) {
    let Value::Map(map) = value else {
        out.push(
            path.clone(),
            ViolationKind::Rejected(RejectReason::TypeMismatch {
                expected: "map".to_string(),
                found: value.kind_name(),
            }),
        );
        return;
    };
    check_map(schema, map, path, out);
}

fn check_map(schema: &SchemaDescriptor, map: &Map, path: &FieldPath, out: &mut Violations) {
    for key in map.keys() {
        if schema.field_named(key).is_none() {
            out.push(path.field(key), ViolationKind::Unknown);
        }
    }

    for spec in &schema.fields {
        let field_path = path.field(spec.name);
        match map.get(spec.name) {
            Some(value) => check_field(spec, value, &field_path, out),
            None if spec.required => out.push(field_path, ViolationKind::Missing),
            None => {}
        }
    }
}

/// Checks one present field value, recursing into records and lists.
pub(crate) fn check_field(spec: &FieldSpec, value: &Value, path: &FieldPath, out: &mut Violations) {
    let reject = |out: &mut Violations, path: &FieldPath, reason| {
        out.push(path.clone(), ViolationKind::Rejected(reason))
    };

    if value.is_null() {
        if !spec.nullable {
            reject(
                out,
                path,
                RejectReason::TypeMismatch {
                    expected: spec.kind.expected_name().to_string(),
                    found: "null",
                },
            );
        }
        return;
    }

    match spec.kind {
        FieldKind::Scalar(ty) => {
            if let Err(reason) = check_scalar(ty, value) {
                reject(out, path, reason);
            }
        }
        FieldKind::Record => {
            if let Some(nested) = spec.nested() {
                check_record(nested, value, path, out);
            }
        }
        FieldKind::ListOfScalar(_) | FieldKind::ListOfRecord => {
            let Value::List(items) = value else {
                reject(
                    out,
                    path,
                    RejectReason::TypeMismatch {
                        expected: "list".to_string(),
                        found: value.kind_name(),
                    },
                );
                return;
            };
            if items.is_empty() && spec.non_empty {
                reject(out, path, RejectReason::EmptySequence);
            }
            for (index, item) in items.iter().enumerate() {
                let item_path = path.index(index);
                match (spec.kind, spec.nested()) {
                    (FieldKind::ListOfScalar(ty), _) => {
                        if let Err(reason) = check_scalar(ty, item) {
                            reject(out, &item_path, reason);
                        }
                    }
                    (_, Some(nested)) => check_record(nested, item, &item_path, out),
                    _ => {}
                }
            }
        }
    }
}
