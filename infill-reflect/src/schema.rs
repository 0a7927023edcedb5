use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use infill_core::{
    DefaultFn, FieldDef, FieldFlags, FieldPath, PathSegment, Record, RecordDef, ScalarType,
    TypeDef, Value,
};

use crate::{SchemaError, UnknownPathError, Violations};

/// How a field is filled and tracked. Every supported field type falls into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A leaf value
    Scalar(ScalarType),
    /// A nested record, tracked field by field
    Record,
    /// A list of leaf values, tracked element by element
    ListOfScalar(ScalarType),
    /// A list of nested records, tracked element by element and field by field
    ListOfRecord,
}

impl FieldKind {
    /// Returns true for lists
    pub fn is_list(&self) -> bool {
        matches!(self, FieldKind::ListOfScalar(_) | FieldKind::ListOfRecord)
    }

    /// Returns true for kinds whose values have tracked children
    pub fn is_container(&self) -> bool {
        !matches!(self, FieldKind::Scalar(_))
    }

    /// The kind of value an element of this list accepts, for reporting
    pub(crate) fn element_name(&self) -> &'static str {
        match self {
            FieldKind::ListOfScalar(scalar) => scalar.name(),
            _ => "map",
        }
    }

    /// The kind of value the field accepts, for reporting
    pub(crate) fn expected_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar(scalar) => scalar.name(),
            FieldKind::Record => "map",
            FieldKind::ListOfScalar(_) | FieldKind::ListOfRecord => "list",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(scalar) => write!(f, "{scalar}"),
            FieldKind::Record => write!(f, "record"),
            FieldKind::ListOfScalar(scalar) => write!(f, "list<{scalar}>"),
            FieldKind::ListOfRecord => write!(f, "list<record>"),
        }
    }
}

/// A field's default: a factory invoked afresh every time the default is materialized.
///
/// Two defaults compare equal when they produce equal values.
#[derive(Clone, Copy)]
pub struct DefaultValue(DefaultFn);

impl DefaultValue {
    /// Produces a fresh copy of the default
    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        self.produce() == other.produce()
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DefaultValue").field(&self.produce()).finish()
    }
}

/// Describes one field of a [`SchemaDescriptor`]
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct FieldSpec {
    /// Canonical name, used in paths, reports and materialized values
    pub name: &'static str,

    /// Additional input keys that fill this field
    pub aliases: &'static [&'static str],

    /// How the field is filled
    pub kind: FieldKind,

    /// Whether a complete record must have an explicit value here.
    ///
    /// Never true for fields that have a default or accept `null`.
    pub required: bool,

    /// Whether `null` is a value this field can hold
    pub nullable: bool,

    /// Whether a list must hold at least one element
    pub non_empty: bool,

    /// Whether the value should be kept out of human-readable output
    pub sensitive: bool,

    /// The default, if any
    pub default: Option<DefaultValue>,

    /// Schema of the nested record, for `Record` and `ListOfRecord` fields
    pub nested_schema: Option<Arc<SchemaDescriptor>>,

    /// doc comments
    pub doc: &'static [&'static str],
}

impl FieldSpec {
    /// Returns true if an input key refers to this field
    pub fn answers_to(&self, key: &str) -> bool {
        self.name == key || self.aliases.iter().any(|alias| *alias == key)
    }

    /// The nested record schema, for `Record` and `ListOfRecord` fields
    pub fn nested(&self) -> Option<&SchemaDescriptor> {
        self.nested_schema.as_deref()
    }

    /// Returns true if the field has a default
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// The immutable, structural description of a record type.
///
/// Built once per record type by [`describe`] and shared between every builder for it.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct SchemaDescriptor {
    /// Name of the record type
    pub type_name: &'static str,

    /// All fields, in declaration order
    pub fields: Vec<FieldSpec>,

    /// doc comments
    pub doc: &'static [&'static str],
}

/// The field a [`FieldPath`] addresses, as found by [`SchemaDescriptor::resolve`]
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// The field
    pub spec: &'a FieldSpec,
    /// True if the path addresses one element of the field's list rather than the field
    pub element: bool,
}

impl Resolved<'_> {
    /// Returns true if the addressed location holds a single leaf value or a whole
    /// list of leaf values, i.e. something that's filled explicitly rather than through children.
    pub fn is_leaf(&self) -> bool {
        match self.spec.kind {
            FieldKind::Scalar(_) | FieldKind::ListOfScalar(_) => true,
            FieldKind::Record | FieldKind::ListOfRecord => false,
        }
    }
}

impl SchemaDescriptor {
    /// Returns the field that answers to `key`, by canonical name or alias
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.answers_to(key))
    }

    /// Returns the field with canonical name `name`
    pub fn field_named(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterates over the required fields of this record (not of nested ones)
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Finds the field `path` addresses.
    ///
    /// Field segments use canonical names; an index segment may only follow a list field.
    pub fn resolve(&self, path: &FieldPath) -> Result<Resolved<'_>, UnknownPathError> {
        let unknown = || UnknownPathError {
            record: self.type_name,
            path: path.to_string(),
        };

        let mut current: Option<Resolved<'_>> = None;
        for segment in path.segments() {
            current = Some(match segment {
                PathSegment::Field(name) => {
                    let schema = match current {
                        None => self,
                        Some(Resolved { spec, element }) => match spec.kind {
                            FieldKind::Record => spec.nested().ok_or_else(unknown)?,
                            FieldKind::ListOfRecord if element => {
                                spec.nested().ok_or_else(unknown)?
                            }
                            _ => return Err(unknown()),
                        },
                    };
                    Resolved {
                        spec: schema.field_named(name).ok_or_else(unknown)?,
                        element: false,
                    }
                }
                PathSegment::Index(_) => match current {
                    Some(Resolved {
                        spec,
                        element: false,
                    }) if spec.kind.is_list() => Resolved {
                        spec,
                        element: true,
                    },
                    _ => return Err(unknown()),
                },
            });
        }
        current.ok_or_else(unknown)
    }

    /// Every field path reachable without going through a list element, outermost first.
    ///
    /// Fields of list-of-record elements are listed under the list's path, without an index
    /// (`items.name`), which is how [`FieldPath::schema_path`] renders element paths.
    pub fn paths(&self) -> Vec<FieldPath> {
        let mut out = Vec::new();
        self.collect_paths(&FieldPath::root(), &mut out);
        out
    }

    fn collect_paths(&self, prefix: &FieldPath, out: &mut Vec<FieldPath>) {
        for spec in &self.fields {
            let path = prefix.field(spec.name);
            out.push(path.clone());
            if let Some(nested) = spec.nested() {
                nested.collect_paths(&path, out);
            }
        }
    }
}

/// Turns a record definition into a schema descriptor, without caching.
///
/// Nested records are described recursively. Fails if any field's type can't be classified
/// into one of the four [`FieldKind`]s, if keys collide, if records contain themselves, or if
/// a default doesn't fit its field.
pub fn describe_def(def: &'static RecordDef) -> Result<SchemaDescriptor, SchemaError> {
    Describer { stack: Vec::new() }.record(def)
}

static DESCRIPTORS: LazyLock<Mutex<HashMap<TypeId, Arc<SchemaDescriptor>>>> =
    LazyLock::new(Default::default);

/// Returns the schema descriptor of `T`, describing it on first use.
///
/// Descriptors are cached by type for the lifetime of the process, so every builder for `T`
/// shares one.
pub fn describe<T: Record>() -> Result<Arc<SchemaDescriptor>, SchemaError> {
    let id = TypeId::of::<T>();
    if let Some(hit) = lock_descriptors().get(&id) {
        return Ok(hit.clone());
    }

    let schema = Arc::new(describe_def(T::DEF)?);
    debug!(
        "Described record {} ({} fields)",
        schema.type_name,
        schema.fields.len()
    );
    Ok(lock_descriptors().entry(id).or_insert(schema).clone())
}

fn lock_descriptors() -> std::sync::MutexGuard<'static, HashMap<TypeId, Arc<SchemaDescriptor>>> {
    // The map is only ever inserted into, so a poisoned lock still holds consistent data.
    DESCRIPTORS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

struct Describer {
    /// Records currently being described, outermost first
    stack: Vec<&'static RecordDef>,
}

/// Record definitions are usually reached through `fn` pointers, which may hand out distinct
/// copies of the same constant, so identity falls back to comparing names and field names.
fn same_record(a: &RecordDef, b: &RecordDef) -> bool {
    core::ptr::eq(a, b)
        || (a.type_name == b.type_name
            && a.fields.len() == b.fields.len()
            && a.fields.iter().zip(b.fields).all(|(x, y)| x.name == y.name))
}

impl Describer {
    fn record(&mut self, def: &'static RecordDef) -> Result<SchemaDescriptor, SchemaError> {
        if let Some(start) = self.stack.iter().position(|d| same_record(d, def)) {
            let mut cycle: Vec<_> = self.stack[start..].iter().map(|d| d.type_name).collect();
            cycle.push(def.type_name);
            return Err(SchemaError::RecursiveRecord { cycle });
        }

        let mut seen: Vec<&'static str> = Vec::new();
        for field in def.fields {
            for key in core::iter::once(&field.name).chain(field.aliases) {
                if seen.contains(key) {
                    return Err(SchemaError::DuplicateKey {
                        record: def.type_name,
                        key: *key,
                    });
                }
                seen.push(*key);
            }
        }

        self.stack.push(def);
        let fields = def
            .fields
            .iter()
            .map(|field| self.field(def, field))
            .collect::<Result<Vec<_>, _>>();
        self.stack.pop();

        Ok(SchemaDescriptor {
            type_name: def.type_name,
            fields: fields?,
            doc: def.doc,
        })
    }

    fn field(&mut self, def: &RecordDef, field: &FieldDef) -> Result<FieldSpec, SchemaError> {
        let unsupported = || SchemaError::UnsupportedType {
            record: def.type_name,
            field: field.name,
            ty: field.ty.to_string(),
        };

        let (nullable, ty) = match field.ty {
            TypeDef::Option(inner) => (true, *inner),
            other => (false, other),
        };

        let (kind, nested_schema) = match ty {
            TypeDef::Scalar(scalar) => (FieldKind::Scalar(self.scalar(def, field, scalar)?), None),
            TypeDef::Record(nested) => (FieldKind::Record, Some(Arc::new(self.record(nested())?))),
            TypeDef::List(element) => match *element {
                TypeDef::Scalar(scalar) => (
                    FieldKind::ListOfScalar(self.scalar(def, field, scalar)?),
                    None,
                ),
                TypeDef::Record(nested) => (
                    FieldKind::ListOfRecord,
                    Some(Arc::new(self.record(nested())?)),
                ),
                _ => return Err(unsupported()),
            },
            _ => return Err(unsupported()),
        };

        let non_empty = field.flags.contains(FieldFlags::NON_EMPTY);
        if non_empty && !kind.is_list() {
            return Err(SchemaError::InvalidFlags {
                record: def.type_name,
                field: field.name,
                reason: "only lists can be non-empty",
            });
        }

        let default = field.default.map(DefaultValue);
        let spec = FieldSpec {
            name: field.name,
            aliases: field.aliases,
            kind,
            required: !nullable
                && !field.flags.contains(FieldFlags::OPTIONAL)
                && default.is_none(),
            nullable,
            non_empty,
            sensitive: field.flags.contains(FieldFlags::SENSITIVE),
            default,
            nested_schema,
            doc: field.doc,
        };

        if let Some(default) = &spec.default {
            let mut violations = Violations::default();
            crate::validate::check_field(
                &spec,
                &default.produce(),
                &FieldPath::root().field(spec.name),
                &mut violations,
            );
            if !violations.is_empty() {
                return Err(SchemaError::InvalidDefault {
                    record: def.type_name,
                    field: field.name,
                    violations,
                });
            }
        }

        Ok(spec)
    }

    fn scalar(
        &self,
        def: &RecordDef,
        field: &FieldDef,
        scalar: ScalarType,
    ) -> Result<ScalarType, SchemaError> {
        match scalar {
            ScalarType::Enum([]) => Err(SchemaError::EmptyEnum {
                record: def.type_name,
                field: field.name,
            }),
            other => Ok(other),
        }
    }
}

impl fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_fields(
            f: &mut fmt::Formatter<'_>,
            schema: &SchemaDescriptor,
            depth: usize,
        ) -> fmt::Result {
            for spec in &schema.fields {
                write!(f, "{:indent$}{}: {}", "", spec.name, spec.kind, indent = depth * 2)?;
                if spec.nullable {
                    write!(f, "?")?;
                }
                if spec.required {
                    write!(f, " (required)")?;
                }
                if let Some(default) = &spec.default {
                    write!(f, " = {}", default.produce())?;
                }
                writeln!(f)?;
                if let Some(nested) = spec.nested() {
                    write_fields(f, nested, depth + 1)?;
                }
            }
            Ok(())
        }

        writeln!(f, "{}", self.type_name)?;
        write_fields(f, self, 1)
    }
}
