use super::FieldDef;

/// Describes a record type: its name and its fields, in declaration order.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct RecordDef {
    /// name of the record type, without module path
    pub type_name: &'static str,

    /// all fields, in declaration order
    pub fields: &'static [FieldDef],

    /// doc comments
    pub doc: &'static [&'static str],
}

impl RecordDef {
    /// Returns a builder for RecordDef
    pub const fn builder() -> RecordDefBuilder {
        RecordDefBuilder::new()
    }

    /// Returns the field that answers to `key` (its name or one of its aliases)
    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.answers_to(key))
    }
}

/// Builder for RecordDef
pub struct RecordDefBuilder {
    type_name: Option<&'static str>,
    fields: &'static [FieldDef],
    doc: &'static [&'static str],
}

impl RecordDefBuilder {
    /// Creates a new RecordDefBuilder
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            type_name: None,
            fields: &[],
            doc: &[],
        }
    }

    /// Sets the type name for the RecordDef
    pub const fn type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Sets the fields for the RecordDef
    pub const fn fields(mut self, fields: &'static [FieldDef]) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the doc comments for the RecordDef
    pub const fn doc(mut self, doc: &'static [&'static str]) -> Self {
        self.doc = doc;
        self
    }

    /// Builds the RecordDef
    ///
    /// # Panics
    ///
    /// Panics (at compile time, in const context) if the type name wasn't set.
    pub const fn build(self) -> RecordDef {
        RecordDef {
            type_name: match self.type_name {
                Some(type_name) => type_name,
                None => panic!("RecordDef requires a type name"),
            },
            fields: self.fields,
            doc: self.doc,
        }
    }
}
