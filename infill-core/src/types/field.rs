use bitflags::bitflags;

use super::TypeDef;
use crate::Value;

/// Produces a field's default value.
///
/// Defaults are factories rather than stored values: every partial value gets a fresh
/// copy, so nothing mutable is ever shared between two builders.
pub type DefaultFn = fn() -> Value;

/// Describes a field in a record
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct FieldDef {
    /// key for the field, as it appears in inputs and outputs
    pub name: &'static str,

    /// other keys accepted for this field in inputs (e.g. `zipCode` for `zip_code`)
    pub aliases: &'static [&'static str],

    /// declared type of the field
    pub ty: TypeDef,

    /// flags for the field (e.g. optional, sensitive, etc.)
    pub flags: FieldFlags,

    /// default value factory, if the field has a default
    pub default: Option<DefaultFn>,

    /// doc comments
    pub doc: &'static [&'static str],
}

impl FieldDef {
    /// Returns a builder for FieldDef
    pub const fn builder() -> FieldDefBuilder {
        FieldDefBuilder::new()
    }

    /// Returns true if an input key refers to this field
    pub fn answers_to(&self, key: &str) -> bool {
        self.name == key || self.aliases.iter().any(|alias| *alias == key)
    }
}

/// Builder for FieldDef
pub struct FieldDefBuilder {
    name: Option<&'static str>,
    aliases: &'static [&'static str],
    ty: Option<TypeDef>,
    flags: FieldFlags,
    default: Option<DefaultFn>,
    doc: &'static [&'static str],
}

impl FieldDefBuilder {
    /// Creates a new FieldDefBuilder
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            name: None,
            aliases: &[],
            ty: None,
            flags: FieldFlags::EMPTY,
            default: None,
            doc: &[],
        }
    }

    /// Sets the name for the FieldDef
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the aliases for the FieldDef
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Sets the type for the FieldDef
    pub const fn ty(mut self, ty: TypeDef) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Sets the flags for the FieldDef
    pub const fn flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the default value factory for the FieldDef
    pub const fn default(mut self, default: DefaultFn) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the doc comments for the FieldDef
    pub const fn doc(mut self, doc: &'static [&'static str]) -> Self {
        self.doc = doc;
        self
    }

    /// Builds the FieldDef
    ///
    /// # Panics
    ///
    /// Panics (at compile time, in const context) if the name or type wasn't set.
    pub const fn build(self) -> FieldDef {
        FieldDef {
            name: match self.name {
                Some(name) => name,
                None => panic!("FieldDef requires a name"),
            },
            aliases: self.aliases,
            ty: match self.ty {
                Some(ty) => ty,
                None => panic!("FieldDef requires a type"),
            },
            flags: self.flags,
            default: self.default,
            doc: self.doc,
        }
    }
}

bitflags! {
    /// Flags that can be applied to fields to modify how they're filled
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u64 {
        /// An empty set of flags
        const EMPTY = 0;

        /// The field may be left out of a complete record even though it has no default
        const OPTIONAL = 1 << 0;

        /// A list field must hold at least one element
        const NON_EMPTY = 1 << 1;

        /// The field contains sensitive data that should not be displayed
        const SENSITIVE = 1 << 2;
    }
}

impl Default for FieldFlags {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY
    }
}
