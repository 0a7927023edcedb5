#![no_std]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod macros;

// Dynamic values: what callers feed in and what builders hand back
mod value;
pub use value::*;

// Structural addresses into nested values
mod path;
pub use path::*;

// Record definitions, as emitted by a schema compiler
mod types;
pub use types::*;

// Conversion from dynamic values into typed values
mod convert;
pub use convert::*;

// `FromValue` for `core::` and `alloc::` types
mod impls;

/// A typed record that can describe its own fields.
///
/// Implementations are normally produced by a schema compiler or code generator: the
/// definition lists every field with its type, whether it may be omitted, and its default.
/// The reflection layer turns this definition into a schema descriptor and drives incremental
/// construction through it; the final, complete value is handed back through [`FromValue`].
pub trait Record: FromValue + 'static {
    /// The definition of this record
    const DEF: &'static RecordDef;
}

/// Returns the definition of `T`, usable as a `fn` pointer in const context.
pub fn def_of<T: Record>() -> &'static RecordDef {
    T::DEF
}
