#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use infill_core::*;

pub use infill_reflect::*;

/// JSON text in and out of builders
#[cfg(feature = "json")]
pub use infill_json as json;

/// Human-readable rendering of values, builders and fill reports
#[cfg(feature = "pretty")]
pub use infill_pretty as pretty;

pub use static_assertions;
