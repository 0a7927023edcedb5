//! Record definitions: the static, typed description of a record's fields.
//!
//! These are the inputs of the reflection layer. A schema compiler (or a hand-written impl
//! of [`crate::Record`]) builds them in const context with the builders below; the reflection
//! layer classifies them into schema descriptors, rejecting anything it can't fill.

mod def;
pub use def::*;

mod field;
pub use field::*;

mod record;
pub use record::*;
