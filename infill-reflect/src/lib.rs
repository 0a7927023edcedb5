#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

#[cfg(feature = "log")]
macro_rules! trace {
    ($($tt:tt)*) => {
        log::trace!($($tt)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($tt:tt)*) => {
        if false {
            let _ = format_args!($($tt)*);
        }
    };
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($tt:tt)*) => {
        log::debug!($($tt)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($tt:tt)*) => {
        if false {
            let _ = format_args!($($tt)*);
        }
    };
}

mod error;
pub use error::*;

mod schema;
pub use schema::*;

mod validate;
pub use validate::*;

mod report;
pub use report::*;

mod tracker;
pub use tracker::*;

mod partial;
pub use partial::*;
