#![no_std]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

use core::fmt;

use infill_core::{Map, Value};
use infill_reflect::{Builder, FillReport, Partial};

mod printer;
pub use printer::*;

/// Something a [`PrettyPrinter`] knows how to render.
pub trait InfillPretty {
    /// Renders `self` with the given printer
    fn write_pretty(&self, printer: &PrettyPrinter, f: &mut dyn fmt::Write) -> fmt::Result;

    /// Returns a displayable wrapper using the default printer
    fn pretty(&self) -> PrettyDisplay<'_, Self> {
        self.pretty_with(PrettyPrinter::new())
    }

    /// Returns a displayable wrapper using a custom printer
    fn pretty_with(&self, printer: PrettyPrinter) -> PrettyDisplay<'_, Self> {
        PrettyDisplay {
            value: self,
            printer,
        }
    }
}

/// Displays a value through a [`PrettyPrinter`]
pub struct PrettyDisplay<'a, T: ?Sized> {
    value: &'a T,
    printer: PrettyPrinter,
}

impl<T: InfillPretty + ?Sized> fmt::Display for PrettyDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.write_pretty(&self.printer, f)
    }
}

impl InfillPretty for Value {
    fn write_pretty(&self, printer: &PrettyPrinter, f: &mut dyn fmt::Write) -> fmt::Result {
        printer.write_value(f, self, 0)
    }
}

impl InfillPretty for Map {
    fn write_pretty(&self, printer: &PrettyPrinter, f: &mut dyn fmt::Write) -> fmt::Result {
        printer.write_map(f, self, 0)
    }
}

/// Field by field, with provenance. Sensitive fields are redacted.
impl InfillPretty for Partial {
    fn write_pretty(&self, printer: &PrettyPrinter, f: &mut dyn fmt::Write) -> fmt::Result {
        printer.write_partial(f, self)
    }
}

impl<T> InfillPretty for Builder<T> {
    fn write_pretty(&self, printer: &PrettyPrinter, f: &mut dyn fmt::Write) -> fmt::Result {
        printer.write_partial(f, self)
    }
}

impl InfillPretty for FillReport {
    fn write_pretty(&self, printer: &PrettyPrinter, f: &mut dyn fmt::Write) -> fmt::Result {
        printer.write_report(f, self)
    }
}
