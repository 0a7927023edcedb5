use alloc::string::String;
use core::fmt::{self, Write};

use infill_core::{FieldPath, Map, Value};
use infill_reflect::{BuildState, FieldStatus, FillReport, Partial, SchemaDescriptor};
use yansi::{Color, Paint, Style};

use crate::InfillPretty;

const KEY: Style = Style::new().fg(Color::Cyan);
const TYPE_NAME: Style = Style::new().fg(Color::Blue).bold();
const STRING: Style = Style::new().fg(Color::Green);
const NUMBER: Style = Style::new().fg(Color::Yellow);
const LITERAL: Style = Style::new().fg(Color::Magenta);
const MUTED: Style = Style::new().dim();
const MISSING: Style = Style::new().fg(Color::Red);
const REDACTED: Style = Style::new().fg(Color::Red).bold();

/// A printer for values, builders and fill reports.
///
/// ```
/// use infill_core::map;
/// use infill_pretty::PrettyPrinter;
///
/// let printer = PrettyPrinter::new().with_colors(false);
/// let text = printer.format(&map! { "name" => "Ann", "tags" => vec!["a"] });
/// assert_eq!(text, "{\n  name: \"Ann\",\n  tags: [\n    \"a\",\n  ],\n}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyPrinter {
    indent_size: usize,
    max_depth: Option<usize>,
    use_colors: bool,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl PrettyPrinter {
    /// A printer with two-space indentation, unlimited depth, and colors
    pub const fn new() -> Self {
        Self {
            indent_size: 2,
            max_depth: None,
            use_colors: true,
        }
    }

    /// Sets the number of spaces per nesting level
    pub const fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Sets how many containers deep to print before eliding their contents
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enables or disables ANSI colors
    pub const fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Renders anything printable to a string
    pub fn format<T: InfillPretty + ?Sized>(&self, value: &T) -> String {
        let mut out = String::new();
        // writing to a String can't fail
        let _ = value.write_pretty(self, &mut out);
        out
    }

    fn styled(&self, f: &mut dyn Write, text: impl fmt::Display, style: Style) -> fmt::Result {
        if self.use_colors {
            write!(f, "{}", text.paint(style))
        } else {
            write!(f, "{text}")
        }
    }

    fn indent(&self, f: &mut dyn Write, depth: usize) -> fmt::Result {
        write!(f, "{:width$}", "", width = depth * self.indent_size)
    }

    fn too_deep(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }

    pub(crate) fn write_value(&self, f: &mut dyn Write, value: &Value, depth: usize) -> fmt::Result {
        match value {
            Value::Null => self.styled(f, "null", LITERAL),
            Value::Bool(b) => self.styled(f, b, LITERAL),
            Value::Int(i) => self.styled(f, i, NUMBER),
            Value::Float(x) => self.styled(f, format_args!("{x:?}"), NUMBER),
            Value::String(s) => self.styled(f, format_args!("{s:?}"), STRING),
            Value::List(items) if items.is_empty() => f.write_str("[]"),
            Value::List(_) if self.too_deep(depth) => self.styled(f, "[…]", MUTED),
            Value::List(items) => {
                f.write_str("[\n")?;
                for item in items {
                    self.indent(f, depth + 1)?;
                    self.write_value(f, item, depth + 1)?;
                    f.write_str(",\n")?;
                }
                self.indent(f, depth)?;
                f.write_str("]")
            }
            Value::Map(map) => self.write_map(f, map, depth),
        }
    }

    pub(crate) fn write_map(&self, f: &mut dyn Write, map: &Map, depth: usize) -> fmt::Result {
        if map.is_empty() {
            return f.write_str("{}");
        }
        if self.too_deep(depth) {
            return self.styled(f, "{…}", MUTED);
        }
        f.write_str("{\n")?;
        for (key, value) in map.iter() {
            self.indent(f, depth + 1)?;
            self.styled(f, key, KEY)?;
            f.write_str(": ")?;
            self.write_value(f, value, depth + 1)?;
            f.write_str(",\n")?;
        }
        self.indent(f, depth)?;
        f.write_str("}")
    }

    /// Type name and state, then one line per field with its status, then what's missing.
    pub(crate) fn write_partial(&self, f: &mut dyn Write, partial: &Partial) -> fmt::Result {
        self.styled(f, partial.schema().type_name, TYPE_NAME)?;
        f.write_str(" ")?;
        match partial.state() {
            BuildState::Empty => self.styled(f, "[empty]", MUTED)?,
            BuildState::Partial => self.styled(f, "[partial]", NUMBER)?,
            BuildState::Complete => self.styled(f, "[complete]", STRING)?,
        }
        f.write_str("\n")?;
        self.write_fields(f, partial, partial.schema(), &FieldPath::root(), 1)?;

        let missing = partial.missing_required();
        if !missing.is_empty() {
            f.write_str("missing: ")?;
            for (i, path) in missing.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                self.styled(f, path, MISSING)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }

    fn write_fields(
        &self,
        f: &mut dyn Write,
        partial: &Partial,
        schema: &SchemaDescriptor,
        prefix: &FieldPath,
        depth: usize,
    ) -> fmt::Result {
        for spec in &schema.fields {
            let path = prefix.field(spec.name);
            let status = partial.status_of(&path).unwrap_or(FieldStatus::Unset);

            self.indent(f, depth)?;
            self.styled(f, spec.name, KEY)?;
            f.write_str(": ")?;

            match (partial.get(&path), spec.nested()) {
                (None, _) => {
                    self.styled(f, "<unset>", MUTED)?;
                    if spec.required {
                        f.write_str("  ")?;
                        self.styled(f, "(required)", MISSING)?;
                    }
                    f.write_str("\n")?;
                }
                (Some(_), _) if spec.sensitive => {
                    self.styled(f, "[REDACTED]", REDACTED)?;
                    self.write_status(f, status)?;
                }
                (Some(Value::Map(_)), Some(_)) if self.too_deep(depth) => {
                    self.styled(f, "{…}", MUTED)?;
                    self.write_status(f, status)?;
                }
                (Some(Value::Map(_)), Some(nested)) => {
                    f.write_str("{")?;
                    self.write_status(f, status)?;
                    self.write_fields(f, partial, nested, &path, depth + 1)?;
                    self.indent(f, depth)?;
                    f.write_str("}\n")?;
                }
                (Some(Value::List(items)), Some(_)) if !items.is_empty() && self.too_deep(depth) => {
                    self.styled(f, "[…]", MUTED)?;
                    self.write_status(f, status)?;
                }
                (Some(Value::List(items)), Some(nested)) if !items.is_empty() => {
                    f.write_str("[")?;
                    self.write_status(f, status)?;
                    for index in 0..items.len() {
                        let element = path.index(index);
                        let element_status =
                            partial.status_of(&element).unwrap_or(FieldStatus::Unset);
                        self.indent(f, depth + 1)?;
                        f.write_str("{")?;
                        self.write_status(f, element_status)?;
                        self.write_fields(f, partial, nested, &element, depth + 2)?;
                        self.indent(f, depth + 1)?;
                        f.write_str("},\n")?;
                    }
                    self.indent(f, depth)?;
                    f.write_str("]\n")?;
                }
                (Some(value), _) => {
                    self.write_value(f, value, depth)?;
                    self.write_status(f, status)?;
                }
            }
        }
        Ok(())
    }

    /// Ends a field line with its provenance
    fn write_status(&self, f: &mut dyn Write, status: FieldStatus) -> fmt::Result {
        if status.is_filled() {
            f.write_str("  ")?;
            self.styled(f, format_args!("({status})"), MUTED)?;
        }
        f.write_str("\n")
    }

    pub(crate) fn write_report(&self, f: &mut dyn Write, report: &FillReport) -> fmt::Result {
        self.styled(f, report.summary(), Style::new().bold())?;
        f.write_str("\n")?;
        self.write_section(f, "accepted", report.accepted().iter(), STRING)?;
        if !report.rejected().is_empty() {
            self.indent(f, 1)?;
            f.write_str("rejected: ")?;
            for (i, (path, reason)) in report.rejected().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                self.styled(f, path, MISSING)?;
                f.write_str(" ")?;
                self.styled(f, format_args!("({})", reason.as_str()), MUTED)?;
            }
            f.write_str("\n")?;
        }
        self.write_section(f, "unknown", report.unknown_keys().iter(), NUMBER)?;
        self.write_section(f, "defaulted", report.defaults_applied().iter(), MUTED)?;
        self.write_section(f, "cleared", report.cleared().iter(), LITERAL)
    }

    fn write_section<'a>(
        &self,
        f: &mut dyn Write,
        label: &str,
        paths: impl ExactSizeIterator<Item = &'a FieldPath>,
        style: Style,
    ) -> fmt::Result {
        if paths.len() == 0 {
            return Ok(());
        }
        self.indent(f, 1)?;
        write!(f, "{label}: ")?;
        for (i, path) in paths.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.styled(f, path, style)?;
        }
        f.write_str("\n")
    }
}
