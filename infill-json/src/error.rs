use alloc::string::String;
use core::fmt;

use infill_reflect::MalformedInputError;
use owo_colors::OwoColorize;

use crate::Span;

/// JSON text that couldn't be parsed, with where it went wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonError {
    /// What went wrong
    pub kind: JsonErrorKind,
    /// The offending bytes
    pub span: Span,
    /// 1-based line of the span's start
    pub line: usize,
    /// 1-based column (in characters) of the span's start
    pub column: usize,
}

impl JsonError {
    /// Creates an error for `span` of `input`, working out its line and column.
    pub fn new(kind: JsonErrorKind, input: &[u8], span: Span) -> Self {
        let before = &input[..span.start.min(input.len())];
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |newline| newline + 1);
        // count characters, not bytes: continuation bytes don't start one
        let column = before[line_start..]
            .iter()
            .filter(|&&b| (b & 0xc0) != 0x80)
            .count()
            + 1;
        Self {
            kind,
            span,
            line: before.iter().filter(|&&b| b == b'\n').count() + 1,
            column,
        }
    }
}

/// The ways JSON text can be malformed
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum JsonErrorKind {
    /// A character that can't start or continue anything here
    UnexpectedCharacter(char),
    /// The input ended in the middle of something
    UnexpectedEof(&'static str),
    /// A string isn't valid UTF-8
    InvalidUtf8,
    /// A backslash escape that JSON doesn't define, or a broken `\u` sequence
    InvalidEscape,
    /// A number that doesn't follow JSON's number grammar
    InvalidNumber,
    /// A number too large to represent
    NumberOutOfRange,
    /// A well-formed token in the wrong place
    UnexpectedToken {
        /// The token found, rendered
        got: String,
        /// What the parser was looking for
        wanted: &'static str,
    },
}

impl fmt::Display for JsonErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonErrorKind::UnexpectedCharacter(c) => {
                write!(f, "Unexpected character {}", c.escape_debug().red())
            }
            JsonErrorKind::UnexpectedEof(context) => {
                write!(f, "Unexpected end of input {}", context.red())
            }
            JsonErrorKind::InvalidUtf8 => write!(f, "Invalid UTF-8 in string"),
            JsonErrorKind::InvalidEscape => write!(f, "Invalid escape sequence"),
            JsonErrorKind::InvalidNumber => write!(f, "Invalid number"),
            JsonErrorKind::NumberOutOfRange => write!(f, "Number out of range"),
            JsonErrorKind::UnexpectedToken { got, wanted } => write!(
                f,
                "Unexpected token: got {}, wanted {}",
                got.red(),
                wanted.green()
            ),
        }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.kind,
            self.line.yellow(),
            self.column.yellow()
        )
    }
}

impl core::error::Error for JsonError {}

/// Why JSON text couldn't be applied to a builder
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyJsonError {
    /// The text isn't JSON
    Syntax(JsonError),
    /// The text is JSON, but not an object
    Malformed(MalformedInputError),
}

impl From<JsonError> for ApplyJsonError {
    fn from(err: JsonError) -> Self {
        ApplyJsonError::Syntax(err)
    }
}

impl From<MalformedInputError> for ApplyJsonError {
    fn from(err: MalformedInputError) -> Self {
        ApplyJsonError::Malformed(err)
    }
}

impl fmt::Display for ApplyJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyJsonError::Syntax(err) => write!(f, "{err}"),
            ApplyJsonError::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for ApplyJsonError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ApplyJsonError::Syntax(err) => Some(err),
            ApplyJsonError::Malformed(err) => Some(err),
        }
    }
}
