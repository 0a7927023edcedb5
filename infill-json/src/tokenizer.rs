use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
use core::str;

use crate::{JsonError, JsonErrorKind};

/// A byte range in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Number of bytes
    pub len: usize,
}

impl Span {
    /// Creates a span of `len` bytes starting at `start`
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Offset one past the last byte
    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A token along with where it was found
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    String(String),
    /// A number without fraction or exponent that fits in an `i64`
    Int(i64),
    /// Every other number
    Float(f64),
    True,
    False,
    Null,
    Eof,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::String(s) => write!(f, "string {s:?}"),
            Token::Int(n) => write!(f, "number {n}"),
            Token::Float(n) => write!(f, "number {n}"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

type TokenResult = Result<Spanned<Token>, JsonError>;

pub(crate) struct Tokenizer<'input> {
    input: &'input [u8],
    pos: usize,
}

impl<'input> Tokenizer<'input> {
    pub fn new(input: &'input [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, kind: JsonErrorKind, span: Span) -> JsonError {
        JsonError::new(kind, self.input, span)
    }

    pub fn next_token(&mut self) -> TokenResult {
        self.skip_whitespace();
        let start = self.pos;
        let Some(&c) = self.input.get(start) else {
            return Ok(Spanned {
                node: Token::Eof,
                span: Span::new(start, 0),
            });
        };

        let single = match c {
            b'{' => Token::LBrace,
            b'}' => Token::RBrace,
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            b':' => Token::Colon,
            b',' => Token::Comma,
            b'"' => return self.string(start),
            b'-' | b'0'..=b'9' => return self.number(start),
            b't' => return self.literal(start, b"true", Token::True),
            b'f' => return self.literal(start, b"false", Token::False),
            b'n' => return self.literal(start, b"null", Token::Null),
            _ => {
                return Err(self.error(
                    JsonErrorKind::UnexpectedCharacter(self.char_at(start)),
                    Span::new(start, 1),
                ));
            }
        };
        self.pos += 1;
        Ok(Spanned {
            node: single,
            span: Span::new(start, 1),
        })
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.input.get(self.pos) {
            self.pos += 1;
        }
    }

    /// The (possibly multi-byte) character starting at `pos`, for error messages
    fn char_at(&self, pos: usize) -> char {
        let tail = &self.input[pos..self.input.len().min(pos + 4)];
        let valid = match str::from_utf8(tail) {
            Ok(s) => s,
            Err(e) => str::from_utf8(&tail[..e.valid_up_to()]).unwrap_or_default(),
        };
        valid.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn string(&mut self, start: usize) -> TokenResult {
        self.pos += 1;
        let mut buf = Vec::new();

        loop {
            let Some(&b) = self.input.get(self.pos) else {
                return Err(self.error(
                    JsonErrorKind::UnexpectedEof("in string literal"),
                    Span::new(start, self.pos - start),
                ));
            };
            match b {
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => self.escape(&mut buf)?,
                0x00..=0x1f => {
                    return Err(self.error(
                        JsonErrorKind::UnexpectedCharacter(b as char),
                        Span::new(self.pos, 1),
                    ));
                }
                _ => {
                    buf.push(b);
                    self.pos += 1;
                }
            }
        }

        let span = Span::new(start, self.pos - start);
        match String::from_utf8(buf) {
            Ok(s) => Ok(Spanned {
                node: Token::String(s),
                span,
            }),
            Err(_) => Err(self.error(JsonErrorKind::InvalidUtf8, span)),
        }
    }

    /// Decodes the escape sequence at `pos` (which points at the backslash) into `buf`.
    fn escape(&mut self, buf: &mut Vec<u8>) -> Result<(), JsonError> {
        let start = self.pos;
        let Some(&esc) = self.input.get(start + 1) else {
            return Err(self.error(
                JsonErrorKind::UnexpectedEof("in string escape"),
                Span::new(start, 1),
            ));
        };
        let simple = match esc {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let c = self.unicode_escape(start)?;
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                return Ok(());
            }
            _ => {
                return Err(self.error(JsonErrorKind::InvalidEscape, Span::new(start, 2)));
            }
        };
        buf.push(simple);
        self.pos += 2;
        Ok(())
    }

    /// Decodes `\uXXXX`, or a surrogate pair `\uXXXX\uXXXX`, starting at `start`.
    fn unicode_escape(&mut self, start: usize) -> Result<char, JsonError> {
        let high = self.hex4(start + 2)?;
        self.pos = start + 6;

        let code = match high {
            0xd800..=0xdbff => {
                let invalid = self.error(JsonErrorKind::InvalidEscape, Span::new(start, 6));
                if self.input.get(self.pos..self.pos + 2) != Some(b"\\u") {
                    return Err(invalid);
                }
                let low = self.hex4(self.pos + 2)?;
                if !(0xdc00..=0xdfff).contains(&low) {
                    return Err(invalid);
                }
                self.pos += 6;
                0x10000 + ((u32::from(high) - 0xd800) << 10) + (u32::from(low) - 0xdc00)
            }
            _ => u32::from(high),
        };
        char::from_u32(code)
            .ok_or_else(|| self.error(JsonErrorKind::InvalidEscape, Span::new(start, self.pos - start)))
    }

    fn hex4(&self, at: usize) -> Result<u16, JsonError> {
        let Some(digits) = self.input.get(at..at + 4) else {
            return Err(self.error(
                JsonErrorKind::UnexpectedEof("in unicode escape"),
                Span::new(at, self.input.len().saturating_sub(at)),
            ));
        };
        str::from_utf8(digits)
            .ok()
            .and_then(|hex| u16::from_str_radix(hex, 16).ok())
            .ok_or_else(|| self.error(JsonErrorKind::InvalidEscape, Span::new(at, 4)))
    }

    fn number(&mut self, start: usize) -> TokenResult {
        let digits = |input: &[u8], mut at: usize| {
            while input.get(at).is_some_and(u8::is_ascii_digit) {
                at += 1;
            }
            at
        };

        let mut end = start;
        if self.input[end] == b'-' {
            end += 1;
        }
        let int_start = end;
        end = digits(self.input, end);
        let int_digits = end - int_start;
        if int_digits == 0 || (int_digits > 1 && self.input[int_start] == b'0') {
            return Err(self.error(
                JsonErrorKind::InvalidNumber,
                Span::new(start, (end - start).max(1)),
            ));
        }

        let mut integral = true;
        if self.input.get(end) == Some(&b'.') {
            integral = false;
            let frac_start = end + 1;
            end = digits(self.input, frac_start);
            if end == frac_start {
                return Err(self.error(JsonErrorKind::InvalidNumber, Span::new(start, end - start)));
            }
        }
        if let Some(b'e' | b'E') = self.input.get(end) {
            integral = false;
            end += 1;
            if let Some(b'+' | b'-') = self.input.get(end) {
                end += 1;
            }
            let exp_start = end;
            end = digits(self.input, exp_start);
            if end == exp_start {
                return Err(self.error(JsonErrorKind::InvalidNumber, Span::new(start, end - start)));
            }
        }

        let span = Span::new(start, end - start);
        // only ASCII digits, signs, dots and exponents were consumed
        let text = str::from_utf8(&self.input[start..end]).unwrap_or_default();
        let int = if integral { text.parse::<i64>().ok() } else { None };
        let token = match int {
            Some(n) => Token::Int(n),
            None => match text.parse::<f64>() {
                Ok(x) if x.is_finite() => Token::Float(x),
                _ => return Err(self.error(JsonErrorKind::NumberOutOfRange, span)),
            },
        };

        self.pos = end;
        Ok(Spanned { node: token, span })
    }

    fn literal(&mut self, start: usize, word: &[u8], token: Token) -> TokenResult {
        let end = start + word.len();
        if self.input.get(start..end) == Some(word) {
            self.pos = end;
            return Ok(Spanned {
                node: token,
                span: Span::new(start, word.len()),
            });
        }

        let matched = word
            .iter()
            .zip(&self.input[start..])
            .take_while(|(a, b)| a == b)
            .count();
        let at = start + matched;
        Err(match self.input.get(at) {
            Some(_) => self.error(
                JsonErrorKind::UnexpectedCharacter(self.char_at(at)),
                Span::new(at, 1),
            ),
            None => self.error(
                JsonErrorKind::UnexpectedEof("in literal"),
                Span::new(start, matched),
            ),
        })
    }
}
