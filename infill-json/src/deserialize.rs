use alloc::string::{String, ToString};
use alloc::vec::Vec;

use infill_core::{Map, Value};
use log::trace;

use crate::tokenizer::{Spanned, Token, Tokenizer};
use crate::{JsonError, JsonErrorKind, Span};

/// Parses JSON text into a [`Value`].
///
/// Integers that fit in an `i64` become [`Value::Int`], every other number a
/// [`Value::Float`]. Objects keep their key order; a repeated key keeps its first position
/// and its last value.
pub fn from_str(json: &str) -> Result<Value, JsonError> {
    from_slice(json.as_bytes())
}

/// Parses JSON bytes into a [`Value`]. See [`from_str`].
pub fn from_slice(json: &[u8]) -> Result<Value, JsonError> {
    Parser {
        input: json,
        tokenizer: Tokenizer::new(json),
    }
    .parse()
}

/// What the parser expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Instruction {
    Value,
    ObjectKey,
    ObjectKeyOrObjectClose,
    CommaThenObjectKeyOrObjectClose,
    ArrayItemOrArrayClose,
    CommaThenArrayItemOrArrayClose,
}

impl Instruction {
    fn wanted(self) -> &'static str {
        match self {
            Instruction::Value => "a value",
            Instruction::ObjectKey => "an object key",
            Instruction::ObjectKeyOrObjectClose => "an object key or '}'",
            Instruction::CommaThenObjectKeyOrObjectClose => "',' or '}'",
            Instruction::ArrayItemOrArrayClose => "a value or ']'",
            Instruction::CommaThenArrayItemOrArrayClose => "',' or ']'",
        }
    }
}

/// A container being filled
#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Object { map: Map, key: Option<String> },
}

struct Parser<'input> {
    input: &'input [u8],
    tokenizer: Tokenizer<'input>,
}

impl Parser<'_> {
    fn unexpected(&self, token: &Token, span: Span, wanted: &'static str) -> JsonError {
        JsonError::new(
            JsonErrorKind::UnexpectedToken {
                got: token.to_string(),
                wanted,
            },
            self.input,
            span,
        )
    }

    /// Runs the instruction loop. Containers are kept on an explicit stack, so deeply
    /// nested input can't overflow the call stack.
    fn parse(mut self) -> Result<Value, JsonError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut instruction = Instruction::Value;

        loop {
            let Spanned { node, span } = self.tokenizer.next_token()?;
            trace!("{instruction:?} <- {node} (depth {})", stack.len());

            let value = match (instruction, node) {
                (
                    Instruction::ObjectKeyOrObjectClose
                    | Instruction::CommaThenObjectKeyOrObjectClose,
                    Token::RBrace,
                ) => match stack.pop() {
                    Some(Frame::Object { map, .. }) => Value::Map(map),
                    _ => return Err(self.unexpected(&Token::RBrace, span, instruction.wanted())),
                },
                (
                    Instruction::ArrayItemOrArrayClose
                    | Instruction::CommaThenArrayItemOrArrayClose,
                    Token::RBracket,
                ) => match stack.pop() {
                    Some(Frame::Array(items)) => Value::List(items),
                    _ => {
                        return Err(self.unexpected(&Token::RBracket, span, instruction.wanted()));
                    }
                },
                (Instruction::CommaThenObjectKeyOrObjectClose, Token::Comma) => {
                    instruction = Instruction::ObjectKey;
                    continue;
                }
                (Instruction::CommaThenArrayItemOrArrayClose, Token::Comma) => {
                    instruction = Instruction::Value;
                    continue;
                }
                (
                    Instruction::ObjectKey | Instruction::ObjectKeyOrObjectClose,
                    Token::String(key),
                ) => {
                    let colon = self.tokenizer.next_token()?;
                    if colon.node != Token::Colon {
                        return Err(self.unexpected(&colon.node, colon.span, "':'"));
                    }
                    if let Some(Frame::Object { key: slot, .. }) = stack.last_mut() {
                        *slot = Some(key);
                    }
                    instruction = Instruction::Value;
                    continue;
                }
                (Instruction::Value | Instruction::ArrayItemOrArrayClose, node) => match node {
                    Token::LBrace => {
                        stack.push(Frame::Object {
                            map: Map::new(),
                            key: None,
                        });
                        instruction = Instruction::ObjectKeyOrObjectClose;
                        continue;
                    }
                    Token::LBracket => {
                        stack.push(Frame::Array(Vec::new()));
                        instruction = Instruction::ArrayItemOrArrayClose;
                        continue;
                    }
                    Token::String(s) => Value::String(s),
                    Token::Int(n) => Value::Int(n),
                    Token::Float(x) => Value::Float(x),
                    Token::True => Value::Bool(true),
                    Token::False => Value::Bool(false),
                    Token::Null => Value::Null,
                    other => return Err(self.unexpected(&other, span, instruction.wanted())),
                },
                (_, other) => return Err(self.unexpected(&other, span, instruction.wanted())),
            };

            // `value` is complete: it's either the result or belongs to the innermost container
            match stack.last_mut() {
                None => {
                    let end = self.tokenizer.next_token()?;
                    if end.node != Token::Eof {
                        return Err(self.unexpected(&end.node, end.span, "end of input"));
                    }
                    return Ok(value);
                }
                Some(Frame::Array(items)) => {
                    items.push(value);
                    instruction = Instruction::CommaThenArrayItemOrArrayClose;
                }
                Some(Frame::Object { map, key }) => {
                    if let Some(key) = key.take() {
                        map.insert(key, value);
                    }
                    instruction = Instruction::CommaThenObjectKeyOrObjectClose;
                }
            }
        }
    }
}
