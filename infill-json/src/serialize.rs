use alloc::string::String;
use alloc::vec::Vec;

use infill_core::{Map, Value};
use log::debug;

use crate::{JsonWrite, write_json_string};

/// Serializes a value to compact JSON text.
///
/// Non-finite floats have no JSON spelling and are written as `null`.
pub fn to_string(value: &Value) -> String {
    let mut out = Vec::new();
    to_writer(value, &mut out);
    // the serializer only writes valid UTF-8
    String::from_utf8(out).unwrap_or_default()
}

/// Serializes a value to indented JSON text, `indent` spaces per level.
pub fn to_string_pretty(value: &Value, indent: usize) -> String {
    let mut out = Vec::new();
    JsonSerializer {
        writer: &mut out,
        indent: Some(indent),
        depth: 0,
    }
    .value(value);
    String::from_utf8(out).unwrap_or_default()
}

/// Serializes a value to compact JSON and writes it to `writer`.
pub fn to_writer<W: JsonWrite>(value: &Value, writer: W) {
    JsonSerializer {
        writer,
        indent: None,
        depth: 0,
    }
    .value(value);
}

struct JsonSerializer<W> {
    writer: W,
    indent: Option<usize>,
    depth: usize,
}

impl<W: JsonWrite> JsonSerializer<W> {
    fn value(&mut self, value: &Value) {
        match value {
            Value::Null => self.writer.write(b"null"),
            Value::Bool(b) => self.writer.write(if *b { b"true" } else { b"false" }),
            Value::Int(i) => self.writer.write(itoa::Buffer::new().format(*i).as_bytes()),
            Value::Float(x) if x.is_finite() => {
                self.writer.write(ryu::Buffer::new().format_finite(*x).as_bytes())
            }
            Value::Float(x) => {
                debug!("Writing non-finite float {x} as null");
                self.writer.write(b"null")
            }
            Value::String(s) => {
                self.writer.reserve(s.len() + 2);
                write_json_string(&mut self.writer, s);
            }
            Value::List(items) => self.list(items),
            Value::Map(map) => self.map(map),
        }
    }

    fn list(&mut self, items: &[Value]) {
        self.writer.write(b"[");
        if items.is_empty() {
            return self.writer.write(b"]");
        }
        self.depth += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.writer.write(b",");
            }
            self.newline();
            self.value(item);
        }
        self.depth -= 1;
        self.newline();
        self.writer.write(b"]");
    }

    fn map(&mut self, map: &Map) {
        self.writer.write(b"{");
        if map.is_empty() {
            return self.writer.write(b"}");
        }
        self.depth += 1;
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                self.writer.write(b",");
            }
            self.newline();
            write_json_string(&mut self.writer, key);
            self.writer
                .write(if self.indent.is_some() { b": " } else { b":" });
            self.value(value);
        }
        self.depth -= 1;
        self.newline();
        self.writer.write(b"}");
    }

    fn newline(&mut self) {
        if let Some(indent) = self.indent {
            self.writer.write(b"\n");
            for _ in 0..indent * self.depth {
                self.writer.write(b" ");
            }
        }
    }
}
