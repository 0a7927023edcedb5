#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

use alloc::vec::Vec;

mod error;
pub use error::*;

mod deserialize;
pub use deserialize::*;

mod serialize;
pub use serialize::*;

mod builder;
pub use builder::*;

mod tokenizer;
pub use tokenizer::Span;

/// `no_std` compatible sink for the JSON serializer.
pub trait JsonWrite {
    /// Write all these bytes to the writer.
    fn write(&mut self, buf: &[u8]);

    /// If the writer supports it, reserve space for `additional` more bytes.
    fn reserve(&mut self, additional: usize);
}

impl JsonWrite for Vec<u8> {
    fn write(&mut self, buf: &[u8]) {
        self.extend_from_slice(buf);
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional)
    }
}

impl<W: JsonWrite + ?Sized> JsonWrite for &mut W {
    fn write(&mut self, buf: &[u8]) {
        (**self).write(buf);
    }

    fn reserve(&mut self, additional: usize) {
        (**self).reserve(additional);
    }
}

/// Writes `s` as a quoted JSON string.
///
/// Runs of characters that need no escaping are written in one go.
fn write_json_string<W: JsonWrite>(writer: &mut W, s: &str) {
    writer.write(b"\"");
    let bytes = s.as_bytes();
    let mut clean_from = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let escape: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0c => b"\\f",
            0x00..=0x1f => {
                writer.write(&bytes[clean_from..i]);
                write_control_escape(writer, b);
                clean_from = i + 1;
                continue;
            }
            _ => continue,
        };
        writer.write(&bytes[clean_from..i]);
        writer.write(escape);
        clean_from = i + 1;
    }
    writer.write(&bytes[clean_from..]);
    writer.write(b"\"");
}

/// Writes a control character as `\u00XX`
fn write_control_escape<W: JsonWrite>(writer: &mut W, b: u8) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    writer.write(&[
        b'\\',
        b'u',
        b'0',
        b'0',
        HEX[usize::from(b >> 4)],
        HEX[usize::from(b & 0xf)],
    ]);
}
