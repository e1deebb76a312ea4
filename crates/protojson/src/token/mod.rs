//! Token-level interface to the JSON tokenizer.
//!
//! The codec pulls [`Token`]s from a [`TokenSource`] and pushes them into a
//! [`TokenSink`], one token at a time. [`JsonTokenReader`] and
//! [`JsonTokenWriter`] adapt the `struson` streaming reader and writer;
//! [`TokenBuffer`] records and replays tokens in memory.

mod buffer;
mod stream;

pub use buffer::TokenBuffer;
pub use stream::{JsonTokenReader, JsonTokenWriter};

use std::fmt;

use crate::error::CodecError;

/// One lexical JSON event.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Name(String),
    String(String),
    /// Number in its JSON text form; the consumer picks the numeric type.
    Number(String),
    Bool(bool),
    Null,
}

impl Token {
    /// Short label used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::StartObject => "object",
            Self::EndObject => "end of object",
            Self::StartArray => "array",
            Self::EndArray => "end of array",
            Self::Name(_) => "key",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "key {name:?}"),
            Self::String(s) => write!(f, "string {s:?}"),
            Self::Number(n) => write!(f, "number {n}"),
            Self::Bool(b) => write!(f, "boolean {b}"),
            other => f.write_str(other.describe()),
        }
    }
}

/// Pull side: yields the next token, `None` once the stream is exhausted.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Option<Token>, CodecError>;
}

/// Push side.
pub trait TokenSink {
    fn start_object(&mut self) -> Result<(), CodecError>;
    fn end_object(&mut self) -> Result<(), CodecError>;
    fn start_array(&mut self) -> Result<(), CodecError>;
    fn end_array(&mut self) -> Result<(), CodecError>;
    fn name(&mut self, name: &str) -> Result<(), CodecError>;
    fn string(&mut self, value: &str) -> Result<(), CodecError>;
    fn int32(&mut self, value: i32) -> Result<(), CodecError>;
    fn int64(&mut self, value: i64) -> Result<(), CodecError>;
    fn float(&mut self, value: f32) -> Result<(), CodecError>;
    fn double(&mut self, value: f64) -> Result<(), CodecError>;
    fn bool(&mut self, value: bool) -> Result<(), CodecError>;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Result<Option<Token>, CodecError> {
        (**self).next_token()
    }
}
