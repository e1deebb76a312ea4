//! Adapters between the token interface and `struson`'s streaming JSON
//! reader and writer.

use std::fmt::Display;
use std::io;

use struson::reader::{JsonReader, JsonStreamReader, ValueType};
use struson::writer::{JsonStreamWriter, JsonWriter};

use super::{Token, TokenSink, TokenSource};
use crate::error::CodecError;

fn malformed<E: Display>(err: E) -> CodecError {
    CodecError::malformed(err.to_string())
}

fn serialization<E: Display>(err: E) -> CodecError {
    CodecError::Serialization(err.to_string())
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Object { expect_name: bool },
    Array,
}

/// Pulls [`Token`]s out of a `struson` [`JsonReader`].
///
/// `struson` enforces JSON syntax; this adapter only tracks whether the next
/// item inside an object is a member name or a member value.
pub struct JsonTokenReader<J> {
    json: J,
    stack: Vec<Frame>,
    started: bool,
}

impl<R: io::Read> JsonTokenReader<JsonStreamReader<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(JsonStreamReader::new(reader))
    }
}

impl<J: JsonReader> JsonTokenReader<J> {
    pub fn new(json: J) -> Self {
        Self {
            json,
            stack: Vec::new(),
            started: false,
        }
    }

    /// Number of currently open objects and arrays.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Requires that nothing but whitespace follows the top-level value.
    pub fn finish(self) -> Result<(), CodecError> {
        self.json.consume_trailing_whitespace().map_err(malformed)
    }

    fn value_done(&mut self) {
        if let Some(Frame::Object { expect_name }) = self.stack.last_mut() {
            *expect_name = true;
        }
    }
}

impl<J: JsonReader> TokenSource for JsonTokenReader<J> {
    fn next_token(&mut self) -> Result<Option<Token>, CodecError> {
        match self.stack.last().copied() {
            None if self.started => return Ok(None),
            None => self.started = true,
            Some(Frame::Object { expect_name: true }) => {
                if self.json.has_next().map_err(malformed)? {
                    let name = self.json.next_name_owned().map_err(malformed)?;
                    if let Some(Frame::Object { expect_name }) = self.stack.last_mut() {
                        *expect_name = false;
                    }
                    return Ok(Some(Token::Name(name)));
                }
                self.json.end_object().map_err(malformed)?;
                self.stack.pop();
                self.value_done();
                return Ok(Some(Token::EndObject));
            }
            Some(Frame::Object { expect_name: false }) => {}
            Some(Frame::Array) => {
                if !self.json.has_next().map_err(malformed)? {
                    self.json.end_array().map_err(malformed)?;
                    self.stack.pop();
                    self.value_done();
                    return Ok(Some(Token::EndArray));
                }
            }
        }

        let token = match self.json.peek().map_err(malformed)? {
            ValueType::Object => {
                self.json.begin_object().map_err(malformed)?;
                self.stack.push(Frame::Object { expect_name: true });
                return Ok(Some(Token::StartObject));
            }
            ValueType::Array => {
                self.json.begin_array().map_err(malformed)?;
                self.stack.push(Frame::Array);
                return Ok(Some(Token::StartArray));
            }
            ValueType::String => Token::String(self.json.next_string().map_err(malformed)?),
            ValueType::Number => {
                Token::Number(self.json.next_number_as_string().map_err(malformed)?)
            }
            ValueType::Boolean => Token::Bool(self.json.next_bool().map_err(malformed)?),
            ValueType::Null => {
                self.json.next_null().map_err(malformed)?;
                Token::Null
            }
        };
        self.value_done();
        Ok(Some(token))
    }
}

/// Pushes tokens into a `struson` [`JsonWriter`].
pub struct JsonTokenWriter<J> {
    json: J,
}

impl<W: io::Write> JsonTokenWriter<JsonStreamWriter<W>> {
    pub fn from_writer(writer: W) -> Self {
        Self::new(JsonStreamWriter::new(writer))
    }
}

impl<J: JsonWriter> JsonTokenWriter<J> {
    pub fn new(json: J) -> Self {
        Self { json }
    }

    /// Completes the document and flushes the underlying writer.
    pub fn finish(self) -> Result<(), CodecError> {
        self.json.finish_document().map_err(serialization)?;
        Ok(())
    }
}

impl<J: JsonWriter> TokenSink for JsonTokenWriter<J> {
    fn start_object(&mut self) -> Result<(), CodecError> {
        self.json.begin_object().map_err(serialization)
    }

    fn end_object(&mut self) -> Result<(), CodecError> {
        self.json.end_object().map_err(serialization)
    }

    fn start_array(&mut self) -> Result<(), CodecError> {
        self.json.begin_array().map_err(serialization)
    }

    fn end_array(&mut self) -> Result<(), CodecError> {
        self.json.end_array().map_err(serialization)
    }

    fn name(&mut self, name: &str) -> Result<(), CodecError> {
        self.json.name(name).map_err(serialization)
    }

    fn string(&mut self, value: &str) -> Result<(), CodecError> {
        self.json.string_value(value).map_err(serialization)
    }

    fn int32(&mut self, value: i32) -> Result<(), CodecError> {
        self.json.number_value(value).map_err(serialization)
    }

    fn int64(&mut self, value: i64) -> Result<(), CodecError> {
        self.json.number_value(value).map_err(serialization)
    }

    fn float(&mut self, value: f32) -> Result<(), CodecError> {
        self.json.fp_number_value(value).map_err(serialization)
    }

    fn double(&mut self, value: f64) -> Result<(), CodecError> {
        self.json.fp_number_value(value).map_err(serialization)
    }

    fn bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.json.bool_value(value).map_err(serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_all(json: &str) -> Result<Vec<Token>, CodecError> {
        let mut reader = JsonTokenReader::from_reader(json.as_bytes());
        let mut out = Vec::new();
        while let Some(t) = reader.next_token()? {
            out.push(t);
        }
        reader.finish()?;
        Ok(out)
    }

    #[test]
    fn reader_yields_names_and_values_in_order() {
        let tokens = pull_all(r#"{"a": [1, true, null], "b": {"c": "x"}, "d": -2.5}"#).unwrap();
        assert_eq!(
            tokens,
            [
                Token::StartObject,
                Token::Name("a".into()),
                Token::StartArray,
                Token::Number("1".into()),
                Token::Bool(true),
                Token::Null,
                Token::EndArray,
                Token::Name("b".into()),
                Token::StartObject,
                Token::Name("c".into()),
                Token::String("x".into()),
                Token::EndObject,
                Token::Name("d".into()),
                Token::Number("-2.5".into()),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn reader_depth_follows_open_containers() {
        let mut reader = JsonTokenReader::from_reader(r#"{"a": [1, {"b": 2}]}"#.as_bytes());
        assert_eq!(reader.depth(), 0);
        let mut depths = Vec::new();
        while reader.next_token().unwrap().is_some() {
            depths.push(reader.depth());
        }
        assert_eq!(depths, [1, 1, 2, 2, 3, 3, 3, 2, 1, 0]);
        reader.finish().unwrap();
    }

    #[test]
    fn reader_reports_syntax_errors_as_malformed() {
        assert!(matches!(
            pull_all(r#"{"a" 1}"#),
            Err(CodecError::MalformedJson(_))
        ));
        assert!(matches!(
            pull_all(r#"{"a": 1"#),
            Err(CodecError::MalformedJson(_))
        ));
        assert!(matches!(
            pull_all(r#"{} {}"#),
            Err(CodecError::MalformedJson(_))
        ));
    }

    #[test]
    fn writer_emits_compact_json() {
        let mut out = Vec::new();
        let mut w = JsonTokenWriter::from_writer(&mut out);
        w.start_object().unwrap();
        w.name("n").unwrap();
        w.start_array().unwrap();
        w.int32(1).unwrap();
        w.int64(-5_000_000_000).unwrap();
        w.end_array().unwrap();
        w.name("s").unwrap();
        w.string("a\"b").unwrap();
        w.name("t").unwrap();
        w.bool(false).unwrap();
        w.end_object().unwrap();
        w.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"n":[1,-5000000000],"s":"a\"b","t":false}"#
        );
    }
}
