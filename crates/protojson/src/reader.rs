//! JSON tokens → message.
//!
//! Each object is parsed by a small state machine: after the opening brace the
//! reader alternates between expecting a key (or the closing brace) and
//! expecting that key's value. Anything out of order is `MalformedJson`.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::accessor::AccessorStrategy;
use crate::error::CodecError;
use crate::options::{CodecOptions, UnknownFieldPolicy};
use crate::schema::{FieldDescriptor, Schema, SchemaRegistry, ValueKind};
use crate::token::{Token, TokenSource};
use crate::value::Value;

pub(crate) struct MessageReader<'a, S> {
    pub registry: &'a SchemaRegistry,
    pub strategy: &'a S,
    pub options: &'a CodecOptions,
}

fn next<T: TokenSource + ?Sized>(source: &mut T) -> Result<Token, CodecError> {
    source
        .next_token()?
        .ok_or_else(|| CodecError::malformed("unexpected end of input"))
}

impl<S: AccessorStrategy> MessageReader<'_, S> {
    /// Reads one top-level object.
    pub fn read<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        schema: &Arc<Schema>,
    ) -> Result<S::Output, CodecError> {
        match next(source)? {
            Token::StartObject => self.read_object(source, schema, 1),
            other => Err(CodecError::malformed(format!(
                "expected object for `{}`, found {other}",
                schema.name()
            ))),
        }
    }

    /// Reads a top-level array whose elements are all objects of `schema`.
    pub fn read_list<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        schema: &Arc<Schema>,
    ) -> Result<Vec<S::Output>, CodecError> {
        match next(source)? {
            Token::StartArray => self.check_depth(1)?,
            other => {
                return Err(CodecError::malformed(format!(
                    "expected array of `{}`, found {other}",
                    schema.name()
                )))
            }
        }
        let mut out = Vec::new();
        loop {
            match next(source)? {
                Token::EndArray => return Ok(out),
                Token::StartObject => out.push(self.read_object(source, schema, 2)?),
                other => {
                    return Err(CodecError::malformed(format!(
                        "expected object of `{}` in array, found {other}",
                        schema.name()
                    )))
                }
            }
        }
    }

    /// Body of an object whose opening brace sits at nesting level `depth`.
    fn read_object<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        schema: &Arc<Schema>,
        depth: usize,
    ) -> Result<S::Output, CodecError> {
        self.check_depth(depth)?;
        let builder = self.strategy.new_builder(schema)?;
        let builder = self.read_fields(source, schema, builder, depth)?;
        self.strategy.build(builder)
    }

    fn read_fields<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        schema: &Arc<Schema>,
        mut builder: S::Builder,
        depth: usize,
    ) -> Result<S::Builder, CodecError> {
        tracing::trace!(
            type_name = schema.name(),
            strategy = self.strategy.name(),
            depth,
            "reading message"
        );
        loop {
            let key = match next(source)? {
                Token::EndObject => return Ok(builder),
                Token::Name(key) => key,
                other => {
                    return Err(CodecError::malformed(format!(
                        "expected key or end of object in `{}`, found {other}",
                        schema.name()
                    )))
                }
            };

            let Some(field) = self.options.key_mode.field_for(schema, &key) else {
                if self.options.unknown_fields == UnknownFieldPolicy::Reject {
                    return Err(CodecError::UnknownField {
                        type_name: schema.name().to_owned(),
                        key,
                    });
                }
                tracing::trace!(type_name = schema.name(), key = %key, "skipping unknown key");
                let token = next(source)?;
                self.skip_value(source, token, depth)?;
                continue;
            };

            match next(source)? {
                Token::Null => {}
                token if field.is_repeated() => {
                    self.read_repeated(source, field, token, &mut builder, depth)?
                }
                token => {
                    let value = self.read_value(source, field, token, depth)?;
                    self.strategy.set(&mut builder, field, value)?;
                }
            }
        }
    }

    fn read_repeated<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        field: &FieldDescriptor,
        token: Token,
        builder: &mut S::Builder,
        depth: usize,
    ) -> Result<(), CodecError> {
        match token {
            Token::StartArray => self.check_depth(depth + 1)?,
            t @ (Token::Name(_) | Token::EndObject | Token::EndArray) => {
                return Err(unexpected_in_value(field, &t))
            }
            other => return Err(CodecError::type_mismatch(field, "array", other.to_string())),
        }
        loop {
            match next(source)? {
                Token::EndArray => return Ok(()),
                Token::Null => {
                    return Err(CodecError::type_mismatch(field, field.kind().label(), "null"))
                }
                token => {
                    let value = self.read_value(source, field, token, depth + 1)?;
                    self.strategy.set(builder, field, value)?;
                }
            }
        }
    }

    /// Decodes one non-null value whose first token is `token`. `depth` is the
    /// nesting level of the container holding the value.
    fn read_value<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        field: &FieldDescriptor,
        token: Token,
        depth: usize,
    ) -> Result<Value<S::Builder>, CodecError> {
        match (field.kind(), token) {
            (_, t @ (Token::Name(_) | Token::EndObject | Token::EndArray)) => {
                Err(unexpected_in_value(field, &t))
            }
            (ValueKind::Int32, Token::Number(text)) => {
                parse_integer::<i32>(field, &text).map(Value::Int32)
            }
            (ValueKind::Int64, Token::Number(text)) => {
                parse_integer::<i64>(field, &text).map(Value::Int64)
            }
            (ValueKind::Double, Token::Number(text)) => match text.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Value::Double(v)),
                _ => Err(CodecError::type_mismatch(field, "double", format!("number {text}"))),
            },
            (ValueKind::Float, Token::Number(text)) => match text.parse::<f32>() {
                Ok(v) if v.is_finite() => Ok(Value::Float(v)),
                _ => Err(CodecError::type_mismatch(field, "float", format!("number {text}"))),
            },
            (ValueKind::Bool, Token::Bool(v)) => Ok(Value::Bool(v)),
            (ValueKind::String, Token::String(v)) => Ok(Value::String(v)),
            (ValueKind::Bytes, Token::String(text)) => STANDARD
                .decode(text.as_bytes())
                .map(Value::Bytes)
                .map_err(|err| {
                    CodecError::type_mismatch(field, "base64 string", format!("{text:?} ({err})"))
                }),
            (ValueKind::Enum(enum_name), Token::String(symbol)) => {
                let descriptor = self.registry.enum_descriptor(enum_name)?;
                descriptor
                    .value_of(&symbol)
                    .map(Value::Enum)
                    .ok_or_else(|| CodecError::UnknownEnumValue {
                        enum_name: enum_name.clone(),
                        value: symbol,
                    })
            }
            (ValueKind::Enum(enum_name), Token::Number(text)) => {
                let number = parse_integer::<i32>(field, &text)?;
                let descriptor = self.registry.enum_descriptor(enum_name)?;
                match descriptor.name_of(number) {
                    Some(_) => Ok(Value::Enum(number)),
                    None => Err(CodecError::UnknownEnumValue {
                        enum_name: enum_name.clone(),
                        value: text,
                    }),
                }
            }
            (ValueKind::Message(type_name), Token::StartObject) => {
                self.check_depth(depth + 1)?;
                let schema = self.registry.describe(type_name)?;
                let nested = self.strategy.new_nested_builder(schema, field)?;
                let nested = self.read_fields(source, schema, nested, depth + 1)?;
                Ok(Value::Message(nested))
            }
            (kind, other) => Err(CodecError::type_mismatch(field, kind.label(), other.to_string())),
        }
    }

    /// Consumes the value starting at `token` without interpreting it.
    fn skip_value<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        token: Token,
        depth: usize,
    ) -> Result<(), CodecError> {
        let mut open: Vec<Skipped> = Vec::new();
        let mut token = token;
        loop {
            let expect_name = matches!(open.last(), Some(Skipped::Object { expect_name: true }));
            match token {
                Token::Name(_) if expect_name => {
                    if let Some(Skipped::Object { expect_name }) = open.last_mut() {
                        *expect_name = false;
                    }
                }
                Token::StartObject | Token::StartArray if !expect_name => {
                    open.push(match token {
                        Token::StartObject => Skipped::Object { expect_name: true },
                        _ => Skipped::Array,
                    });
                    self.check_depth(depth + open.len())?;
                }
                Token::EndObject if expect_name => {
                    open.pop();
                    value_done(&mut open);
                }
                Token::EndArray if matches!(open.last(), Some(Skipped::Array)) => {
                    open.pop();
                    value_done(&mut open);
                }
                Token::String(_) | Token::Number(_) | Token::Bool(_) | Token::Null
                    if !expect_name =>
                {
                    value_done(&mut open);
                }
                other => {
                    return Err(CodecError::malformed(format!(
                        "unexpected {other} in skipped value"
                    )))
                }
            }
            if open.is_empty() {
                return Ok(());
            }
            token = next(source)?;
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), CodecError> {
        if depth > self.options.max_depth {
            return Err(CodecError::malformed(format!(
                "nesting exceeds maximum depth of {}",
                self.options.max_depth
            )));
        }
        Ok(())
    }
}

/// An open container inside a skipped value.
enum Skipped {
    Object { expect_name: bool },
    Array,
}

/// A value finished; the enclosing object, if any, wants a key next.
fn value_done(open: &mut [Skipped]) {
    if let Some(Skipped::Object { expect_name }) = open.last_mut() {
        *expect_name = true;
    }
}

fn unexpected_in_value(field: &FieldDescriptor, token: &Token) -> CodecError {
    CodecError::malformed(format!("expected value for `{}`, found {token}", field.name()))
}

fn parse_integer<N: std::str::FromStr>(field: &FieldDescriptor, text: &str) -> Result<N, CodecError> {
    text.parse::<N>().map_err(|_| {
        CodecError::type_mismatch(field, field.kind().label(), format!("number {text}"))
    })
}
