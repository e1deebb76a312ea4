//! In-memory token recorder and replayer.

use std::collections::VecDeque;

use super::{Token, TokenSink, TokenSource};
use crate::error::CodecError;

/// FIFO of tokens: pushing records them, pulling replays them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBuffer {
    tokens: VecDeque<Token>,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    fn push_float(&mut self, text: String, finite: bool) -> Result<(), CodecError> {
        if !finite {
            return Err(CodecError::Serialization(format!(
                "non-finite number {text} cannot be written as JSON"
            )));
        }
        self.push(Token::Number(text));
        Ok(())
    }
}

impl FromIterator<Token> for TokenBuffer {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Token>> for TokenBuffer {
    fn from(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Result<Option<Token>, CodecError> {
        Ok(self.tokens.pop_front())
    }
}

impl TokenSink for TokenBuffer {
    fn start_object(&mut self) -> Result<(), CodecError> {
        self.push(Token::StartObject);
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), CodecError> {
        self.push(Token::EndObject);
        Ok(())
    }

    fn start_array(&mut self) -> Result<(), CodecError> {
        self.push(Token::StartArray);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), CodecError> {
        self.push(Token::EndArray);
        Ok(())
    }

    fn name(&mut self, name: &str) -> Result<(), CodecError> {
        self.push(Token::Name(name.to_owned()));
        Ok(())
    }

    fn string(&mut self, value: &str) -> Result<(), CodecError> {
        self.push(Token::String(value.to_owned()));
        Ok(())
    }

    fn int32(&mut self, value: i32) -> Result<(), CodecError> {
        self.push(Token::Number(value.to_string()));
        Ok(())
    }

    fn int64(&mut self, value: i64) -> Result<(), CodecError> {
        self.push(Token::Number(value.to_string()));
        Ok(())
    }

    fn float(&mut self, value: f32) -> Result<(), CodecError> {
        self.push_float(value.to_string(), value.is_finite())
    }

    fn double(&mut self, value: f64) -> Result<(), CodecError> {
        self.push_float(value.to_string(), value.is_finite())
    }

    fn bool(&mut self, value: bool) -> Result<(), CodecError> {
        self.push(Token::Bool(value));
        Ok(())
    }
}
