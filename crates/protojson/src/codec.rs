//! The public codec facade.

use std::io;
use std::sync::Arc;

use crate::accessor::AccessorStrategy;
use crate::error::CodecError;
use crate::key::KeyMode;
use crate::options::CodecOptions;
use crate::reader::MessageReader;
use crate::schema::SchemaRegistry;
use crate::token::{JsonTokenReader, JsonTokenWriter, TokenSink, TokenSource};
use crate::writer::MessageWriter;

/// Converts messages to and from JSON.
///
/// The accessor strategy and the options are chosen at construction and fixed
/// for the codec's lifetime. A codec holds no per-call state, so one instance
/// can serve any number of threads.
///
/// ```
/// use std::sync::Arc;
/// use protojson::accessor::{DynamicBuilder, ReflectiveStrategy};
/// use protojson::{CodecOptions, JsonCodec, Schema, SchemaRegistry, Value, ValueKind};
///
/// let registry = SchemaRegistry::builder()
///     .message(
///         Schema::builder("Point")
///             .field(1, "x", ValueKind::Int32)
///             .field(2, "y", ValueKind::Int32)
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
/// let registry = Arc::new(registry);
/// let codec = JsonCodec::new(Arc::clone(&registry), ReflectiveStrategy, CodecOptions::default());
///
/// let mut point = DynamicBuilder::new(Arc::clone(registry.describe("Point").unwrap()));
/// point.set_by_name("x", Value::Int32(3)).unwrap();
/// let json = codec.to_json_string(&point.build()).unwrap();
/// assert_eq!(json, r#"{"x":3}"#);
///
/// let back = codec.from_json_str(&json, "Point").unwrap();
/// assert_eq!(back.get("x"), Some(&Value::Int32(3)));
/// ```
#[derive(Debug, Clone)]
pub struct JsonCodec<S> {
    registry: Arc<SchemaRegistry>,
    strategy: S,
    options: CodecOptions,
}

impl<S: AccessorStrategy> JsonCodec<S> {
    pub fn new(registry: Arc<SchemaRegistry>, strategy: S, options: CodecOptions) -> Self {
        tracing::debug!(
            strategy = strategy.name(),
            key_mode = options.key_mode.as_str(),
            types = registry.message_names().count(),
            "json codec created"
        );
        Self {
            registry,
            strategy,
            options,
        }
    }

    pub fn key_mode(&self) -> KeyMode {
        self.options.key_mode
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    fn writer(&self) -> MessageWriter<'_, S> {
        MessageWriter {
            registry: &self.registry,
            strategy: &self.strategy,
            key_mode: self.options.key_mode,
        }
    }

    fn reader(&self) -> MessageReader<'_, S> {
        MessageReader {
            registry: &self.registry,
            strategy: &self.strategy,
            options: &self.options,
        }
    }

    /// Pushes `message` as one JSON object into `sink`.
    pub fn write_to<K: TokenSink + ?Sized>(
        &self,
        sink: &mut K,
        message: &S::Message,
    ) -> Result<(), CodecError> {
        let schema = self.registry.describe(self.strategy.type_name(message))?;
        self.writer().write(message, schema, sink)
    }

    /// Writes `message` as compact JSON text.
    pub fn write_message<W: io::Write>(&self, out: W, message: &S::Message) -> Result<(), CodecError> {
        let mut sink = JsonTokenWriter::from_writer(out);
        self.write_to(&mut sink, message)?;
        sink.finish()
    }

    pub fn to_json_string(&self, message: &S::Message) -> Result<String, CodecError> {
        let mut out = Vec::new();
        self.write_message(&mut out, message)?;
        String::from_utf8(out).map_err(|err| CodecError::Serialization(err.to_string()))
    }

    /// Writes a JSON array holding one object per message.
    pub fn write_messages<'m, W, I>(&self, out: W, messages: I) -> Result<(), CodecError>
    where
        W: io::Write,
        I: IntoIterator<Item = &'m S::Message>,
        S::Message: 'm,
    {
        let mut sink = JsonTokenWriter::from_writer(out);
        sink.start_array()?;
        for message in messages {
            self.write_to(&mut sink, message)?;
        }
        sink.end_array()?;
        sink.finish()
    }

    /// Pulls one JSON object of `type_name` from `source`.
    pub fn read_from<T: TokenSource + ?Sized>(
        &self,
        source: &mut T,
        type_name: &str,
    ) -> Result<S::Output, CodecError> {
        let schema = self.registry.describe(type_name)?;
        self.reader().read(source, schema)
    }

    /// Parses one JSON document holding a `type_name` object. Only whitespace
    /// may follow the object.
    pub fn read_message<R: io::Read>(&self, input: R, type_name: &str) -> Result<S::Output, CodecError> {
        let mut source = JsonTokenReader::from_reader(input);
        let message = self.read_from(&mut source, type_name)?;
        source.finish()?;
        Ok(message)
    }

    pub fn from_json_str(&self, text: &str, type_name: &str) -> Result<S::Output, CodecError> {
        self.read_message(text.as_bytes(), type_name)
    }

    /// Parses a JSON array of `type_name` objects.
    pub fn read_messages<R: io::Read>(
        &self,
        input: R,
        type_name: &str,
    ) -> Result<Vec<S::Output>, CodecError> {
        let schema = self.registry.describe(type_name)?;
        let mut source = JsonTokenReader::from_reader(input);
        let messages = self.reader().read_list(&mut source, schema)?;
        source.finish()?;
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{DynamicBuilder, DynamicMessage, ReflectiveStrategy};
    use crate::error::SchemaError;
    use crate::schema::{Schema, ValueKind};
    use crate::token::TokenBuffer;
    use crate::value::Value;

    fn codec(options: CodecOptions) -> JsonCodec<ReflectiveStrategy> {
        let registry = SchemaRegistry::builder()
            .message(
                Schema::builder("Item")
                    .field(1, "label", ValueKind::String)
                    .field(2, "score", ValueKind::Double)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        JsonCodec::new(Arc::new(registry), ReflectiveStrategy, options)
    }

    fn item(codec: &JsonCodec<ReflectiveStrategy>, label: &str) -> DynamicMessage {
        let schema = codec.registry().describe("Item").unwrap();
        let mut b = DynamicBuilder::new(Arc::clone(schema));
        b.set_by_name("label", Value::String(label.into())).unwrap();
        b.build()
    }

    #[test]
    fn text_round_trip() {
        let codec = codec(CodecOptions::default());
        let original = item(&codec, "a\u{e9}\"");
        let json = codec.to_json_string(&original).unwrap();
        assert_eq!(json, r#"{"label":"aé\""}"#);
        assert_eq!(codec.from_json_str(&json, "Item").unwrap(), original);
    }

    #[test]
    fn trailing_content_is_malformed() {
        let codec = codec(CodecOptions::default());
        assert!(codec.from_json_str("{} \n", "Item").is_ok());
        let err = codec.from_json_str("{} {}", "Item").unwrap_err();
        assert!(matches!(err, CodecError::MalformedJson(_)));
    }

    #[test]
    fn unknown_type_is_schema_error() {
        let codec = codec(CodecOptions::default());
        let err = codec.from_json_str("{}", "Nope").unwrap_err();
        assert!(matches!(err, CodecError::Schema(SchemaError::UnknownType(ref t)) if t == "Nope"));
    }

    #[test]
    fn list_round_trip() {
        let codec = codec(CodecOptions::default().with_key_mode(KeyMode::Numeric));
        let items = [item(&codec, "x"), item(&codec, "y")];
        let mut out = Vec::new();
        codec.write_messages(&mut out, &items).unwrap();
        assert_eq!(String::from_utf8(out.clone()).unwrap(), r#"[{"1":"x"},{"1":"y"}]"#);
        let back = codec.read_messages(out.as_slice(), "Item").unwrap();
        assert_eq!(back, items);
        assert!(codec.read_messages("[]".as_bytes(), "Item").unwrap().is_empty());
    }

    #[test]
    fn list_of_non_objects_is_malformed() {
        let codec = codec(CodecOptions::default());
        let err = codec.read_messages("[1]".as_bytes(), "Item").unwrap_err();
        assert!(matches!(err, CodecError::MalformedJson(_)));
    }

    #[test]
    fn write_to_token_sink() {
        let codec = codec(CodecOptions::default());
        let mut sink = TokenBuffer::new();
        codec.write_to(&mut sink, &item(&codec, "z")).unwrap();
        let back = codec.read_from(&mut sink, "Item").unwrap();
        assert_eq!(back.get("label"), Some(&Value::String("z".into())));
        assert!(sink.is_empty());
    }

    #[test]
    fn accessors_reflect_construction() {
        let codec = codec(CodecOptions::default().with_key_mode(KeyMode::Numeric));
        assert_eq!(codec.key_mode(), KeyMode::Numeric);
        assert_eq!(codec.strategy().name(), "reflective");
        assert!(codec.registry().contains("Item"));
        assert_eq!(codec.options().max_depth, 64);
    }
}
