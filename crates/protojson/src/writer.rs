//! Message → JSON tokens.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::accessor::AccessorStrategy;
use crate::error::CodecError;
use crate::key::KeyMode;
use crate::schema::{FieldDescriptor, Schema, SchemaRegistry, ValueKind};
use crate::token::TokenSink;
use crate::value::ValueRef;

/// Depth-first message walker. Holds no state between calls.
pub(crate) struct MessageWriter<'a, S> {
    pub registry: &'a SchemaRegistry,
    pub strategy: &'a S,
    pub key_mode: KeyMode,
}

impl<S: AccessorStrategy> MessageWriter<'_, S> {
    pub fn write<K: TokenSink + ?Sized>(
        &self,
        message: &S::Message,
        schema: &Schema,
        sink: &mut K,
    ) -> Result<(), CodecError> {
        tracing::trace!(
            type_name = schema.name(),
            strategy = self.strategy.name(),
            "writing message"
        );
        sink.start_object()?;
        for field in schema.fields() {
            if field.is_repeated() {
                let count = self.strategy.count(message, field)?;
                if count == 0 {
                    continue;
                }
                sink.name(&self.key_mode.key_for(field))?;
                sink.start_array()?;
                for index in 0..count {
                    let value = self.strategy.get_index(message, field, index)?;
                    self.write_value(field, value, sink)?;
                }
                sink.end_array()?;
            } else if let Some(value) = self.strategy.get(message, field)? {
                sink.name(&self.key_mode.key_for(field))?;
                self.write_value(field, value, sink)?;
            }
        }
        sink.end_object()
    }

    fn write_value<K: TokenSink + ?Sized>(
        &self,
        field: &FieldDescriptor,
        value: ValueRef<'_, S::Message>,
        sink: &mut K,
    ) -> Result<(), CodecError> {
        if !value.fits(field.kind()) {
            return Err(CodecError::type_mismatch(
                field,
                field.kind().label(),
                value.label(),
            ));
        }
        match (value, field.kind()) {
            (ValueRef::Int32(v), _) => sink.int32(v),
            (ValueRef::Int64(v), _) => sink.int64(v),
            (ValueRef::Bool(v), _) => sink.bool(v),
            (ValueRef::String(v), _) => sink.string(v),
            (ValueRef::Bytes(v), _) => sink.string(&STANDARD.encode(v)),
            (ValueRef::Double(v), _) => sink.double(v),
            (ValueRef::Float(v), _) => sink.float(v),
            (ValueRef::Enum(number), ValueKind::Enum(enum_name)) => {
                let descriptor = self.registry.enum_descriptor(enum_name)?;
                let symbol = descriptor.name_of(number).ok_or_else(|| {
                    CodecError::UnknownEnumValue {
                        enum_name: enum_name.clone(),
                        value: number.to_string(),
                    }
                })?;
                sink.string(symbol)
            }
            (ValueRef::Message(nested), ValueKind::Message(type_name)) => {
                let schema = self.registry.describe(type_name)?;
                self.write(nested, schema, sink)
            }
            (value, kind) => Err(CodecError::type_mismatch(field, kind.label(), value.label())),
        }
    }
}
