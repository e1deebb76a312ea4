//! Accessor strategies: the get/set capability the writer and reader use to
//! reach into messages and builders.
//!
//! Two implementations ship with the crate:
//! - [`CompiledStrategy`] dispatches to hand-written or generated glue bound
//!   once per message type.
//! - [`ReflectiveStrategy`] drives a generic field-indexed store purely from
//!   the [`Schema`].
//!
//! The codec is generic over the strategy and never inspects which one it
//! was given.

mod compiled;
mod reflective;

pub use compiled::{
    downcast_message, AsAny, CompiledStrategy, CompiledStrategyBuilder, GeneratedBuilder,
    GeneratedMessage, GeneratedType,
};
pub use reflective::{DynamicBuilder, DynamicMessage, DynamicValue, ReflectiveStrategy};

use std::borrow::Borrow;
use std::sync::Arc;

use crate::error::CodecError;
use crate::schema::{FieldDescriptor, Schema};
use crate::value::{Value, ValueRef};

/// Get/set capability over one message representation.
pub trait AccessorStrategy: Send + Sync {
    /// Borrowed view of a finalized message.
    type Message: ?Sized;
    /// What [`build`](Self::build) hands back.
    type Output: Borrow<Self::Message>;
    /// Mutable staging value for one message.
    type Builder;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Type name of the schema `message` conforms to.
    fn type_name<'m>(&self, message: &'m Self::Message) -> &'m str;

    fn new_builder(&self, schema: &Arc<Schema>) -> Result<Self::Builder, CodecError>;

    /// Builder for the message held by `field` of an enclosing message.
    fn new_nested_builder(
        &self,
        schema: &Arc<Schema>,
        _field: &FieldDescriptor,
    ) -> Result<Self::Builder, CodecError> {
        self.new_builder(schema)
    }

    /// Current value of a singular field, `None` when unset.
    fn get<'m>(
        &self,
        message: &'m Self::Message,
        field: &FieldDescriptor,
    ) -> Result<Option<ValueRef<'m, Self::Message>>, CodecError>;

    /// Number of elements in a repeated field.
    fn count(&self, message: &Self::Message, field: &FieldDescriptor) -> Result<usize, CodecError>;

    /// Element `index` of a repeated field.
    fn get_index<'m>(
        &self,
        message: &'m Self::Message,
        field: &FieldDescriptor,
        index: usize,
    ) -> Result<ValueRef<'m, Self::Message>, CodecError>;

    /// Assigns a singular field or appends to a repeated one. Nested messages
    /// arrive as builders and are finalized by the strategy.
    fn set(
        &self,
        builder: &mut Self::Builder,
        field: &FieldDescriptor,
        value: Value<Self::Builder>,
    ) -> Result<(), CodecError>;

    /// Consumes the builder.
    fn build(&self, builder: Self::Builder) -> Result<Self::Output, CodecError>;
}

pub(crate) fn check_fits<M>(field: &FieldDescriptor, value: &Value<M>) -> Result<(), CodecError> {
    if value.fits(field.kind()) {
        Ok(())
    } else {
        Err(CodecError::type_mismatch(field, field.kind().label(), value.label()))
    }
}
