//! Compiled accessor: dispatches to per-type glue bound once at registration.
//!
//! Generated (or hand-written) message types implement [`GeneratedMessage`]
//! for reads and pair with a [`GeneratedBuilder`] for writes. Binding a type
//! with [`CompiledStrategyBuilder::bind`] records its builder factory under
//! the schema name, so no per-call lookup goes beyond one map probe.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{check_fits, AccessorStrategy};
use crate::error::{CodecError, SchemaError};
use crate::schema::{FieldDescriptor, Schema, SchemaRegistry, ValueKind};
use crate::value::{Value, ValueRef};

/// Type-erasure helpers, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Read side of a compiled message type. Fields are addressed by tag.
pub trait GeneratedMessage: AsAny + fmt::Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Singular field value, `None` when unset.
    fn field(&self, tag: u32) -> Option<ValueRef<'_, dyn GeneratedMessage>>;

    fn repeated_len(&self, tag: u32) -> usize;

    fn repeated_at(&self, tag: u32, index: usize) -> Option<ValueRef<'_, dyn GeneratedMessage>>;
}

/// Write side of a compiled message type.
pub trait GeneratedBuilder: Send {
    /// Assigns a singular field or appends to a repeated one.
    fn set_field(
        &mut self,
        tag: u32,
        value: Value<Box<dyn GeneratedMessage>>,
    ) -> Result<(), CodecError>;

    fn build(self: Box<Self>) -> Box<dyn GeneratedMessage>;
}

/// Static binding between a compiled type, its schema name and its builder.
pub trait GeneratedType: GeneratedMessage + Sized {
    const TYPE_NAME: &'static str;
    type Builder: GeneratedBuilder + Default + 'static;
}

/// Recovers the concrete type of a finalized compiled message.
pub fn downcast_message<T: GeneratedMessage>(
    message: Box<dyn GeneratedMessage>,
) -> Result<T, CodecError> {
    let found = message.type_name();
    <dyn GeneratedMessage as AsAny>::into_any(message)
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| {
            CodecError::Accessor(format!(
                "expected {}, found message `{found}`",
                std::any::type_name::<T>()
            ))
        })
}

type BuilderFactory = fn() -> Box<dyn GeneratedBuilder>;

fn factory<T: GeneratedType>() -> Box<dyn GeneratedBuilder> {
    Box::new(T::Builder::default())
}

/// Strategy over compiled message types.
#[derive(Clone)]
pub struct CompiledStrategy {
    bindings: Arc<HashMap<&'static str, BuilderFactory>>,
}

impl fmt::Debug for CompiledStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.bindings.keys().collect();
        names.sort();
        f.debug_struct("CompiledStrategy")
            .field("bindings", &names)
            .finish()
    }
}

impl CompiledStrategy {
    pub fn builder() -> CompiledStrategyBuilder {
        CompiledStrategyBuilder::default()
    }

    pub fn is_bound(&self, type_name: &str) -> bool {
        self.bindings.contains_key(type_name)
    }
}

#[derive(Default)]
pub struct CompiledStrategyBuilder {
    bindings: Vec<(&'static str, BuilderFactory)>,
}

impl CompiledStrategyBuilder {
    pub fn bind<T: GeneratedType>(mut self) -> Self {
        self.bindings.push((T::TYPE_NAME, factory::<T>));
        self
    }

    /// Checks every binding against the registry. Each bound type must be
    /// registered, and every message type it embeds must be bound too.
    pub fn build(self, registry: &SchemaRegistry) -> Result<CompiledStrategy, SchemaError> {
        let mut bindings = HashMap::with_capacity(self.bindings.len());
        for (name, factory) in self.bindings {
            registry.describe(name)?;
            if bindings.insert(name, factory).is_some() {
                return Err(SchemaError::DuplicateType(name.to_owned()));
            }
        }
        for name in bindings.keys() {
            for field in registry.describe(name)?.fields() {
                if let ValueKind::Message(target) = field.kind() {
                    if !bindings.contains_key(target.as_str()) {
                        return Err(SchemaError::Unbound(target.clone()));
                    }
                }
            }
        }
        tracing::debug!(bound = bindings.len(), "compiled strategy built");
        Ok(CompiledStrategy {
            bindings: Arc::new(bindings),
        })
    }
}

impl AccessorStrategy for CompiledStrategy {
    type Message = dyn GeneratedMessage;
    type Output = Box<dyn GeneratedMessage>;
    type Builder = Box<dyn GeneratedBuilder>;

    fn name(&self) -> &'static str {
        "compiled"
    }

    fn type_name<'m>(&self, message: &'m dyn GeneratedMessage) -> &'m str {
        message.type_name()
    }

    fn new_builder(&self, schema: &Arc<Schema>) -> Result<Self::Builder, CodecError> {
        let factory = self
            .bindings
            .get(schema.name())
            .ok_or_else(|| SchemaError::Unbound(schema.name().to_owned()))?;
        Ok(factory())
    }

    fn get<'m>(
        &self,
        message: &'m dyn GeneratedMessage,
        field: &FieldDescriptor,
    ) -> Result<Option<ValueRef<'m, dyn GeneratedMessage>>, CodecError> {
        if field.is_repeated() {
            return Err(CodecError::Accessor(format!(
                "field `{}` is repeated",
                field.name()
            )));
        }
        Ok(message.field(field.tag()))
    }

    fn count(&self, message: &dyn GeneratedMessage, field: &FieldDescriptor) -> Result<usize, CodecError> {
        Ok(message.repeated_len(field.tag()))
    }

    fn get_index<'m>(
        &self,
        message: &'m dyn GeneratedMessage,
        field: &FieldDescriptor,
        index: usize,
    ) -> Result<ValueRef<'m, dyn GeneratedMessage>, CodecError> {
        message.repeated_at(field.tag(), index).ok_or_else(|| {
            CodecError::Accessor(format!(
                "index {index} out of range for `{}.{}`",
                message.type_name(),
                field.name()
            ))
        })
    }

    fn set(
        &self,
        builder: &mut Self::Builder,
        field: &FieldDescriptor,
        value: Value<Self::Builder>,
    ) -> Result<(), CodecError> {
        check_fits(field, &value)?;
        let value = value.try_map_message(|nested| Ok::<_, CodecError>(nested.build()))?;
        builder.set_field(field.tag(), value)
    }

    fn build(&self, builder: Self::Builder) -> Result<Self::Output, CodecError> {
        Ok(builder.build())
    }
}
