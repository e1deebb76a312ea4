//! Reflective accessor over a generic, schema-indexed value store.

use std::sync::Arc;

use super::{check_fits, AccessorStrategy};
use crate::error::CodecError;
use crate::schema::{FieldDescriptor, Schema, ValueKind};
use crate::value::{Value, ValueRef};

/// Field value held by a [`DynamicMessage`].
pub type DynamicValue = Value<DynamicMessage>;

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Single(DynamicValue),
    Repeated(Vec<DynamicValue>),
}

/// A message stored as one optional slot per schema field.
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    schema: Arc<Schema>,
    slots: Vec<Option<Slot>>,
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.slots == other.slots
    }
}

impl DynamicMessage {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Whether a field holds a value (repeated fields: at least one element).
    pub fn has(&self, name: &str) -> bool {
        match self.slot_by_name(name) {
            Some(Slot::Single(_)) => true,
            Some(Slot::Repeated(items)) => !items.is_empty(),
            None => false,
        }
    }

    /// Value of a singular field.
    pub fn get(&self, name: &str) -> Option<&DynamicValue> {
        match self.slot_by_name(name) {
            Some(Slot::Single(v)) => Some(v),
            _ => None,
        }
    }

    /// Elements of a repeated field, empty when unset.
    pub fn repeated(&self, name: &str) -> &[DynamicValue] {
        match self.slot_by_name(name) {
            Some(Slot::Repeated(items)) => items,
            _ => &[],
        }
    }

    fn slot_by_name(&self, name: &str) -> Option<&Slot> {
        let field = self.schema.field_by_name(name)?;
        let idx = self.schema.index_of_tag(field.tag())?;
        self.slots[idx].as_ref()
    }

    fn slot(&self, field: &FieldDescriptor) -> Result<Option<&Slot>, CodecError> {
        let idx = index_for(&self.schema, field)?;
        Ok(self.slots[idx].as_ref())
    }
}

/// Staging store for a [`DynamicMessage`].
#[derive(Debug, Clone)]
pub struct DynamicBuilder {
    schema: Arc<Schema>,
    slots: Vec<Option<Slot>>,
}

impl DynamicBuilder {
    pub fn new(schema: Arc<Schema>) -> Self {
        let slots = (0..schema.len()).map(|_| None).collect();
        Self { schema, slots }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Assigns a singular field or appends to a repeated one.
    pub fn set(&mut self, field: &FieldDescriptor, value: DynamicValue) -> Result<(), CodecError> {
        let idx = index_for(&self.schema, field)?;
        check_fits(field, &value)?;
        if let (Value::Message(nested), ValueKind::Message(expected)) = (&value, field.kind()) {
            if nested.schema.name() != expected {
                return Err(CodecError::type_mismatch(
                    field,
                    "message",
                    nested.schema.name().to_owned(),
                ));
            }
        }

        let slot = &mut self.slots[idx];
        if field.is_repeated() {
            match slot {
                Some(Slot::Repeated(items)) => items.push(value),
                other => *other = Some(Slot::Repeated(vec![value])),
            }
        } else {
            *slot = Some(Slot::Single(value));
        }
        Ok(())
    }

    /// [`set`](Self::set) addressed by field name.
    pub fn set_by_name(&mut self, name: &str, value: DynamicValue) -> Result<&mut Self, CodecError> {
        let field = self
            .schema
            .field_by_name(name)
            .cloned()
            .ok_or_else(|| {
                CodecError::Accessor(format!("`{}` has no field `{name}`", self.schema.name()))
            })?;
        self.set(&field, value)?;
        Ok(self)
    }

    pub fn build(self) -> DynamicMessage {
        DynamicMessage {
            schema: self.schema,
            slots: self.slots,
        }
    }
}

fn index_for(schema: &Schema, field: &FieldDescriptor) -> Result<usize, CodecError> {
    schema
        .index_of_tag(field.tag())
        .filter(|&idx| schema.field_at(idx) == Some(field))
        .ok_or_else(|| {
            CodecError::Accessor(format!(
                "field `{}` does not belong to `{}`",
                field.name(),
                schema.name()
            ))
        })
}

/// Strategy backed by [`DynamicMessage`]; needs nothing but the schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectiveStrategy;

impl ReflectiveStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl AccessorStrategy for ReflectiveStrategy {
    type Message = DynamicMessage;
    type Output = DynamicMessage;
    type Builder = DynamicBuilder;

    fn name(&self) -> &'static str {
        "reflective"
    }

    fn type_name<'m>(&self, message: &'m DynamicMessage) -> &'m str {
        message.schema.name()
    }

    fn new_builder(&self, schema: &Arc<Schema>) -> Result<DynamicBuilder, CodecError> {
        Ok(DynamicBuilder::new(Arc::clone(schema)))
    }

    fn get<'m>(
        &self,
        message: &'m DynamicMessage,
        field: &FieldDescriptor,
    ) -> Result<Option<ValueRef<'m, DynamicMessage>>, CodecError> {
        match message.slot(field)? {
            Some(Slot::Single(v)) => Ok(Some(v.as_value_ref())),
            Some(Slot::Repeated(_)) => Err(CodecError::Accessor(format!(
                "field `{}` is repeated",
                field.name()
            ))),
            None => Ok(None),
        }
    }

    fn count(&self, message: &DynamicMessage, field: &FieldDescriptor) -> Result<usize, CodecError> {
        match message.slot(field)? {
            Some(Slot::Repeated(items)) => Ok(items.len()),
            Some(Slot::Single(_)) => Err(CodecError::Accessor(format!(
                "field `{}` is not repeated",
                field.name()
            ))),
            None => Ok(0),
        }
    }

    fn get_index<'m>(
        &self,
        message: &'m DynamicMessage,
        field: &FieldDescriptor,
        index: usize,
    ) -> Result<ValueRef<'m, DynamicMessage>, CodecError> {
        let item = match message.slot(field)? {
            Some(Slot::Repeated(items)) => items.get(index),
            _ => None,
        };
        item.map(|v| v.as_value_ref()).ok_or_else(|| {
            CodecError::Accessor(format!("index {index} out of range for `{}`", field.name()))
        })
    }

    fn set(
        &self,
        builder: &mut DynamicBuilder,
        field: &FieldDescriptor,
        value: Value<DynamicBuilder>,
    ) -> Result<(), CodecError> {
        let value = value.try_map_message(|nested| Ok::<_, CodecError>(nested.build()))?;
        builder.set(field, value)
    }

    fn build(&self, builder: DynamicBuilder) -> Result<DynamicMessage, CodecError> {
        Ok(builder.build())
    }
}
