//! Message schemas.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::field::{FieldDescriptor, ValueKind};
use crate::error::SchemaError;

/// Immutable description of one message type.
///
/// Fields are kept in descriptor order, which is the order the writer emits
/// them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: IndexMap<u32, FieldDescriptor>,
    by_name: HashMap<String, u32>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builds a schema from a list of descriptors.
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut by_tag = IndexMap::new();
        let mut by_name = HashMap::new();
        for field in fields {
            if field.tag() == 0 {
                return Err(SchemaError::InvalidTag {
                    type_name: name,
                    field: field.name().to_owned(),
                });
            }
            if by_tag.contains_key(&field.tag()) {
                return Err(SchemaError::DuplicateTag {
                    type_name: name,
                    tag: field.tag(),
                });
            }
            if by_name.contains_key(field.name()) {
                return Err(SchemaError::DuplicateField {
                    type_name: name,
                    field: field.name().to_owned(),
                });
            }
            by_name.insert(field.name().to_owned(), field.tag());
            by_tag.insert(field.tag(), field);
        }
        Ok(Self {
            name,
            fields: by_tag,
            by_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in canonical write order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_by_tag(&self, tag: u32) -> Option<&FieldDescriptor> {
        self.fields.get(&tag)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).and_then(|tag| self.fields.get(tag))
    }

    /// Position of a field in descriptor order.
    pub fn index_of_tag(&self, tag: u32) -> Option<usize> {
        self.fields.get_index_of(&tag)
    }

    pub fn field_at(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get_index(index).map(|(_, f)| f)
    }
}

/// Incremental [`Schema`] construction.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn field(mut self, tag: u32, name: impl Into<String>, kind: ValueKind) -> Self {
        self.fields.push(FieldDescriptor::new(tag, name, kind));
        self
    }

    pub fn repeated(mut self, tag: u32, name: impl Into<String>, kind: ValueKind) -> Self {
        self.fields.push(FieldDescriptor::repeated(tag, name, kind));
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::new(self.name, self.fields)
    }
}
