//! Registry of message schemas and enum descriptors.
//!
//! The registry is built once, validated, and then shared read-only (usually
//! behind an `Arc`) by every codec that references its types.

use std::collections::HashMap;
use std::sync::Arc;

use super::enums::EnumDescriptor;
use super::field::ValueKind;
use super::message::Schema;
use crate::error::SchemaError;

/// Validated set of schemas, keyed by type name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    messages: HashMap<String, Arc<Schema>>,
    enums: HashMap<String, Arc<EnumDescriptor>>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Schema for a message type.
    pub fn describe(&self, type_name: &str) -> Result<&Arc<Schema>, SchemaError> {
        self.messages
            .get(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_owned()))
    }

    pub fn enum_descriptor(&self, enum_name: &str) -> Result<&Arc<EnumDescriptor>, SchemaError> {
        self.enums
            .get(enum_name)
            .ok_or_else(|| SchemaError::UnknownEnum(enum_name.to_owned()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.messages.contains_key(type_name)
    }

    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

/// Collects schemas and enums before validation.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    messages: Vec<Schema>,
    enums: Vec<EnumDescriptor>,
}

impl RegistryBuilder {
    pub fn message(mut self, schema: Schema) -> Self {
        self.messages.push(schema);
        self
    }

    pub fn enumeration(mut self, descriptor: EnumDescriptor) -> Self {
        self.enums.push(descriptor);
        self
    }

    /// Validates every cross-type reference and freezes the registry.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut registry = SchemaRegistry::default();

        for descriptor in self.enums {
            let name = descriptor.name().to_owned();
            if registry.enums.contains_key(&name) {
                return Err(SchemaError::DuplicateType(name));
            }
            registry.enums.insert(name, Arc::new(descriptor));
        }
        for schema in self.messages {
            let name = schema.name().to_owned();
            if registry.messages.contains_key(&name) || registry.enums.contains_key(&name) {
                return Err(SchemaError::DuplicateType(name));
            }
            registry.messages.insert(name, Arc::new(schema));
        }

        for schema in registry.messages.values() {
            for field in schema.fields() {
                let resolved = match field.kind() {
                    ValueKind::Message(target) => registry.messages.contains_key(target),
                    ValueKind::Enum(target) => registry.enums.contains_key(target),
                    _ => true,
                };
                if !resolved {
                    return Err(SchemaError::UnresolvedReference {
                        type_name: schema.name().to_owned(),
                        field: field.name().to_owned(),
                        target: field.kind().type_ref().unwrap_or_default().to_owned(),
                    });
                }
            }
        }

        tracing::debug!(
            messages = registry.messages.len(),
            enums = registry.enums.len(),
            "schema registry built"
        );
        Ok(registry)
    }
}
