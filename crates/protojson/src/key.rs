//! JSON object key resolution.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldDescriptor, Schema};

/// How fields are keyed in JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// `{"firstName": ...}`
    #[default]
    Name,
    /// `{"2": ...}`
    Numeric,
}

impl KeyMode {
    /// JSON key for a field.
    pub fn key_for(self, field: &FieldDescriptor) -> Cow<'_, str> {
        match self {
            Self::Name => Cow::Borrowed(field.name()),
            Self::Numeric => Cow::Owned(field.tag().to_string()),
        }
    }

    /// Inverse of [`key_for`](Self::key_for); `None` marks an unknown key.
    pub fn field_for<'s>(self, schema: &'s Schema, key: &str) -> Option<&'s FieldDescriptor> {
        match self {
            Self::Name => schema.field_by_name(key),
            Self::Numeric => parse_tag(key).and_then(|tag| schema.field_by_tag(tag)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Numeric => "numeric",
        }
    }
}

// Digits only: `str::parse` would also take a leading `+`.
fn parse_tag(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}
