//! Error types shared by the schema model, accessors, and the JSON codec.

use thiserror::Error;

/// Failures while building or querying the schema model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown message type `{0}`")]
    UnknownType(String),
    #[error("unknown enum type `{0}`")]
    UnknownEnum(String),
    #[error("field `{field}` of `{type_name}` references unregistered type `{target}`")]
    UnresolvedReference {
        type_name: String,
        field: String,
        target: String,
    },
    #[error("duplicate tag {tag} in `{type_name}`")]
    DuplicateTag { type_name: String, tag: u32 },
    #[error("duplicate field name `{field}` in `{type_name}`")]
    DuplicateField { type_name: String, field: String },
    #[error("type `{0}` is registered twice")]
    DuplicateType(String),
    #[error("field `{field}` of `{type_name}` has invalid tag 0")]
    InvalidTag { type_name: String, field: String },
    #[error("duplicate symbol `{symbol}` in enum `{enum_name}`")]
    DuplicateEnumSymbol { enum_name: String, symbol: String },
    #[error("duplicate number {number} in enum `{enum_name}`")]
    DuplicateEnumNumber { enum_name: String, number: i32 },
    #[error("no compiled binding for message type `{0}`")]
    Unbound(String),
}

/// Failures of a single encode or decode call.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("malformed JSON: {0}")]
    MalformedJson(String),
    #[error("type mismatch for field `{field}` (tag {tag}): expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        tag: u32,
        expected: &'static str,
        found: String,
    },
    #[error("unknown value `{value}` for enum `{enum_name}`")]
    UnknownEnumValue { enum_name: String, value: String },
    #[error("unknown key `{key}` for message `{type_name}`")]
    UnknownField { type_name: String, key: String },
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("accessor error: {0}")]
    Accessor(String),
}

impl CodecError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedJson(msg.into())
    }

    pub fn type_mismatch(
        field: &crate::schema::FieldDescriptor,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.name().to_owned(),
            tag: field.tag(),
            expected,
            found: found.into(),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
