//! Field descriptors and value kinds.

use std::fmt;

/// The closed set of kinds a field value can take.
///
/// `Enum` and `Message` name a type registered in the
/// [`SchemaRegistry`](super::SchemaRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int32,
    Int64,
    Bool,
    String,
    Bytes,
    Double,
    Float,
    Enum(String),
    Message(String),
}

impl ValueKind {
    /// Short label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Double => "double",
            Self::Float => "float",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
        }
    }

    /// Name of the referenced enum or message type, if any.
    pub fn type_ref(&self) -> Option<&str> {
        match self {
            Self::Enum(name) | Self::Message(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_ref() {
            Some(name) => write!(f, "{}<{}>", self.label(), name),
            None => f.write_str(self.label()),
        }
    }
}

/// One field of a message schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    tag: u32,
    name: String,
    kind: ValueKind,
    repeated: bool,
}

impl FieldDescriptor {
    pub fn new(tag: u32, name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            tag,
            name: name.into(),
            kind,
            repeated: false,
        }
    }

    pub fn repeated(tag: u32, name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            repeated: true,
            ..Self::new(tag, name, kind)
        }
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeated {
            write!(f, "{} = {}: repeated {}", self.name, self.tag, self.kind)
        } else {
            write!(f, "{} = {}: {}", self.name, self.tag, self.kind)
        }
    }
}
