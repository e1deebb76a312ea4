//! Schema-driven JSON codec for structured messages.
//!
//! A [`SchemaRegistry`] describes message types; a [`JsonCodec`] walks
//! messages against those schemas through an
//! [`AccessorStrategy`](accessor::AccessorStrategy), either compiled glue or
//! reflective access over [`DynamicMessage`](accessor::DynamicMessage).
//! JSON keys are field names or tag numbers depending on [`KeyMode`].

mod reader;
mod writer;

pub mod accessor;
pub mod codec;
pub mod error;
pub mod key;
pub mod options;
pub mod schema;
pub mod token;
pub mod value;

pub use accessor::{AccessorStrategy, CompiledStrategy, ReflectiveStrategy};
pub use codec::JsonCodec;
pub use error::{CodecError, SchemaError};
pub use key::KeyMode;
pub use options::{CodecOptions, UnknownFieldPolicy};
pub use schema::{EnumDescriptor, FieldDescriptor, Schema, SchemaRegistry, ValueKind};
pub use value::{Value, ValueRef};
