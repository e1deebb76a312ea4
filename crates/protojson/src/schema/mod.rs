//! Schema model: message schemas, field descriptors, enums, and the registry
//! that resolves type references between them.

mod enums;
mod field;
mod message;
mod registry;

pub use enums::EnumDescriptor;
pub use field::{FieldDescriptor, ValueKind};
pub use message::{Schema, SchemaBuilder};
pub use registry::{RegistryBuilder, SchemaRegistry};
