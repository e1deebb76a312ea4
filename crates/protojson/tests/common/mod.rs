#![allow(dead_code)]

mod model;

pub use model::*;

use std::sync::{Arc, OnceLock};

use protojson::accessor::{
    DynamicBuilder, DynamicMessage, DynamicValue, GeneratedMessage,
};
use protojson::{
    CodecOptions, CompiledStrategy, EnumDescriptor, JsonCodec, KeyMode, ReflectiveStrategy,
    Schema, SchemaError, SchemaRegistry, Value, ValueKind, ValueRef,
};

fn build_registry() -> Result<SchemaRegistry, SchemaError> {
    let status = EnumDescriptor::new(
        "Status",
        [("PENDING", 0), ("STARTED", 1), ("COMPLETED", 2)],
    )?;
    let task = Schema::builder("Task")
        .field(1, "id", ValueKind::Int32)
        .field(2, "name", ValueKind::String)
        .field(3, "description", ValueKind::String)
        .field(4, "status", ValueKind::Enum("Status".into()))
        .build()?;
    let person = Schema::builder("Person")
        .field(1, "id", ValueKind::Int32)
        .field(2, "firstName", ValueKind::String)
        .field(3, "lastName", ValueKind::String)
        .field(4, "age", ValueKind::Int32)
        .field(5, "email", ValueKind::String)
        .field(6, "currentTask", ValueKind::Message("Task".into()))
        .repeated(7, "delegatedTask", ValueKind::Message("Task".into()))
        .repeated(8, "priorityTask", ValueKind::Message("Task".into()))
        .repeated(9, "repeatedLong", ValueKind::Int64)
        .field(10, "active", ValueKind::Bool)
        .field(11, "rating", ValueKind::Double)
        .field(12, "score", ValueKind::Float)
        .field(13, "avatar", ValueKind::Bytes)
        .build()?;
    SchemaRegistry::builder()
        .enumeration(status)
        .message(task)
        .message(person)
        .build()
}

pub fn registry() -> Arc<SchemaRegistry> {
    static REGISTRY: OnceLock<Arc<SchemaRegistry>> = OnceLock::new();
    Arc::clone(REGISTRY.get_or_init(|| {
        Arc::new(build_registry().expect("fixture schemas are valid"))
    }))
}

pub fn compiled_strategy() -> CompiledStrategy {
    CompiledStrategy::builder()
        .bind::<Person>()
        .bind::<Task>()
        .build(&registry())
        .expect("fixture bindings are complete")
}

pub fn compiled_codec(key_mode: KeyMode) -> JsonCodec<CompiledStrategy> {
    JsonCodec::new(
        registry(),
        compiled_strategy(),
        CodecOptions::default().with_key_mode(key_mode),
    )
}

pub fn reflective_codec(key_mode: KeyMode) -> JsonCodec<ReflectiveStrategy> {
    JsonCodec::new(
        registry(),
        ReflectiveStrategy,
        CodecOptions::default().with_key_mode(key_mode),
    )
}

pub fn task(id: i32, name: &str, description: &str, status: Status) -> Task {
    Task {
        id: Some(id),
        name: Some(name.to_owned()),
        description: Some(description.to_owned()),
        status: Some(status),
    }
}

/// The reference person: two identical priority tasks, no delegated tasks.
pub fn sample_person() -> Person {
    let task = task(1, "task_name", "task_description", Status::Completed);
    Person {
        id: Some(1),
        first_name: Some("john".into()),
        last_name: Some("doe".into()),
        age: Some(2),
        email: Some("john_doe@email.com".into()),
        current_task: Some(task.clone()),
        priority_task: vec![task.clone(), task],
        repeated_long: vec![3, 4, 5],
        ..Person::default()
    }
}

/// Copies a compiled message into the reflective representation field by
/// field, without going through JSON.
pub fn to_dynamic(message: &dyn GeneratedMessage) -> DynamicMessage {
    let registry = registry();
    let schema = registry
        .describe(message.type_name())
        .expect("registered type");
    let mut builder = DynamicBuilder::new(Arc::clone(schema));
    for field in schema.fields() {
        let values: Vec<_> = if field.is_repeated() {
            (0..message.repeated_len(field.tag()))
                .filter_map(|i| message.repeated_at(field.tag(), i))
                .collect()
        } else {
            message.field(field.tag()).into_iter().collect()
        };
        for value in values {
            builder
                .set(field, dynamic_value(value))
                .expect("compiled value fits its field");
        }
    }
    builder.build()
}

fn dynamic_value(value: ValueRef<'_, dyn GeneratedMessage>) -> DynamicValue {
    match value {
        ValueRef::Int32(v) => Value::Int32(v),
        ValueRef::Int64(v) => Value::Int64(v),
        ValueRef::Bool(v) => Value::Bool(v),
        ValueRef::String(v) => Value::String(v.to_owned()),
        ValueRef::Bytes(v) => Value::Bytes(v.to_vec()),
        ValueRef::Double(v) => Value::Double(v),
        ValueRef::Float(v) => Value::Float(v),
        ValueRef::Enum(v) => Value::Enum(v),
        ValueRef::Message(m) => Value::Message(to_dynamic(m)),
    }
}

pub fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).expect("codec output is valid JSON")
}
