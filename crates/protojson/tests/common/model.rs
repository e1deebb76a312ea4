//! Hand-written compiled glue for the `Person` and `Task` fixtures.

use protojson::accessor::{downcast_message, GeneratedBuilder, GeneratedMessage, GeneratedType};
use protojson::{CodecError, Value, ValueRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending = 0,
    Started = 1,
    Completed = 2,
}

impl Status {
    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            0 => Some(Self::Pending),
            1 => Some(Self::Started),
            2 => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

impl GeneratedMessage for Task {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn field(&self, tag: u32) -> Option<ValueRef<'_, dyn GeneratedMessage>> {
        match tag {
            1 => self.id.map(ValueRef::Int32),
            2 => self.name.as_deref().map(ValueRef::String),
            3 => self.description.as_deref().map(ValueRef::String),
            4 => self.status.map(|s| ValueRef::Enum(s as i32)),
            _ => None,
        }
    }

    fn repeated_len(&self, _tag: u32) -> usize {
        0
    }

    fn repeated_at(&self, _tag: u32, _index: usize) -> Option<ValueRef<'_, dyn GeneratedMessage>> {
        None
    }
}

#[derive(Default)]
pub struct TaskBuilder(Task);

impl GeneratedBuilder for TaskBuilder {
    fn set_field(
        &mut self,
        tag: u32,
        value: Value<Box<dyn GeneratedMessage>>,
    ) -> Result<(), CodecError> {
        match (tag, value) {
            (1, Value::Int32(v)) => self.0.id = Some(v),
            (2, Value::String(v)) => self.0.name = Some(v),
            (3, Value::String(v)) => self.0.description = Some(v),
            (4, Value::Enum(n)) => {
                let status = Status::from_number(n).ok_or_else(|| CodecError::UnknownEnumValue {
                    enum_name: "Status".into(),
                    value: n.to_string(),
                })?;
                self.0.status = Some(status);
            }
            (tag, other) => {
                return Err(CodecError::Accessor(format!(
                    "Task: cannot store {} at tag {tag}",
                    other.label()
                )))
            }
        }
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn GeneratedMessage> {
        Box::new(self.0)
    }
}

impl GeneratedType for Task {
    const TYPE_NAME: &'static str = "Task";
    type Builder = TaskBuilder;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub current_task: Option<Task>,
    pub delegated_task: Vec<Task>,
    pub priority_task: Vec<Task>,
    pub repeated_long: Vec<i64>,
    pub active: Option<bool>,
    pub rating: Option<f64>,
    pub score: Option<f32>,
    pub avatar: Option<Vec<u8>>,
}

fn task_ref(task: &Task) -> ValueRef<'_, dyn GeneratedMessage> {
    ValueRef::Message(task as &dyn GeneratedMessage)
}

impl GeneratedMessage for Person {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn field(&self, tag: u32) -> Option<ValueRef<'_, dyn GeneratedMessage>> {
        match tag {
            1 => self.id.map(ValueRef::Int32),
            2 => self.first_name.as_deref().map(ValueRef::String),
            3 => self.last_name.as_deref().map(ValueRef::String),
            4 => self.age.map(ValueRef::Int32),
            5 => self.email.as_deref().map(ValueRef::String),
            6 => self.current_task.as_ref().map(task_ref),
            10 => self.active.map(ValueRef::Bool),
            11 => self.rating.map(ValueRef::Double),
            12 => self.score.map(ValueRef::Float),
            13 => self.avatar.as_deref().map(ValueRef::Bytes),
            _ => None,
        }
    }

    fn repeated_len(&self, tag: u32) -> usize {
        match tag {
            7 => self.delegated_task.len(),
            8 => self.priority_task.len(),
            9 => self.repeated_long.len(),
            _ => 0,
        }
    }

    fn repeated_at(&self, tag: u32, index: usize) -> Option<ValueRef<'_, dyn GeneratedMessage>> {
        match tag {
            7 => self.delegated_task.get(index).map(task_ref),
            8 => self.priority_task.get(index).map(task_ref),
            9 => self.repeated_long.get(index).copied().map(ValueRef::Int64),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct PersonBuilder(Person);

impl GeneratedBuilder for PersonBuilder {
    fn set_field(
        &mut self,
        tag: u32,
        value: Value<Box<dyn GeneratedMessage>>,
    ) -> Result<(), CodecError> {
        let p = &mut self.0;
        match (tag, value) {
            (1, Value::Int32(v)) => p.id = Some(v),
            (2, Value::String(v)) => p.first_name = Some(v),
            (3, Value::String(v)) => p.last_name = Some(v),
            (4, Value::Int32(v)) => p.age = Some(v),
            (5, Value::String(v)) => p.email = Some(v),
            (6, Value::Message(m)) => p.current_task = Some(downcast_message(m)?),
            (7, Value::Message(m)) => p.delegated_task.push(downcast_message(m)?),
            (8, Value::Message(m)) => p.priority_task.push(downcast_message(m)?),
            (9, Value::Int64(v)) => p.repeated_long.push(v),
            (10, Value::Bool(v)) => p.active = Some(v),
            (11, Value::Double(v)) => p.rating = Some(v),
            (12, Value::Float(v)) => p.score = Some(v),
            (13, Value::Bytes(v)) => p.avatar = Some(v),
            (tag, other) => {
                return Err(CodecError::Accessor(format!(
                    "Person: cannot store {} at tag {tag}",
                    other.label()
                )))
            }
        }
        Ok(())
    }

    fn build(self: Box<Self>) -> Box<dyn GeneratedMessage> {
        Box::new(self.0)
    }
}

impl GeneratedType for Person {
    const TYPE_NAME: &'static str = "Person";
    type Builder = PersonBuilder;
}
