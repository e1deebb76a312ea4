//! Field values exchanged between the codec and accessor strategies.

use crate::schema::ValueKind;

/// An owned field value.
///
/// `M` is the payload of nested messages: a builder when values flow from the
/// reader into a strategy, a finalized message when users populate a
/// [`DynamicBuilder`](crate::accessor::DynamicBuilder).
#[derive(Debug, Clone, PartialEq)]
pub enum Value<M> {
    Int32(i32),
    Int64(i64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Double(f64),
    Float(f32),
    Enum(i32),
    Message(M),
}

impl<M> Value<M> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Double(_) => "double",
            Self::Float(_) => "float",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
        }
    }

    /// Whether this value can be stored in a field of `kind`.
    pub fn fits(&self, kind: &ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::Int32(_), ValueKind::Int32)
                | (Self::Int64(_), ValueKind::Int64)
                | (Self::Bool(_), ValueKind::Bool)
                | (Self::String(_), ValueKind::String)
                | (Self::Bytes(_), ValueKind::Bytes)
                | (Self::Double(_), ValueKind::Double)
                | (Self::Float(_), ValueKind::Float)
                | (Self::Enum(_), ValueKind::Enum(_))
                | (Self::Message(_), ValueKind::Message(_))
        )
    }

    /// Converts the nested message payload, leaving scalars untouched.
    pub fn try_map_message<N, E>(self, f: impl FnOnce(M) -> Result<N, E>) -> Result<Value<N>, E> {
        Ok(match self {
            Self::Int32(v) => Value::Int32(v),
            Self::Int64(v) => Value::Int64(v),
            Self::Bool(v) => Value::Bool(v),
            Self::String(v) => Value::String(v),
            Self::Bytes(v) => Value::Bytes(v),
            Self::Double(v) => Value::Double(v),
            Self::Float(v) => Value::Float(v),
            Self::Enum(v) => Value::Enum(v),
            Self::Message(m) => Value::Message(f(m)?),
        })
    }

    /// Borrowed view of this value.
    pub fn as_value_ref<R: ?Sized>(&self) -> ValueRef<'_, R>
    where
        M: std::borrow::Borrow<R>,
    {
        match self {
            Self::Int32(v) => ValueRef::Int32(*v),
            Self::Int64(v) => ValueRef::Int64(*v),
            Self::Bool(v) => ValueRef::Bool(*v),
            Self::String(v) => ValueRef::String(v),
            Self::Bytes(v) => ValueRef::Bytes(v),
            Self::Double(v) => ValueRef::Double(*v),
            Self::Float(v) => ValueRef::Float(*v),
            Self::Enum(v) => ValueRef::Enum(*v),
            Self::Message(m) => ValueRef::Message(<M as std::borrow::Borrow<R>>::borrow(m)),
        }
    }
}

/// A borrowed field value read out of a message.
///
/// `M` may be unsized so compiled strategies can hand out `&dyn` views of
/// nested records.
pub enum ValueRef<'a, M: ?Sized> {
    Int32(i32),
    Int64(i64),
    Bool(bool),
    String(&'a str),
    Bytes(&'a [u8]),
    Double(f64),
    Float(f32),
    Enum(i32),
    Message(&'a M),
}

impl<M: ?Sized> Clone for ValueRef<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized> Copy for ValueRef<'_, M> {}

impl<M: ?Sized> ValueRef<'_, M> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Double(_) => "double",
            Self::Float(_) => "float",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
        }
    }

    pub fn fits(&self, kind: &ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::Int32(_), ValueKind::Int32)
                | (Self::Int64(_), ValueKind::Int64)
                | (Self::Bool(_), ValueKind::Bool)
                | (Self::String(_), ValueKind::String)
                | (Self::Bytes(_), ValueKind::Bytes)
                | (Self::Double(_), ValueKind::Double)
                | (Self::Float(_), ValueKind::Float)
                | (Self::Enum(_), ValueKind::Enum(_))
                | (Self::Message(_), ValueKind::Message(_))
        )
    }
}

impl<M: ?Sized + std::fmt::Debug> std::fmt::Debug for ValueRef<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int32(v) => f.debug_tuple("Int32").field(v).finish(),
            Self::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Self::Message(m) => f.debug_tuple("Message").field(m).finish(),
        }
    }
}

impl<M: ?Sized + PartialEq> PartialEq for ValueRef<'_, M> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Message(a), Self::Message(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_matches_kind() {
        let v: Value<()> = Value::Int64(3);
        assert!(v.fits(&ValueKind::Int64));
        assert!(!v.fits(&ValueKind::Int32));
        let e: Value<()> = Value::Enum(2);
        assert!(e.fits(&ValueKind::Enum("Status".into())));
        assert!(Value::Message(()).fits(&ValueKind::Message("Task".into())));
    }

    #[test]
    fn try_map_message_only_touches_payload() {
        let v: Value<u8> = Value::Message(7);
        let mapped: Result<Value<u16>, ()> = v.try_map_message(|m| Ok(u16::from(m) * 2));
        assert_eq!(mapped.unwrap(), Value::Message(14));

        let s: Value<u8> = Value::String("x".into());
        let mapped: Result<Value<u16>, ()> = s.try_map_message(|_| Err(()));
        assert_eq!(mapped.unwrap(), Value::String("x".into()));
    }

    #[test]
    fn as_value_ref_borrows() {
        let v: Value<String> = Value::Message("nested".into());
        let r: ValueRef<'_, str> = v.as_value_ref();
        assert_eq!(r, ValueRef::Message("nested"));
        assert_eq!(r.label(), "message");
    }
}
