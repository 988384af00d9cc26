/// Resolver plumbing
///
/// A resolver receives a [`ResolverContext`] (parent value, coerced arguments
/// and the per-request data) and produces a [`FieldValue`]. Typed parents are
/// carried as `Arc<dyn Any>` and recovered with `try_downcast_ref`, so field
/// access never needs reflection.

use crate::value::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error returned by a resolver. Isolated to the field it came from.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ResolutionError {
    pub message: String,
}

impl ResolutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ResolutionError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ResolutionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

pub type ResolverResult = std::result::Result<FieldValue, ResolutionError>;

/// Boxed resolver function stored on a field descriptor
pub type ResolverFn = Arc<dyn for<'a> Fn(ResolverContext<'a>) -> ResolverResult + Send + Sync>;

/// Value produced by a resolver, before completion against the field's type
#[derive(Clone)]
pub enum FieldValue {
    /// Plain value; objects are read structurally by field name
    Value(Value),
    /// Typed entity, read through the object's accessor fields
    Owned(Arc<dyn Any + Send + Sync>),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub const NULL: FieldValue = FieldValue::Value(Value::Null);

    pub fn value(value: impl Into<Value>) -> Self {
        FieldValue::Value(value.into())
    }

    pub fn owned_any<T: Any + Send + Sync>(value: T) -> Self {
        FieldValue::Owned(Arc::new(value))
    }

    pub fn list(items: impl IntoIterator<Item = FieldValue>) -> Self {
        FieldValue::List(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Value(Value::Null))
    }

    pub fn try_downcast_ref<T: Any>(&self) -> std::result::Result<&T, ResolutionError> {
        match self {
            FieldValue::Owned(any) => any.downcast_ref::<T>().ok_or_else(|| {
                ResolutionError::new(format!(
                    "parent value is not a {}",
                    short_type_name::<T>()
                ))
            }),
            _ => Err(ResolutionError::new(format!(
                "parent value is not a {}",
                short_type_name::<T>()
            ))),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            FieldValue::Owned(_) => f.write_str("Owned(..)"),
            FieldValue::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Value(value)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Everything a resolver can see
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    pub field_name: &'a str,
    pub parent_value: &'a FieldValue,
    pub args: &'a Map,
    data: &'a (dyn Any + Send + Sync),
}

impl<'a> ResolverContext<'a> {
    pub fn new(
        field_name: &'a str,
        parent_value: &'a FieldValue,
        args: &'a Map,
        data: &'a (dyn Any + Send + Sync),
    ) -> Self {
        Self {
            field_name,
            parent_value,
            args,
            data,
        }
    }

    /// Borrow the request data as `T`
    pub fn data<T: Any>(&self) -> std::result::Result<&'a T, ResolutionError> {
        self.data.downcast_ref::<T>().ok_or_else(|| {
            ResolutionError::new(format!(
                "request data is not a {}",
                short_type_name::<T>()
            ))
        })
    }

    /// Coerced argument, `None` when the caller omitted it
    pub fn arg(&self, name: &str) -> Option<&'a Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }
}
