/// Built-in scalar types
///
/// Every schema starts with `Int`, `Float`, `String`, `Boolean` and `ID`
/// registered. Input coercion is literal: `Int` only accepts whole numbers and
/// `String` only accepts text.

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    Id,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 5] = [
        ScalarKind::Int,
        ScalarKind::Float,
        ScalarKind::String,
        ScalarKind::Boolean,
        ScalarKind::Id,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::String => "String",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Id => "ID",
        }
    }

    /// Coerce an input value (literal or variable) into this scalar.
    ///
    /// Returns `None` on a kind mismatch. `Float` widens integers and `ID`
    /// accepts integers as their decimal text.
    pub fn coerce_input(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (ScalarKind::Int, Value::Int(i)) => Some(Value::Int(*i)),
            (ScalarKind::Float, Value::Float(f)) => Some(Value::Float(*f)),
            (ScalarKind::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (ScalarKind::String, Value::String(s)) => Some(Value::String(s.clone())),
            (ScalarKind::Boolean, Value::Boolean(b)) => Some(Value::Boolean(*b)),
            (ScalarKind::Id, Value::String(s)) => Some(Value::String(s.clone())),
            (ScalarKind::Id, Value::Int(i)) => Some(Value::String(i.to_string())),
            _ => None,
        }
    }

    /// Check a resolved value against this scalar before it enters the response
    pub fn complete_output(&self, value: Value) -> Result<Value, String> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (ScalarKind::Int, v @ Value::Int(_)) => Ok(v),
            (ScalarKind::Float, v @ Value::Float(_)) => Ok(v),
            (ScalarKind::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (ScalarKind::String, v @ Value::String(_)) => Ok(v),
            (ScalarKind::Boolean, v @ Value::Boolean(_)) => Ok(v),
            (ScalarKind::Id, v @ Value::String(_)) => Ok(v),
            (ScalarKind::Id, Value::Int(i)) => Ok(Value::String(i.to_string())),
            (kind, other) => Err(format!(
                "{} cannot represent a {} value: {}",
                kind.name(),
                other.kind(),
                other
            )),
        }
    }
}
