/// Argument coercion
///
/// Turns the raw arguments written in a request (literals and `$variables`)
/// into typed values matching a field's declared arguments. Coercion is
/// all-or-nothing: declared arguments are processed in declaration order and
/// the first failure is returned.

use crate::query::{Argument, Literal};
use crate::schema::{InputValue, Schema, TypeDescriptor, TypeRef};
use crate::value::{Map, Value};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("missing required argument {0}")]
    MissingRequired(String),

    #[error("type mismatch for {0}")]
    TypeMismatch(String),

    #[error("unknown field {field} in argument {argument}")]
    UnknownInputField { argument: String, field: String },
}

/// Coerces raw arguments against declared ones
pub struct Coercer<'a> {
    schema: &'a Schema,
    variables: &'a Map,
    /// Reject keys an input object does not declare
    strict: bool,
}

impl<'a> Coercer<'a> {
    pub fn new(schema: &'a Schema, variables: &'a Map, strict: bool) -> Self {
        Self {
            schema,
            variables,
            strict,
        }
    }

    /// Coerce `raw` against `declared`. Omitted optional arguments are absent
    /// from the result.
    pub fn coerce_arguments(
        &self,
        declared: &IndexMap<String, InputValue>,
        raw: &[Argument],
    ) -> Result<Map, CoercionError> {
        let mut coerced = Map::new();
        for (name, argument) in declared {
            let supplied = raw
                .iter()
                .find(|arg| &arg.name == name)
                .and_then(|arg| resolve_literal(&arg.value, self.variables));
            if let Some(value) = self.coerce_input(argument, name, supplied)? {
                coerced.insert(name.clone(), value);
            }
        }
        Ok(coerced)
    }

    /// Apply required-ness, then coerce a present value to the declared type
    fn coerce_input(
        &self,
        declared: &InputValue,
        path: &str,
        supplied: Option<Value>,
    ) -> Result<Option<Value>, CoercionError> {
        match supplied {
            None if declared.required => Err(CoercionError::MissingRequired(path.to_string())),
            None => Ok(None),
            Some(Value::Null) if declared.required => {
                Err(CoercionError::MissingRequired(path.to_string()))
            }
            Some(Value::Null) => Ok(Some(Value::Null)),
            Some(value) => self.coerce_value(&declared.ty, path, value).map(Some),
        }
    }

    pub fn coerce_value(
        &self,
        ty: &TypeRef,
        path: &str,
        value: Value,
    ) -> Result<Value, CoercionError> {
        let TypeRef::Named(type_name) = ty else {
            return Err(CoercionError::TypeMismatch(path.to_string()));
        };

        match self.schema.get_type(type_name) {
            Some(TypeDescriptor::Scalar(kind)) => kind
                .coerce_input(&value)
                .ok_or_else(|| CoercionError::TypeMismatch(path.to_string())),
            Some(TypeDescriptor::InputObject(input)) => {
                let Value::Object(mut raw) = value else {
                    return Err(CoercionError::TypeMismatch(path.to_string()));
                };

                let mut coerced = Map::new();
                for (field_name, field) in &input.fields {
                    let field_path = format!("{path}.{field_name}");
                    let supplied = raw.shift_remove(field_name);
                    if let Some(value) = self.coerce_input(field, &field_path, supplied)? {
                        coerced.insert(field_name.clone(), value);
                    }
                }

                if self.strict {
                    if let Some(unknown) = raw.keys().next() {
                        return Err(CoercionError::UnknownInputField {
                            argument: path.to_string(),
                            field: unknown.clone(),
                        });
                    }
                }
                Ok(Value::Object(coerced))
            }
            _ => Err(CoercionError::TypeMismatch(path.to_string())),
        }
    }
}

/// Substitute variables into a literal.
///
/// `None` means the value is absent: an unset variable, or a literal made of
/// one. Unset variables inside objects drop the key and inside lists become null.
pub fn resolve_literal(literal: &Literal, variables: &Map) -> Option<Value> {
    Some(match literal {
        Literal::Null => Value::Null,
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Enum(e) => Value::Enum(e.clone()),
        Literal::Variable(name) => return variables.get(name).cloned(),
        Literal::List(items) => Value::List(
            items
                .iter()
                .map(|item| resolve_literal(item, variables).unwrap_or(Value::Null))
                .collect(),
        ),
        Literal::Object(fields) => Value::Object(
            fields
                .iter()
                .filter_map(|(name, value)| {
                    resolve_literal(value, variables).map(|v| (name.clone(), v))
                })
                .collect(),
        ),
    })
}
