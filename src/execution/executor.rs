/// Request execution
///
/// Runs the strictly ordered stages for one request: parse, select the
/// operation, validate, execute depth-first, assemble. Parse and validation
/// failures end the request with no data. Coercion and resolver failures null
/// out only the field they happened at and are recorded with its path.

use crate::config::ExecutionConfig;
use crate::execution::coerce::{resolve_literal, Coercer};
use crate::execution::response::{ErrorKind, ExecutionError, PathSegment, Request, Response};
use crate::execution::validate::Validator;
use crate::query::{parse_document, Operation, OperationKind, Pos, Selection};
use crate::schema::{Field, FieldValue, Object, ResolverContext, Schema, TypeDescriptor, TypeRef};
use crate::value::{Map, Value};
use std::any::Any;

/// Executes requests against a schema
#[derive(Debug, Clone)]
pub struct Executor<'s> {
    schema: &'s Schema,
    config: ExecutionConfig,
}

impl<'s> Executor<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_config(schema, ExecutionConfig::default())
    }

    pub fn with_config(schema: &'s Schema, config: ExecutionConfig) -> Self {
        Self { schema, config }
    }

    /// Execute one request. `data` is handed to every resolver through
    /// [`ResolverContext::data`].
    pub fn execute(&self, request: &Request, data: &(dyn Any + Send + Sync)) -> Response {
        let document = match parse_document(&request.query) {
            Ok(document) => document,
            Err(err) => {
                tracing::debug!("Request failed to parse: {}", err);
                let pos = Pos {
                    line: err.line,
                    column: err.column,
                };
                return Response::from_errors(vec![ExecutionError::new(
                    ErrorKind::Parse,
                    err.to_string(),
                    Vec::new(),
                )
                .with_location(pos)]);
            }
        };

        let operation = match select_operation(&document.operations, request.operation_name.as_deref()) {
            Ok(operation) => operation,
            Err(message) => return Response::from_errors(vec![validation_error(message)]),
        };

        let root = match operation.kind {
            OperationKind::Query => self.schema.query_type(),
            OperationKind::Mutation => match self.schema.mutation_type() {
                Some(mutation) => mutation,
                None => {
                    return Response::from_errors(vec![validation_error(
                        "Schema is not configured for mutations.",
                    )]);
                }
            },
        };

        let variables = match collect_variables(operation, request) {
            Ok(variables) => variables,
            Err(errors) => return Response::from_errors(errors),
        };

        let violations = Validator::new(
            self.schema,
            self.config.max_depth,
            self.config.strict_input_objects,
        )
        .validate(operation, root);
        if !violations.is_empty() {
            tracing::debug!("Request failed validation with {} errors", violations.len());
            return Response::from_errors(
                violations
                    .into_iter()
                    .map(|v| validation_error(v.message).with_location(v.pos))
                    .collect(),
            );
        }

        let mut ctx = ExecutionContext {
            schema: self.schema,
            coercer: Coercer::new(self.schema, &variables, self.config.strict_input_objects),
            data,
            errors: Vec::new(),
        };
        let mut path = Vec::new();
        let root_value = FieldValue::NULL;
        let data = ctx.execute_selection_set(root, &root_value, &operation.selection_set, &mut path);

        tracing::debug!(
            "Executed {} with {} root fields, {} errors",
            operation.kind,
            operation.selection_set.len(),
            ctx.errors.len()
        );

        Response {
            data: Some(Value::Object(data)),
            errors: ctx.errors,
        }
    }
}

fn validation_error(message: impl Into<String>) -> ExecutionError {
    ExecutionError::new(ErrorKind::Validation, message, Vec::new())
}

fn select_operation<'d>(
    operations: &'d [Operation],
    name: Option<&str>,
) -> Result<&'d Operation, String> {
    match name {
        Some(name) => operations
            .iter()
            .find(|op| op.name.as_deref() == Some(name))
            .ok_or_else(|| format!("Unknown operation named \"{name}\".")),
        None if operations.len() == 1 => Ok(&operations[0]),
        None => Err("Must provide operation name if query contains multiple operations.".to_string()),
    }
}

/// Request variables for the operation's definitions, defaults applied
fn collect_variables(operation: &Operation, request: &Request) -> Result<Map, Vec<ExecutionError>> {
    let empty = Map::new();
    let mut variables = Map::new();
    let mut errors = Vec::new();

    for definition in &operation.variables {
        let supplied = request
            .variables
            .as_ref()
            .and_then(|vars| vars.get(&definition.name))
            .cloned()
            .map(Value::from);
        let value = supplied.or_else(|| {
            definition
                .default_value
                .as_ref()
                .and_then(|literal| resolve_literal(literal, &empty))
        });

        match value {
            Some(value) => {
                variables.insert(definition.name.clone(), value);
            }
            None if definition.ty.is_non_null() => errors.push(
                validation_error(format!(
                    "Variable \"${}\" of required type \"{}\" was not provided.",
                    definition.name, definition.ty
                ))
                .with_location(definition.pos),
            ),
            None => {}
        }
    }

    if errors.is_empty() {
        Ok(variables)
    } else {
        Err(errors)
    }
}

/// State owned by one request while it executes
struct ExecutionContext<'a> {
    schema: &'a Schema,
    coercer: Coercer<'a>,
    data: &'a (dyn Any + Send + Sync),
    errors: Vec<ExecutionError>,
}

impl<'a> ExecutionContext<'a> {
    fn record(&mut self, kind: ErrorKind, message: impl Into<String>, path: &[PathSegment]) {
        let error = ExecutionError::new(kind, message, path.to_vec());
        tracing::debug!("Field error: {}", error);
        self.errors.push(error);
    }

    /// Resolve every selection on `parent`, in request order. Root mutation
    /// fields therefore run one after another.
    fn execute_selection_set(
        &mut self,
        object: &Object,
        parent: &FieldValue,
        selections: &[Selection],
        path: &mut Vec<PathSegment>,
    ) -> Map {
        let mut result = Map::new();
        for selection in selections {
            let key = selection.response_key();
            // validation guarantees a repeated key is an identical selection
            if result.contains_key(key) {
                continue;
            }
            path.push(PathSegment::Key(key.to_string()));
            let value = match object.get_field(&selection.name) {
                Some(field) => self.execute_field(field, parent, selection, path),
                // only reachable when validation was bypassed
                None => {
                    let error = ExecutionError::new(
                        ErrorKind::Validation,
                        format!("Cannot query field \"{}\" on type \"{}\".", selection.name, object.name),
                        path.clone(),
                    )
                    .with_location(selection.pos);
                    tracing::debug!("Field error: {}", error);
                    self.errors.push(error);
                    Value::Null
                }
            };
            path.pop();
            result.insert(key.to_string(), value);
        }
        result
    }

    fn execute_field(
        &mut self,
        field: &Field,
        parent: &FieldValue,
        selection: &Selection,
        path: &mut Vec<PathSegment>,
    ) -> Value {
        let args = match self.coercer.coerce_arguments(&field.arguments, &selection.arguments) {
            Ok(args) => args,
            Err(err) => {
                self.record(ErrorKind::Coercion, err.to_string(), path);
                return Value::Null;
            }
        };

        let ctx = ResolverContext::new(&field.name, parent, &args, self.data);
        match field.resolve(ctx) {
            Ok(resolved) => self.complete_value(&field.ty, resolved, &selection.selection_set, path),
            Err(err) => {
                self.record(ErrorKind::Resolution, err.message, path);
                Value::Null
            }
        }
    }

    /// Shape a resolved value according to the field's declared type
    fn complete_value(
        &mut self,
        ty: &TypeRef,
        value: FieldValue,
        selections: &[Selection],
        path: &mut Vec<PathSegment>,
    ) -> Value {
        if value.is_null() {
            return Value::Null;
        }

        match ty {
            TypeRef::List(inner) => {
                let items = match value {
                    FieldValue::List(items) => items,
                    FieldValue::Value(Value::List(items)) => {
                        items.into_iter().map(FieldValue::Value).collect()
                    }
                    _ => {
                        self.record(
                            ErrorKind::Resolution,
                            format!("Expected a list for field of type \"{ty}\"."),
                            path,
                        );
                        return Value::Null;
                    }
                };

                let mut completed = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    completed.push(self.complete_value(inner, item, selections, path));
                    path.pop();
                }
                Value::List(completed)
            }
            TypeRef::Named(name) => match self.schema.get_type(name) {
                Some(TypeDescriptor::Scalar(kind)) => match value {
                    FieldValue::Value(v) => match kind.complete_output(v) {
                        Ok(v) => v,
                        Err(message) => {
                            self.record(ErrorKind::Resolution, message, path);
                            Value::Null
                        }
                    },
                    _ => {
                        self.record(
                            ErrorKind::Resolution,
                            format!("Expected a {name} value, found an object or list."),
                            path,
                        );
                        Value::Null
                    }
                },
                Some(TypeDescriptor::Object(object)) => match &value {
                    FieldValue::Owned(_) | FieldValue::Value(Value::Object(_)) => {
                        Value::Object(self.execute_selection_set(object, &value, selections, path))
                    }
                    _ => {
                        self.record(
                            ErrorKind::Resolution,
                            format!("Expected an object of type \"{name}\"."),
                            path,
                        );
                        Value::Null
                    }
                },
                _ => {
                    self.record(
                        ErrorKind::Resolution,
                        format!("Type \"{name}\" cannot be used as a field result."),
                        path,
                    );
                    Value::Null
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InputValue, ResolutionError};
    use serde_json::json;

    struct Counter {
        start: i64,
    }

    fn schema() -> Schema {
        let point = Object::new("Point")
            .field(Field::new("x", TypeRef::named(TypeRef::INT)))
            .field(Field::new("y", TypeRef::named(TypeRef::INT)));

        let query = Object::new("Query")
            .field(Field::with_resolver(
                "start",
                TypeRef::named(TypeRef::INT),
                |ctx: ResolverContext<'_>| Ok(FieldValue::value(ctx.data::<Counter>()?.start)),
            ))
            .field(
                Field::with_resolver("echo", TypeRef::named(TypeRef::STRING), |ctx: ResolverContext<'_>| {
                    Ok(FieldValue::value(ctx.arg("text").cloned().unwrap_or_default()))
                })
                .argument(InputValue::required("text", TypeRef::named(TypeRef::STRING))),
            )
            .field(Field::with_resolver(
                "fail",
                TypeRef::named(TypeRef::STRING),
                |_ctx: ResolverContext<'_>| Err(ResolutionError::new("nope")),
            ))
            .field(Field::with_resolver(
                "points",
                TypeRef::named_list("Point"),
                |_ctx: ResolverContext<'_>| {
                    Ok(FieldValue::value(Value::from(json!([
                        {"x": 1, "y": 2},
                        {"x": "bad", "y": 4},
                        null
                    ]))))
                },
            ))
            .field(Field::with_resolver(
                "notAList",
                TypeRef::named_list(TypeRef::INT),
                |_ctx: ResolverContext<'_>| Ok(FieldValue::value(3)),
            ));

        Schema::build(query).register(point).finish().unwrap()
    }

    fn run(schema: &Schema, request: Request) -> serde_json::Value {
        Executor::new(schema).execute(&request, &Counter { start: 7 }).to_json()
    }

    #[test]
    fn test_request_data_reaches_resolvers() {
        let schema = schema();
        let response = run(&schema, Request::new("{ start answer: start }"));
        assert_eq!(
            response,
            json!({"data": {"start": 7, "answer": 7}, "errors": []})
        );
    }

    #[test]
    fn test_sibling_fields_survive_errors() {
        let schema = schema();
        let response = run(&schema, Request::new("{ fail echo start }"));
        assert_eq!(response["data"], json!({"fail": null, "echo": null, "start": 7}));
        let errors = response["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["message"], "nope");
        assert_eq!(errors[0]["path"], json!(["fail"]));
        assert_eq!(errors[0]["extensions"]["code"], "RESOLUTION_ERROR");
        assert_eq!(errors[1]["message"], "missing required argument text");
        assert_eq!(errors[1]["extensions"]["code"], "COERCION_ERROR");
    }

    #[test]
    fn test_list_elements_fail_independently() {
        let schema = schema();
        let response = run(&schema, Request::new("{ points { x y } }"));
        assert_eq!(
            response["data"],
            json!({"points": [{"x": 1, "y": 2}, {"x": null, "y": 4}, null]})
        );
        assert_eq!(response["errors"][0]["path"], json!(["points", 1, "x"]));
    }

    #[test]
    fn test_non_list_for_list_field() {
        let schema = schema();
        let response = run(&schema, Request::new("{ notAList }"));
        assert_eq!(response["data"], json!({"notAList": null}));
        assert_eq!(response["errors"][0]["path"], json!(["notAList"]));
    }

    #[test]
    fn test_parse_and_validation_failures_return_no_data() {
        let schema = schema();
        let response = run(&schema, Request::new("{ start"));
        assert_eq!(response["data"], json!(null));
        assert_eq!(response["errors"][0]["extensions"]["code"], "PARSE_ERROR");

        let response = run(&schema, Request::new("{ start unknown }"));
        assert_eq!(response["data"], json!(null));
        assert_eq!(response["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");

        let response = run(&schema, Request::new("mutation { start }"));
        assert_eq!(response["data"], json!(null));
        assert_eq!(
            response["errors"][0]["message"],
            "Schema is not configured for mutations."
        );
    }

    #[test]
    fn test_operation_selection() {
        let schema = schema();
        let source = "query A { start } query B { echo(text: \"b\") }";

        let response = run(&schema, Request::new(source));
        assert_eq!(response["data"], json!(null));

        let response = run(&schema, Request::new(source).operation_name("B"));
        assert_eq!(response["data"], json!({"echo": "b"}));

        let response = run(&schema, Request::new(source).operation_name("C"));
        assert_eq!(response["errors"][0]["message"], "Unknown operation named \"C\".");
    }

    #[test]
    fn test_variables_and_defaults() {
        let schema = schema();
        let source = "query ($text: String = \"default\") { echo(text: $text) }";

        let response = run(&schema, Request::new(source));
        assert_eq!(response["data"], json!({"echo": "default"}));

        let response = run(&schema, Request::new(source).variables(json!({"text": "given"})));
        assert_eq!(response["data"], json!({"echo": "given"}));

        let response = run(&schema, Request::new("query ($text: String!) { echo(text: $text) }"));
        assert_eq!(response["data"], json!(null));
        assert_eq!(
            response["errors"][0]["message"],
            "Variable \"$text\" of required type \"String!\" was not provided."
        );
    }

    #[test]
    fn test_depth_limit_from_config() {
        let schema = schema();
        let config = ExecutionConfig {
            max_depth: 1,
            ..ExecutionConfig::default()
        };
        let response = Executor::with_config(&schema, config)
            .execute(&Request::new("{ points { x } }"), &Counter { start: 0 });
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "Query exceeds maximum depth of 1.");
    }

    #[test]
    fn test_errors_carry_source_locations() {
        let schema = schema();
        let response = run(&schema, Request::new("{\n  nope\n  other: nope\n}"));
        assert_eq!(response["data"], json!(null));
        let errors = response["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["message"], errors[1]["message"]);
        assert_eq!(errors[0]["locations"], json!([{"line": 2, "column": 3}]));
        assert_eq!(errors[1]["locations"], json!([{"line": 3, "column": 3}]));

        let response = run(&schema, Request::new("{ start"));
        assert_eq!(response["errors"][0]["locations"][0]["line"], 1);

        let response = run(&schema, Request::new("{ fail }"));
        assert!(response["errors"][0].get("locations").is_none());
    }

    #[test]
    fn test_unknown_field_during_execution_is_a_validation_error() {
        let schema = schema();
        let variables = Map::new();
        let mut ctx = ExecutionContext {
            schema: &schema,
            coercer: Coercer::new(&schema, &variables, true),
            data: &Counter { start: 1 },
            errors: Vec::new(),
        };
        let selections = crate::query::parse_document("{ start missing }")
            .unwrap()
            .operations
            .remove(0)
            .selection_set;

        let mut path = Vec::new();
        let data = ctx.execute_selection_set(
            schema.query_type(),
            &FieldValue::NULL,
            &selections,
            &mut path,
        );

        assert_eq!(data.get("start"), Some(&Value::Int(1)));
        assert_eq!(data.get("missing"), Some(&Value::Null));
        assert_eq!(ctx.errors.len(), 1);
        assert_eq!(ctx.errors[0].kind, ErrorKind::Validation);
        assert_eq!(ctx.errors[0].path, vec![PathSegment::Key("missing".to_string())]);
        assert_eq!(ctx.errors[0].locations[0].column, 9);
    }
}
