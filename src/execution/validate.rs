/// Request validation
///
/// Checks the selected operation against the schema before anything runs.
/// Unlike coercion, validation collects every violation it finds. Literal
/// argument values are checked for shape here; whether a required argument
/// was supplied, and what variables hold, is left to coercion at execution.

use crate::query::{Literal, Operation, Pos, Selection};
use crate::schema::{Object, Schema, TypeDescriptor, TypeRef};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub pos: Pos,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }
}

pub struct Validator<'a> {
    schema: &'a Schema,
    max_depth: usize,
    strict: bool,
    defined_variables: HashSet<&'a str>,
    errors: Vec<ValidationError>,
    depth_exceeded: bool,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema, max_depth: usize, strict: bool) -> Self {
        Self {
            schema,
            max_depth,
            strict,
            defined_variables: HashSet::new(),
            errors: Vec::new(),
            depth_exceeded: false,
        }
    }

    /// Validate `operation` starting at `root`; empty result means valid
    pub fn validate(mut self, operation: &'a Operation, root: &'a Object) -> Vec<ValidationError> {
        for definition in &operation.variables {
            if !self.defined_variables.insert(definition.name.as_str()) {
                self.errors.push(ValidationError::new(
                    format!("There can be only one variable named \"${}\".", definition.name),
                    definition.pos,
                ));
            }
        }
        self.visit_selection_set(root, &operation.selection_set, 1);
        self.errors
    }

    fn visit_selection_set(&mut self, parent: &Object, selections: &[Selection], depth: usize) {
        if depth > self.max_depth {
            if !self.depth_exceeded {
                self.depth_exceeded = true;
                let pos = selections.first().map(|s| s.pos).unwrap_or_default();
                self.errors.push(ValidationError::new(
                    format!("Query exceeds maximum depth of {}.", self.max_depth),
                    pos,
                ));
            }
            return;
        }

        self.check_response_keys(selections);
        for selection in selections {
            self.visit_selection(parent, selection, depth);
        }
    }

    fn check_response_keys(&mut self, selections: &[Selection]) {
        for (i, selection) in selections.iter().enumerate() {
            let key = selection.response_key();
            let conflict = selections[..i]
                .iter()
                .find(|earlier| earlier.response_key() == key);
            if let Some(earlier) = conflict {
                if !earlier.same_shape(selection) {
                    self.errors.push(ValidationError::new(
                        format!(
                            "Fields \"{key}\" conflict because they select different fields or arguments. Use different aliases on the fields."
                        ),
                        selection.pos,
                    ));
                }
            }
        }
    }

    fn visit_selection(&mut self, parent: &Object, selection: &Selection, depth: usize) {
        let Some(field) = parent.get_field(&selection.name) else {
            self.errors.push(ValidationError::new(
                format!(
                    "Cannot query field \"{}\" on type \"{}\".",
                    selection.name, parent.name
                ),
                selection.pos,
            ));
            return;
        };

        let mut seen = HashSet::new();
        for argument in &selection.arguments {
            if !seen.insert(argument.name.as_str()) {
                self.errors.push(ValidationError::new(
                    format!("There can be only one argument named \"{}\".", argument.name),
                    argument.pos,
                ));
                continue;
            }
            let Some(declared) = field.arguments.get(&argument.name) else {
                self.errors.push(ValidationError::new(
                    format!(
                        "Unknown argument \"{}\" on field \"{}.{}\".",
                        argument.name, parent.name, field.name
                    ),
                    argument.pos,
                ));
                continue;
            };
            self.check_undefined_variables(&argument.value, argument.pos);
            if let Err(reason) = self.check_literal(&declared.ty, &argument.value) {
                self.errors.push(ValidationError::new(
                    format!("Argument \"{}\" has invalid value: {}", argument.name, reason),
                    argument.pos,
                ));
            }
        }

        let base = field.ty.base_name();
        match self.schema.get_type(base) {
            Some(TypeDescriptor::Object(object)) => {
                if selection.selection_set.is_empty() {
                    self.errors.push(ValidationError::new(
                        format!(
                            "Field \"{}\" of type \"{}\" must have a selection of subfields.",
                            selection.name, field.ty
                        ),
                        selection.pos,
                    ));
                } else {
                    self.visit_selection_set(object, &selection.selection_set, depth + 1);
                }
            }
            Some(TypeDescriptor::Scalar(_)) => {
                if !selection.selection_set.is_empty() {
                    self.errors.push(ValidationError::new(
                        format!(
                            "Field \"{}\" must not have a selection since type \"{}\" has no subfields.",
                            selection.name, field.ty
                        ),
                        selection.pos,
                    ));
                }
            }
            _ => {}
        }
    }

    fn check_undefined_variables(&mut self, literal: &Literal, pos: Pos) {
        match literal {
            Literal::Variable(name) if !self.defined_variables.contains(name.as_str()) => {
                self.errors.push(ValidationError::new(
                    format!("Variable \"${name}\" is not defined."),
                    pos,
                ));
            }
            Literal::List(items) => {
                for item in items {
                    self.check_undefined_variables(item, pos);
                }
            }
            Literal::Object(fields) => {
                for (_, value) in fields {
                    self.check_undefined_variables(value, pos);
                }
            }
            _ => {}
        }
    }

    /// Shape check of a literal against an input type; variables and nulls
    /// are deferred to coercion
    fn check_literal(&self, ty: &TypeRef, literal: &Literal) -> Result<(), String> {
        if matches!(literal, Literal::Variable(_) | Literal::Null) {
            return Ok(());
        }
        let TypeRef::Named(name) = ty else {
            return Err(format!("expected {ty}, found {}", literal.kind()));
        };

        match self.schema.get_type(name) {
            Some(TypeDescriptor::Scalar(kind)) => {
                let fits = matches!(
                    (kind.name(), literal),
                    ("Int", Literal::Int(_))
                        | ("Float", Literal::Int(_) | Literal::Float(_))
                        | ("String", Literal::String(_))
                        | ("Boolean", Literal::Boolean(_))
                        | ("ID", Literal::String(_) | Literal::Int(_))
                );
                if fits {
                    Ok(())
                } else {
                    Err(format!("expected {name}, found {}", literal.kind()))
                }
            }
            Some(TypeDescriptor::InputObject(input)) => {
                let Literal::Object(fields) = literal else {
                    return Err(format!("expected {name}, found {}", literal.kind()));
                };
                let mut seen = HashSet::new();
                for (field_name, value) in fields {
                    if !seen.insert(field_name.as_str()) {
                        return Err(format!("duplicate field \"{field_name}\" in {name}"));
                    }
                    match input.fields.get(field_name) {
                        Some(declared) => self
                            .check_literal(&declared.ty, value)
                            .map_err(|reason| format!("in field \"{field_name}\": {reason}"))?,
                        None if self.strict => {
                            return Err(format!(
                                "field \"{field_name}\" is not defined by type \"{name}\""
                            ));
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            _ => Err(format!("type \"{name}\" is not an input type")),
        }
    }
}
