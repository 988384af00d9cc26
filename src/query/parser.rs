/// Conversion from the async-graphql document to the selection tree
///
/// `async_graphql_parser::parse_query` does the tokenizing and grammar.
/// This module narrows its `ExecutableDocument` to what the executor runs:
/// queries and mutations made of plain fields. Fragments, directives and
/// subscriptions are rejected here as parse errors.

use crate::query::ast::{
    Argument, Document, Literal, Operation, OperationKind, Pos, Selection, Type, VariableDefinition,
};
use crate::query::ParseError;
use async_graphql_parser::types::{
    BaseType, DocumentOperations, ExecutableDocument, OperationDefinition, OperationType,
    Selection as ParsedSelection, SelectionSet, Type as ParsedType,
};
use async_graphql_parser::{Positioned, Pos as ParsedPos};
use async_graphql_value::{Name, Value};

/// Selection sets nested deeper than this are refused outright
const RECURSION_LIMIT: usize = 64;

impl From<ParsedPos> for Pos {
    fn from(pos: ParsedPos) -> Self {
        Pos {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// Parse a request string into its operations, ordered by position
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let document = async_graphql_parser::parse_query(source).map_err(syntax_error)?;
    convert_document(document)
}

fn syntax_error(err: async_graphql_parser::Error) -> ParseError {
    let pos = err
        .positions()
        .next()
        .map(Pos::from)
        .unwrap_or(Pos { line: 1, column: 1 });
    let text = err.to_string();
    // pest renders a source excerpt; keep only its "= expected ..." line
    let message = text
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("= "))
        .map(str::to_string)
        .unwrap_or(text);
    ParseError::new(message, pos)
}

fn unsupported(what: &str, pos: ParsedPos) -> ParseError {
    ParseError::new(format!("{what} are not supported"), pos.into())
}

fn convert_document(document: ExecutableDocument) -> Result<Document, ParseError> {
    if let Some(fragment) = document.fragments.values().min_by_key(|f| (f.pos.line, f.pos.column)) {
        return Err(unsupported("Fragments", fragment.pos));
    }

    let mut named: Vec<(Option<Name>, Positioned<OperationDefinition>)> = match document.operations {
        DocumentOperations::Single(operation) => vec![(None, operation)],
        DocumentOperations::Multiple(operations) => operations
            .into_iter()
            .map(|(name, operation)| (Some(name), operation))
            .collect(),
    };
    named.sort_by_key(|(_, op)| (op.pos.line, op.pos.column));

    let operations = named
        .into_iter()
        .map(|(name, operation)| convert_operation(name, operation))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Document { operations })
}

fn convert_operation(
    name: Option<Name>,
    operation: Positioned<OperationDefinition>,
) -> Result<Operation, ParseError> {
    let pos = operation.pos;
    let definition = operation.node;

    let kind = match definition.ty {
        OperationType::Query => OperationKind::Query,
        OperationType::Mutation => OperationKind::Mutation,
        OperationType::Subscription => return Err(unsupported("Subscriptions", pos)),
    };
    reject_directives(&definition.directives)?;

    let mut variables = Vec::with_capacity(definition.variable_definitions.len());
    for variable in definition.variable_definitions {
        reject_directives(&variable.node.directives)?;
        variables.push(VariableDefinition {
            name: variable.node.name.node.to_string(),
            ty: convert_type(variable.node.var_type.node),
            default_value: variable
                .node
                .default_value
                .map(|value| convert_value(value.node.into_value())),
            pos: variable.pos.into(),
        });
    }

    Ok(Operation {
        kind,
        name: name.map(|name| name.to_string()),
        variables,
        selection_set: convert_selection_set(definition.selection_set, 1)?,
        pos: pos.into(),
    })
}

fn reject_directives<T>(directives: &[Positioned<T>]) -> Result<(), ParseError> {
    match directives.first() {
        Some(directive) => Err(unsupported("Directives", directive.pos)),
        None => Ok(()),
    }
}

fn convert_selection_set(
    selection_set: Positioned<SelectionSet>,
    depth: usize,
) -> Result<Vec<Selection>, ParseError> {
    if depth > RECURSION_LIMIT {
        return Err(ParseError::new(
            "Query is nested too deeply",
            selection_set.pos.into(),
        ));
    }

    let mut selections = Vec::with_capacity(selection_set.node.items.len());
    for item in selection_set.node.items {
        let field = match item.node {
            ParsedSelection::Field(field) => field,
            ParsedSelection::FragmentSpread(_) | ParsedSelection::InlineFragment(_) => {
                return Err(unsupported("Fragments", item.pos));
            }
        };
        reject_directives(&field.node.directives)?;

        let arguments = field
            .node
            .arguments
            .into_iter()
            .map(|(name, value)| Argument {
                name: name.node.to_string(),
                value: convert_value(value.node),
                pos: name.pos.into(),
            })
            .collect();

        selections.push(Selection {
            alias: field.node.alias.map(|alias| alias.node.to_string()),
            name: field.node.name.node.to_string(),
            arguments,
            selection_set: convert_selection_set(field.node.selection_set, depth + 1)?,
            pos: field.pos.into(),
        });
    }
    Ok(selections)
}

fn convert_type(ty: ParsedType) -> Type {
    let base = match ty.base {
        BaseType::Named(name) => Type::Named(name.to_string()),
        BaseType::List(inner) => Type::List(Box::new(convert_type(*inner))),
    };
    if ty.nullable {
        base
    } else {
        Type::NonNull(Box::new(base))
    }
}

fn convert_value(value: Value) -> Literal {
    match value {
        Value::Variable(name) => Literal::Variable(name.to_string()),
        Value::Null => Literal::Null,
        Value::Number(number) => match number.as_i64() {
            Some(i) => Literal::Int(i),
            None => Literal::Float(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Literal::String(s),
        Value::Boolean(b) => Literal::Boolean(b),
        Value::Binary(_) => Literal::Null,
        Value::Enum(name) => Literal::Enum(name.to_string()),
        Value::List(items) => Literal::List(items.into_iter().map(convert_value).collect()),
        Value::Object(fields) => Literal::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), convert_value(value)))
                .collect(),
        ),
    }
}
