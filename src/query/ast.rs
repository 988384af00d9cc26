/// Selection tree produced by the parser

use serde::Serialize;
use std::fmt;

/// Line/column in the request source, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub variables: Vec<VariableDefinition>,
    pub selection_set: Vec<Selection>,
    pub pos: Pos,
}

/// `$name: Type = default`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: Type,
    pub default_value: Option<Literal>,
    pub pos: Pos,
}

/// Type annotation on a variable definition
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Named(String),
    List(Box<Type>),
    NonNull(Box<Type>),
}

impl Type {
    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => write!(f, "{name}"),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A single field selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<Argument>,
    pub selection_set: Vec<Selection>,
    pub pos: Pos,
}

impl Selection {
    /// Key under which the field appears in the response
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Same field, same arguments in any order, same sub-selection;
    /// positions ignored
    pub fn same_shape(&self, other: &Selection) -> bool {
        self.name == other.name
            && self.arguments.len() == other.arguments.len()
            && self.arguments.iter().all(|a| {
                other
                    .arguments
                    .iter()
                    .any(|b| a.name == b.name && a.value == b.value)
            })
            && self.selection_set.len() == other.selection_set.len()
            && self
                .selection_set
                .iter()
                .zip(&other.selection_set)
                .all(|(a, b)| a.response_key() == b.response_key() && a.same_shape(b))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Literal,
    pub pos: Pos,
}

/// Raw input value as written in the request
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<Literal>),
    Object(Vec<(String, Literal)>),
    Variable(String),
}

impl Literal {
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Int(_) => "Int",
            Literal::Float(_) => "Float",
            Literal::String(_) => "String",
            Literal::Boolean(_) => "Boolean",
            Literal::Enum(_) => "Enum",
            Literal::List(_) => "List",
            Literal::Object(_) => "Object",
            Literal::Variable(_) => "Variable",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::query::parse_document;

    fn selections(source: &str) -> Vec<super::Selection> {
        let mut doc = parse_document(source).unwrap();
        doc.operations.remove(0).selection_set
    }

    #[test]
    fn test_same_shape_ignores_argument_order() {
        let s = selections("{ f(a: 1, b: 2) { id } f(b: 2, a: 1) { id } }");
        assert!(s[0].same_shape(&s[1]));
    }

    #[test]
    fn test_same_shape_compares_values_and_subfields() {
        let s = selections("{ f(a: 1) { id } f(a: 2) { id } f(a: 1) { title } f(a: 1, b: 2) { id } }");
        assert!(!s[0].same_shape(&s[1]));
        assert!(!s[0].same_shape(&s[2]));
        assert!(!s[0].same_shape(&s[3]));
    }
}
