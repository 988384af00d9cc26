/// Request language
///
/// Turns a request string into a selection tree. Grammar and tokenizing come
/// from `async-graphql-parser`. Any syntax problem, and any construct the
/// executor does not run, is a `ParseError` and fails the whole request.

pub mod ast;
mod parser;

pub use ast::{Argument, Document, Literal, Operation, OperationKind, Pos, Selection, Type};
pub use parser::parse_document;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Syntax Error at {line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            line: pos.line,
            column: pos.column,
        }
    }
}
