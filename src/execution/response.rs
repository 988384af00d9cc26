/// Request results
///
/// A response always carries `data` (possibly partial, or null when the
/// request failed before execution) and an ordered, possibly empty, list of
/// errors, each tagged with the field path it occurred at.

use crate::query::Pos;
use crate::value::Value;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Incoming request, as posted to the endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = match variables {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        };
        self
    }
}

/// One step of a response path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Which stage produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Validation,
    Coercion,
    Resolution,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "PARSE_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Coercion => "COERCION_ERROR",
            ErrorKind::Resolution => "RESOLUTION_ERROR",
        }
    }

    /// Whether this kind of error fails the whole request
    pub fn is_request_error(&self) -> bool {
        matches!(self, ErrorKind::Parse | ErrorKind::Validation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionError {
    pub message: String,
    /// Source positions, set for parse and validation errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Pos>,
    pub path: Vec<PathSegment>,
    #[serde(rename = "extensions", serialize_with = "serialize_kind")]
    pub kind: ErrorKind,
}

fn serialize_kind<S: Serializer>(kind: &ErrorKind, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Extensions {
        code: &'static str,
    }
    Extensions { code: kind.code() }.serialize(serializer)
}

impl ExecutionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path,
            kind,
        }
    }

    pub fn with_location(mut self, pos: Pos) -> Self {
        self.locations.push(pos);
        self
    }

    /// Dotted form of the path, e.g. `tutorialList.1.author`
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (at {})", self.message, self.path_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub data: Option<Value>,
    pub errors: Vec<ExecutionError>,
}

impl Response {
    /// Whole-request failure: no data
    pub fn from_errors(errors: Vec<ExecutionError>) -> Self {
        Self { data: None, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
