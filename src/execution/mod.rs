/// Query execution
///
/// Argument coercion, request validation, the depth-first executor and the
/// response shape it assembles.

mod coerce;
mod executor;
mod response;
mod validate;

pub use coerce::{resolve_literal, Coercer, CoercionError};
pub use executor::Executor;
pub use response::{ErrorKind, ExecutionError, PathSegment, Request, Response};
pub use validate::{ValidationError, Validator};
