/// Type registry and schema
///
/// Scalar, object and input-object descriptors, the resolver plumbing attached
/// to fields, and the builder that validates them into an immutable `Schema`.

mod builder;
mod resolver;
mod scalars;
mod types;

pub use builder::{ConstructionError, Schema, SchemaBuilder};
pub use resolver::{FieldValue, ResolutionError, ResolverContext, ResolverFn, ResolverResult};
pub use scalars::ScalarKind;
pub use types::{Field, InputObject, InputValue, Object, TypeDescriptor, TypeRef};
