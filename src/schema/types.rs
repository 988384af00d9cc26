/// Type descriptors
///
/// Object, input-object and scalar descriptors, plus the `TypeRef` used by
/// fields and arguments to point at them by name. Referring by name is what
/// lets object types form cycles (a `Tutorial` has an `Author` that could list
/// `Tutorial`s) while each descriptor is still built exactly once.

use crate::schema::resolver::{FieldValue, ResolverContext, ResolverFn, ResolverResult};
use crate::schema::scalars::ScalarKind;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Reference to a type by name, possibly wrapped in a list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub const INT: &'static str = "Int";
    pub const FLOAT: &'static str = "Float";
    pub const STRING: &'static str = "String";
    pub const BOOLEAN: &'static str = "Boolean";
    pub const ID: &'static str = "ID";

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn named_list(name: impl Into<String>) -> Self {
        TypeRef::List(Box::new(TypeRef::Named(name.into())))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Name of the innermost named type
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

/// A registered type
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Object(Object),
    InputObject(InputObject),
}

impl TypeDescriptor {
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Scalar(kind) => kind.name(),
            TypeDescriptor::Object(object) => &object.name,
            TypeDescriptor::InputObject(input) => &input.name,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, TypeDescriptor::Scalar(_) | TypeDescriptor::InputObject(_))
    }

    pub fn is_output(&self) -> bool {
        matches!(self, TypeDescriptor::Scalar(_) | TypeDescriptor::Object(_))
    }
}

impl From<Object> for TypeDescriptor {
    fn from(object: Object) -> Self {
        TypeDescriptor::Object(object)
    }
}

impl From<InputObject> for TypeDescriptor {
    fn from(input: InputObject) -> Self {
        TypeDescriptor::InputObject(input)
    }
}

/// Argument or input-object field descriptor
#[derive(Debug, Clone)]
pub struct InputValue {
    pub name: String,
    pub ty: TypeRef,
    /// Non-null: the value must be supplied
    pub required: bool,
    pub description: Option<String>,
}

impl InputValue {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            description: None,
        }
    }

    pub fn required(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            required: true,
            ..Self::new(name, ty)
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Field descriptor. Belongs to exactly one object type.
#[derive(Clone)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
    pub arguments: IndexMap<String, InputValue>,
    resolver: Option<ResolverFn>,
}

impl Field {
    /// Field without a resolver: resolved by looking its name up on a plain
    /// object parent, null when absent
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            arguments: IndexMap::new(),
            resolver: None,
        }
    }

    /// Field with an explicit resolver
    pub fn with_resolver<F>(name: impl Into<String>, ty: TypeRef, resolver: F) -> Self
    where
        F: for<'a> Fn(ResolverContext<'a>) -> ResolverResult + Send + Sync + 'static,
    {
        Self {
            resolver: Some(Arc::new(resolver)),
            ..Self::new(name, ty)
        }
    }

    /// Field reading a typed parent `T` through an extraction function
    pub fn accessor<T, F>(name: impl Into<String>, ty: TypeRef, extract: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> FieldValue + Send + Sync + 'static,
    {
        Self::with_resolver(name, ty, move |ctx: ResolverContext<'_>| {
            let parent = ctx.parent_value.try_downcast_ref::<T>()?;
            Ok(extract(parent))
        })
    }

    pub fn argument(mut self, argument: InputValue) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Invoke the resolver, or fall back to structural access on the parent
    pub fn resolve(&self, ctx: ResolverContext<'_>) -> ResolverResult {
        match &self.resolver {
            Some(resolver) => resolver(ctx),
            None => Ok(default_resolve(ctx)),
        }
    }
}

fn default_resolve(ctx: ResolverContext<'_>) -> FieldValue {
    match ctx.parent_value {
        FieldValue::Value(crate::value::Value::Object(map)) => map
            .get(ctx.field_name)
            .cloned()
            .map(FieldValue::Value)
            .unwrap_or(FieldValue::NULL),
        _ => FieldValue::NULL,
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("arguments", &self.arguments)
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Object type: an ordered field map
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, Field>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.name
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}

/// Input object type: an ordered map of input fields
#[derive(Debug, Clone)]
pub struct InputObject {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, InputValue>,
}

impl InputObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    pub fn field(mut self, field: InputValue) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Map, Value};

    struct Book {
        title: String,
    }

    #[test]
    fn test_type_ref_display() {
        assert_eq!(TypeRef::named_list("Tutorial").to_string(), "[Tutorial]");
        assert_eq!(TypeRef::list(TypeRef::named_list("Int")).base_name(), "Int");
    }

    #[test]
    fn test_default_resolver_reads_plain_objects() {
        let field = Field::new("name", TypeRef::named(TypeRef::STRING));
        let mut parent = Map::new();
        parent.insert("name".to_string(), Value::from("Ada"));
        let parent = FieldValue::Value(Value::Object(parent));
        let args = Map::new();

        let ctx = ResolverContext::new("name", &parent, &args, &());
        match field.resolve(ctx).unwrap() {
            FieldValue::Value(v) => assert_eq!(v, Value::from("Ada")),
            other => panic!("unexpected {other:?}"),
        }

        let ctx = ResolverContext::new("missing", &parent, &args, &());
        assert!(field.resolve(ctx).unwrap().is_null());
    }

    #[test]
    fn test_accessor_extracts_typed_parent() {
        let field = Field::accessor("title", TypeRef::named(TypeRef::STRING), |b: &Book| {
            FieldValue::value(b.title.clone())
        });
        let parent = FieldValue::owned_any(Book {
            title: "Rust".to_string(),
        });
        let args = Map::new();

        let ctx = ResolverContext::new("title", &parent, &args, &());
        match field.resolve(ctx).unwrap() {
            FieldValue::Value(v) => assert_eq!(v, Value::from("Rust")),
            other => panic!("unexpected {other:?}"),
        }

        let wrong = FieldValue::value(1);
        let ctx = ResolverContext::new("title", &wrong, &args, &());
        assert!(field.resolve(ctx).is_err());
    }

    #[test]
    fn test_object_preserves_field_order() {
        let object = Object::new("Tutorial")
            .field(Field::new("id", TypeRef::named(TypeRef::INT)))
            .field(Field::new("title", TypeRef::named(TypeRef::STRING)))
            .field(Field::new("author", TypeRef::named("Author")));
        let names: Vec<_> = object.fields.keys().cloned().collect();
        assert_eq!(names, vec!["id", "title", "author"]);
    }
}
