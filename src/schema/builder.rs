/// Schema construction
///
/// `SchemaBuilder` collects a root query type, an optional root mutation type
/// and every other type they reference, then `finish` checks the whole graph
/// once and hands back an immutable [`Schema`]. The schema instance is the
/// only namespace; there is no global registry.

use crate::schema::scalars::ScalarKind;
use crate::schema::types::{InputObject, Object, TypeDescriptor, TypeRef};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("Type '{0}' is registered more than once")]
    DuplicateType(String),

    #[error("Root type '{0}' must define at least one field")]
    EmptyRootType(String),

    #[error("Field '{field}' refers to unknown type '{type_name}'")]
    UnknownType { field: String, type_name: String },

    #[error("Field '{field}' has type '{type_name}', which is not an output type")]
    InvalidFieldType { field: String, type_name: String },

    #[error("Argument '{argument}' has type '{type_name}'; arguments must be a scalar or input object")]
    InvalidArgumentType { argument: String, type_name: String },

    #[error("Input field '{field}' has type '{type_name}'; input fields must be a scalar or input object")]
    InvalidInputFieldType { field: String, type_name: String },
}

/// Immutable, validated schema
#[derive(Debug, Clone)]
pub struct Schema {
    /// Every registered type, roots included
    types: IndexMap<String, TypeDescriptor>,
    query: String,
    mutation: Option<String>,
    query_index: usize,
}

impl Schema {
    /// Start building a schema around its root query type
    pub fn build(query: Object) -> SchemaBuilder {
        SchemaBuilder::new(query)
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&Object> {
        match self.types.get(name) {
            Some(TypeDescriptor::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn input_object(&self, name: &str) -> Option<&InputObject> {
        match self.types.get(name) {
            Some(TypeDescriptor::InputObject(input)) => Some(input),
            _ => None,
        }
    }

    pub fn query_type(&self) -> &Object {
        match self.types.get_index(self.query_index) {
            Some((_, TypeDescriptor::Object(object))) => object,
            _ => unreachable!("root query type '{}' is always an object", self.query),
        }
    }

    pub fn mutation_type(&self) -> Option<&Object> {
        self.mutation.as_deref().and_then(|name| self.object(name))
    }

    /// All registered types, built-in scalars first, in registration order
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }
}

/// Collects type descriptors for a [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    query: Object,
    mutation: Option<Object>,
    types: Vec<TypeDescriptor>,
}

impl SchemaBuilder {
    pub fn new(query: Object) -> Self {
        Self {
            query,
            mutation: None,
            types: Vec::new(),
        }
    }

    /// Set the root mutation type
    pub fn mutation(mut self, mutation: Object) -> Self {
        self.mutation = Some(mutation);
        self
    }

    /// Register a non-root object or input object type
    pub fn register(mut self, ty: impl Into<TypeDescriptor>) -> Self {
        self.types.push(ty.into());
        self
    }

    /// Validate the collected types and produce the schema
    pub fn finish(self) -> Result<Schema, ConstructionError> {
        let query_name = self.query.name.clone();
        let mutation_name = self.mutation.as_ref().map(|m| m.name.clone());

        if self.query.fields.is_empty() {
            return Err(ConstructionError::EmptyRootType(query_name));
        }
        if let Some(mutation) = &self.mutation {
            if mutation.fields.is_empty() {
                return Err(ConstructionError::EmptyRootType(mutation.name.clone()));
            }
        }

        let mut types: IndexMap<String, TypeDescriptor> = ScalarKind::ALL
            .iter()
            .map(|kind| (kind.name().to_string(), TypeDescriptor::Scalar(*kind)))
            .collect();

        let roots = std::iter::once(self.query).chain(self.mutation).map(TypeDescriptor::Object);
        for ty in roots.chain(self.types) {
            let name = ty.name().to_string();
            if types.contains_key(&name) {
                return Err(ConstructionError::DuplicateType(name));
            }
            types.insert(name, ty);
        }

        for ty in types.values() {
            match ty {
                TypeDescriptor::Scalar(_) => {}
                TypeDescriptor::Object(object) => check_object(&types, object)?,
                TypeDescriptor::InputObject(input) => check_input_object(&types, input)?,
            }
        }

        tracing::debug!(
            "Schema built with {} types (query: {}, mutation: {:?})",
            types.len(),
            query_name,
            mutation_name
        );

        Ok(Schema {
            types,
            query: query_name,
            mutation: mutation_name,
            query_index: ScalarKind::ALL.len(),
        })
    }
}

fn check_object(
    types: &IndexMap<String, TypeDescriptor>,
    object: &Object,
) -> Result<(), ConstructionError> {
    for field in object.fields.values() {
        let field_path = format!("{}.{}", object.name, field.name);
        let target = types.get(field.ty.base_name()).ok_or_else(|| {
            ConstructionError::UnknownType {
                field: field_path.clone(),
                type_name: field.ty.base_name().to_string(),
            }
        })?;
        if !target.is_output() {
            return Err(ConstructionError::InvalidFieldType {
                field: field_path,
                type_name: field.ty.to_string(),
            });
        }

        for argument in field.arguments.values() {
            let argument_path = format!("{}({})", field_path, argument.name);
            check_input_type(types, &argument.ty).map_err(|type_name| {
                ConstructionError::InvalidArgumentType {
                    argument: argument_path,
                    type_name,
                }
            })?;
        }
    }
    Ok(())
}

fn check_input_object(
    types: &IndexMap<String, TypeDescriptor>,
    input: &InputObject,
) -> Result<(), ConstructionError> {
    for field in input.fields.values() {
        check_input_type(types, &field.ty).map_err(|type_name| {
            ConstructionError::InvalidInputFieldType {
                field: format!("{}.{}", input.name, field.name),
                type_name,
            }
        })?;
    }
    Ok(())
}

/// Inputs must be a named scalar or input object; lists are not accepted
fn check_input_type(
    types: &IndexMap<String, TypeDescriptor>,
    ty: &TypeRef,
) -> Result<(), String> {
    match ty {
        TypeRef::Named(name) => match types.get(name) {
            Some(target) if target.is_input() => Ok(()),
            _ => Err(name.clone()),
        },
        TypeRef::List(_) => Err(ty.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{Field, InputValue};

    fn author_type() -> Object {
        Object::new("Author")
            .field(Field::new("id", TypeRef::named(TypeRef::INT)))
            .field(Field::new("name", TypeRef::named(TypeRef::STRING)))
            .field(Field::new("tutorials", TypeRef::named_list("Tutorial")))
    }

    fn tutorial_type() -> Object {
        Object::new("Tutorial")
            .field(Field::new("id", TypeRef::named(TypeRef::INT)))
            .field(Field::new("author", TypeRef::named("Author")))
    }

    fn query() -> Object {
        Object::new("Query").field(
            Field::new("tutorial", TypeRef::named("Tutorial"))
                .argument(InputValue::new("id", TypeRef::named(TypeRef::INT))),
        )
    }

    #[test]
    fn test_cyclic_object_types_are_allowed() {
        let schema = Schema::build(query())
            .register(tutorial_type())
            .register(author_type())
            .finish()
            .unwrap();

        assert_eq!(schema.query_type().name, "Query");
        assert!(schema.mutation_type().is_none());
        assert!(schema.object("Author").is_some());
        assert!(matches!(schema.get_type("Int"), Some(TypeDescriptor::Scalar(ScalarKind::Int))));
    }

    #[test]
    fn test_unknown_field_type_fails() {
        let err = Schema::build(query()).finish().unwrap_err();
        assert_eq!(
            err,
            ConstructionError::UnknownType {
                field: "Query.tutorial".to_string(),
                type_name: "Tutorial".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_root_fails() {
        let err = Schema::build(Object::new("Query")).finish().unwrap_err();
        assert_eq!(err, ConstructionError::EmptyRootType("Query".to_string()));

        let err = Schema::build(query())
            .mutation(Object::new("Mutation"))
            .register(tutorial_type())
            .register(author_type())
            .finish()
            .unwrap_err();
        assert_eq!(err, ConstructionError::EmptyRootType("Mutation".to_string()));
    }

    #[test]
    fn test_object_argument_type_fails() {
        let query = Object::new("Query").field(
            Field::new("tutorial", TypeRef::named("Tutorial"))
                .argument(InputValue::new("author", TypeRef::named("Author"))),
        );
        let err = Schema::build(query)
            .register(tutorial_type())
            .register(author_type())
            .finish()
            .unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidArgumentType { .. }));
    }

    #[test]
    fn test_list_argument_type_fails() {
        let query = Object::new("Query").field(
            Field::new("ids", TypeRef::named_list(TypeRef::INT))
                .argument(InputValue::new("in", TypeRef::named_list(TypeRef::INT))),
        );
        let err = Schema::build(query).finish().unwrap_err();
        assert_eq!(
            err,
            ConstructionError::InvalidArgumentType {
                argument: "Query.ids(in)".to_string(),
                type_name: "[Int]".to_string(),
            }
        );
    }

    #[test]
    fn test_input_object_as_field_type_fails() {
        let query = Object::new("Query")
            .field(Field::new("author", TypeRef::named("AuthorInput")));
        let err = Schema::build(query)
            .register(InputObject::new("AuthorInput"))
            .finish()
            .unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidFieldType { .. }));
    }

    #[test]
    fn test_duplicate_type_names_fail() {
        let err = Schema::build(query())
            .register(tutorial_type())
            .register(tutorial_type())
            .register(author_type())
            .finish()
            .unwrap_err();
        assert_eq!(err, ConstructionError::DuplicateType("Tutorial".to_string()));

        let err = Schema::build(query())
            .register(InputObject::new("String"))
            .finish()
            .unwrap_err();
        assert_eq!(err, ConstructionError::DuplicateType("String".to_string()));
    }
}
