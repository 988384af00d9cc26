/// The tutorial API
///
/// Binds the tutorial/author/comment dataset to a schema: `RootQuery` with
/// lookups by id and full lists, `RootMutation` with `createTutorial`.

mod objects;
mod resolvers;

pub use objects::{author_input, author_type, comment_type, tutorial_type};
pub use resolvers::{root_mutation, root_query, ROOT_MUTATION, ROOT_QUERY};

use crate::schema::{ConstructionError, Schema};

/// Build the tutorial schema
pub fn build_schema() -> Result<Schema, ConstructionError> {
    let schema = Schema::build(root_query())
        .mutation(root_mutation())
        .register(tutorial_type())
        .register(author_type())
        .register(comment_type())
        .register(author_input())
        .finish()?;

    tracing::info!("Tutorial schema built");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builds() {
        let schema = build_schema().unwrap();
        assert_eq!(schema.query_type().name, ROOT_QUERY);
        assert_eq!(schema.mutation_type().unwrap().name, ROOT_MUTATION);

        let fields: Vec<_> = schema.query_type().fields.keys().cloned().collect();
        assert_eq!(fields, vec!["tutorial", "author", "tutorialList", "authorList"]);

        let create = schema.mutation_type().unwrap().get_field("createTutorial").unwrap();
        let args: Vec<_> = create.arguments.keys().cloned().collect();
        assert_eq!(args, vec!["id", "author", "title"]);
        assert!(create.arguments["id"].required);
        assert!(!create.arguments["author"].required);
    }
}
