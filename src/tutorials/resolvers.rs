/// Root query and mutation fields
///
/// Resolvers reach the dataset through the request data (`SharedDataset`).
/// Query resolvers only read; `createTutorial` appends under the dataset's
/// write lock and returns the new entity.

use crate::dataset::{Author, SharedDataset, Tutorial};
use crate::schema::{
    Field, FieldValue, InputValue, Object, ResolutionError, ResolverContext, ResolverResult,
    TypeRef,
};
use crate::tutorials::objects::{AUTHOR, AUTHOR_INPUT, TUTORIAL};
use crate::value::Value;

pub const ROOT_QUERY: &str = "RootQuery";
pub const ROOT_MUTATION: &str = "RootMutation";

pub fn root_query() -> Object {
    Object::new(ROOT_QUERY)
        .field(
            Field::with_resolver("tutorial", TypeRef::named(TUTORIAL), resolve_tutorial)
                .description("Get Tutorial By ID")
                .argument(InputValue::new("id", TypeRef::named(TypeRef::INT))),
        )
        .field(
            Field::with_resolver("author", TypeRef::named(AUTHOR), resolve_author)
                .description("Get Author By ID")
                .argument(InputValue::new("id", TypeRef::named(TypeRef::INT))),
        )
        .field(
            Field::with_resolver("tutorialList", TypeRef::named_list(TUTORIAL), resolve_tutorial_list)
                .description("Get Tutorial List"),
        )
        .field(
            Field::with_resolver("authorList", TypeRef::named_list(AUTHOR), resolve_author_list)
                .description("Get Author List"),
        )
}

pub fn root_mutation() -> Object {
    Object::new(ROOT_MUTATION).field(
        Field::with_resolver("createTutorial", TypeRef::named(TUTORIAL), create_tutorial)
            .description("Create a new Tutorial")
            .argument(InputValue::required("id", TypeRef::named(TypeRef::INT)))
            .argument(InputValue::new("author", TypeRef::named(AUTHOR_INPUT)))
            .argument(InputValue::required("title", TypeRef::named(TypeRef::STRING))),
    )
}

fn dataset<'a>(ctx: &ResolverContext<'a>) -> Result<&'a SharedDataset, ResolutionError> {
    ctx.data::<SharedDataset>()
}

fn resolve_tutorial(ctx: ResolverContext<'_>) -> ResolverResult {
    // no id means no match
    let Some(id) = ctx.arg("id").and_then(Value::as_i64) else {
        return Ok(FieldValue::NULL);
    };
    Ok(dataset(&ctx)?
        .find_tutorial(id)
        .map(FieldValue::owned_any)
        .unwrap_or(FieldValue::NULL))
}

fn resolve_author(ctx: ResolverContext<'_>) -> ResolverResult {
    let Some(id) = ctx.arg("id").and_then(Value::as_i64) else {
        return Ok(FieldValue::NULL);
    };
    Ok(dataset(&ctx)?
        .find_author(id)
        .map(FieldValue::owned_any)
        .unwrap_or(FieldValue::NULL))
}

fn resolve_tutorial_list(ctx: ResolverContext<'_>) -> ResolverResult {
    let tutorials = dataset(&ctx)?.tutorials();
    Ok(FieldValue::list(tutorials.into_iter().map(FieldValue::owned_any)))
}

fn resolve_author_list(ctx: ResolverContext<'_>) -> ResolverResult {
    let authors = dataset(&ctx)?.authors();
    Ok(FieldValue::list(authors.into_iter().map(FieldValue::owned_any)))
}

fn create_tutorial(ctx: ResolverContext<'_>) -> ResolverResult {
    let id = ctx
        .arg("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| ResolutionError::new("missing required argument id"))?;
    let title = ctx
        .arg("title")
        .and_then(Value::as_str)
        .ok_or_else(|| ResolutionError::new("missing required argument title"))?;
    let author = ctx.arg("author").map(author_from_input).transpose()?;

    let tutorial = Tutorial {
        id,
        title: title.to_string(),
        author,
        comments: Vec::new(),
    };

    dataset(&ctx)?
        .append(tutorial.clone().into())
        .map_err(|e| ResolutionError::new(e.to_string()))?;
    tracing::info!("Created tutorial {} ({:?})", tutorial.id, tutorial.title);

    Ok(FieldValue::owned_any(tutorial))
}

fn author_from_input(input: &Value) -> Result<Author, ResolutionError> {
    let fields = input
        .as_object()
        .ok_or_else(|| ResolutionError::new("author must be an object"))?;
    let id = fields
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| ResolutionError::new("author.id must be an Int"))?;
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ResolutionError::new("author.name must be a String"))?;

    Ok(Author {
        id,
        name: name.to_string(),
        tutorials: Vec::new(),
    })
}
