/// Object and input types of the tutorial schema
///
/// Each object type is an accessor table: field name to a typed extraction
/// from the entity it wraps.

use crate::dataset::{Author, Comment, Tutorial};
use crate::schema::{Field, FieldValue, InputObject, InputValue, Object, TypeRef};

pub const TUTORIAL: &str = "Tutorial";
pub const AUTHOR: &str = "Author";
pub const COMMENT: &str = "Comment";
pub const AUTHOR_INPUT: &str = "AuthorInput";

pub fn tutorial_type() -> Object {
    Object::new(TUTORIAL)
        .field(Field::accessor("id", TypeRef::named(TypeRef::INT), |t: &Tutorial| {
            FieldValue::value(t.id)
        }))
        .field(Field::accessor("title", TypeRef::named(TypeRef::STRING), |t: &Tutorial| {
            FieldValue::value(t.title.clone())
        }))
        .field(Field::accessor("author", TypeRef::named(AUTHOR), |t: &Tutorial| {
            t.author
                .clone()
                .map(FieldValue::owned_any)
                .unwrap_or(FieldValue::NULL)
        }))
        .field(Field::accessor("comments", TypeRef::named_list(COMMENT), |t: &Tutorial| {
            FieldValue::list(t.comments.iter().cloned().map(FieldValue::owned_any))
        }))
}

pub fn author_type() -> Object {
    Object::new(AUTHOR)
        .field(Field::accessor("id", TypeRef::named(TypeRef::INT), |a: &Author| {
            FieldValue::value(a.id)
        }))
        .field(Field::accessor("name", TypeRef::named(TypeRef::STRING), |a: &Author| {
            FieldValue::value(a.name.clone())
        }))
        .field(Field::accessor("tutorials", TypeRef::named_list(TypeRef::INT), |a: &Author| {
            FieldValue::value(a.tutorials.clone())
        }))
}

/// Comment bodies are exposed as `Body`, matching the published API
pub fn comment_type() -> Object {
    Object::new(COMMENT).field(Field::accessor(
        "Body",
        TypeRef::named(TypeRef::STRING),
        |c: &Comment| FieldValue::value(c.body.clone()),
    ))
}

pub fn author_input() -> InputObject {
    InputObject::new(AUTHOR_INPUT)
        .field(InputValue::required("id", TypeRef::named(TypeRef::INT)))
        .field(InputValue::required("name", TypeRef::named(TypeRef::STRING)))
}
