/// The HTTP surface: GET and POST /graphql plus /health

use axum::body::{to_bytes, Body};
use axum::http::{header, Request as HttpRequest, StatusCode};
use graphlet::config::ExecutionConfig;
use graphlet::dataset::{InMemoryDataset, SharedDataset};
use graphlet::server::{router, AppState};
use serde_json::{json, Value as Json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    let schema = graphlet::tutorials::build_schema().unwrap();
    let dataset: SharedDataset = Arc::new(InMemoryDataset::seeded());
    router(Arc::new(AppState::new(schema, dataset, ExecutionConfig::default())))
}

async fn body_json(response: axum::response::Response) -> Json {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_get_query_string() {
    let uri = "/graphql?query=%7BtutorialList%7Bid%7D%7D";
    let response = app()
        .oneshot(HttpRequest::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"data": {"tutorialList": [{"id": 1}, {"id": 2}]}, "errors": []})
    );
}

#[tokio::test]
async fn test_post_mutation_is_visible_to_later_requests() {
    let app = app();
    let body = json!({
        "query": "mutation Create($id: Int!) { createTutorial(id: $id, title: \"Posted\") { id } }",
        "operationName": "Create",
        "variables": {"id": 7}
    });

    let response = app
        .clone()
        .oneshot(
            HttpRequest::post("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"],
        json!({"createTutorial": {"id": 7}})
    );

    let response = app
        .oneshot(
            HttpRequest::post("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"query": "{ tutorial(id: 7) { title } }"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["data"],
        json!({"tutorial": {"title": "Posted"}})
    );
}

#[tokio::test]
async fn test_validation_errors_still_answer_ok() {
    let response = app()
        .oneshot(
            HttpRequest::post("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"query": "{ nothing }"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], Json::Null);
    assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_without_query_is_a_parse_error() {
    let response = app()
        .oneshot(HttpRequest::get("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], Json::Null);
    assert_eq!(body["errors"][0]["extensions"]["code"], "PARSE_ERROR");
}

#[tokio::test]
async fn test_get_with_malformed_variables_reports_an_error() {
    // query Q($id: Int){tutorial(id:$id){title}} with variables={not
    let uri = "/graphql?query=query%20Q(%24id%3A%20Int)%7Btutorial(id%3A%24id)%7Btitle%7D%7D&variables=%7Bnot";
    let response = app()
        .oneshot(HttpRequest::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], Json::Null);
    assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
    assert!(body["errors"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("Variables are invalid JSON"));
}

#[tokio::test]
async fn test_post_with_malformed_body_answers_json() {
    let response = app()
        .oneshot(
            HttpRequest::post("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"query\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], Json::Null);
    assert_eq!(body["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
}
