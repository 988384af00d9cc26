/// HTTP transport
///
/// `GET /graphql?query=...` and `POST /graphql` (JSON body with `query`,
/// `variables`, `operationName`) both answer with `{data, errors}` JSON.
/// `GET /health` answers `OK`.

use crate::config::{Config, ExecutionConfig};
use crate::dataset::SharedDataset;
use crate::error::{GraphletError, Result};
use crate::execution::{ErrorKind, ExecutionError, Executor, Request, Response};
use crate::schema::Schema;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared by every request: the schema, its dataset and execution limits
pub struct AppState {
    pub schema: Schema,
    pub dataset: SharedDataset,
    pub execution: ExecutionConfig,
}

impl AppState {
    pub fn new(schema: Schema, dataset: SharedDataset, execution: ExecutionConfig) -> Self {
        Self {
            schema,
            dataset,
            execution,
        }
    }

    pub fn execute(&self, request: &Request) -> Response {
        Executor::with_config(&self.schema, self.execution.clone()).execute(request, &self.dataset)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLParams {
    /// Missing means empty, which fails to parse like any other bad request
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    /// JSON-encoded variables object
    #[serde(default)]
    pub variables: Option<String>,
}

/// Build the router serving the endpoint
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/graphql", get(graphql_get).post(graphql_post))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve until the process is stopped
pub async fn serve(config: &Config, state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .map_err(|e| {
            GraphletError::Config(format!(
                "Invalid bind address '{}:{}': {}",
                config.server.bind, config.server.port, e
            ))
        })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        GraphletError::Server(format!(
            "Failed to bind to {}: {}. Port may be in use.",
            addr, e
        ))
    })?;

    tracing::info!("GraphQL endpoint listening on http://{}/graphql", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| GraphletError::Server(e.to_string()))?;

    Ok(())
}

async fn graphql_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphQLParams>,
) -> Json<Response> {
    let mut request = Request::new(params.query);
    request.operation_name = params.operation_name;

    if let Some(raw) = params.variables.filter(|v| !v.trim().is_empty()) {
        match decode_variables(&raw) {
            Ok(variables) => request.variables = Some(variables),
            Err(message) => {
                tracing::debug!("Rejecting request: {}", message);
                return Json(request_error(message));
            }
        }
    }

    Json(run(state, request).await)
}

async fn graphql_post(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Request>, JsonRejection>,
) -> Json<Response> {
    match payload {
        Ok(Json(request)) => Json(run(state, request).await),
        Err(rejection) => {
            tracing::debug!("Rejecting request body: {}", rejection.body_text());
            Json(request_error(format!(
                "Request body is invalid: {}",
                rejection.body_text()
            )))
        }
    }
}

fn decode_variables(raw: &str) -> std::result::Result<serde_json::Map<String, serde_json::Value>, String> {
    match serde_json::from_str(raw) {
        Ok(serde_json::Value::Object(variables)) => Ok(variables),
        Ok(_) => Err("Variables must be a JSON object".to_string()),
        Err(e) => Err(format!("Variables are invalid JSON: {e}")),
    }
}

fn request_error(message: String) -> Response {
    Response::from_errors(vec![ExecutionError::new(
        ErrorKind::Validation,
        message,
        Vec::new(),
    )])
}

/// Execution is synchronous; keep it off the async workers
async fn run(state: Arc<AppState>, request: Request) -> Response {
    tracing::debug!("Executing request: {}", request.query);
    match tokio::task::spawn_blocking(move || state.execute(&request)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Request execution panicked: {}", e);
            Response::from_errors(vec![ExecutionError::new(
                ErrorKind::Resolution,
                "Internal server error",
                Vec::new(),
            )])
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
