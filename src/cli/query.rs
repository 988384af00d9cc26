use graphlet::dataset::{InMemoryDataset, SharedDataset};
use graphlet::error::{GraphletError, Result};
use graphlet::execution::{Executor, Request};
use std::sync::Arc;

/// Run the query command: execute one request against a freshly seeded dataset
pub fn run(
    query: String,
    variables: Option<String>,
    operation_name: Option<String>,
    config_path: String,
) -> Result<()> {
    let config = graphlet::config::load_or_default(&config_path)?;
    let schema = graphlet::tutorials::build_schema()?;
    let dataset: SharedDataset = Arc::new(InMemoryDataset::seeded());

    let mut request = Request::new(query);
    request.operation_name = operation_name;
    if let Some(raw) = variables {
        let parsed: serde_json::Value = serde_json::from_str(&raw)?;
        if !parsed.is_object() {
            return Err(GraphletError::Config(
                "--variables must be a JSON object".to_string(),
            ));
        }
        request = request.variables(parsed);
    }

    let response = Executor::with_config(&schema, config.execution).execute(&request, &dataset);
    if !response.is_ok() {
        tracing::warn!("Request finished with {} errors", response.errors.len());
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
