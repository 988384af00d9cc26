use graphlet::dataset::{InMemoryDataset, SharedDataset};
use graphlet::error::Result;
use graphlet::server::{self, AppState};
use std::sync::Arc;

/// Run the serve command to start the GraphQL server
pub async fn run(config_path: String, port: Option<u16>) -> Result<()> {
    tracing::info!("📖 Loading configuration from {}", config_path);

    let mut config = graphlet::config::load_or_default(&config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("🔧 Building GraphQL schema...");
    let schema = graphlet::tutorials::build_schema()?;

    let dataset: SharedDataset = Arc::new(InMemoryDataset::seeded());
    tracing::info!("✅ Schema built, dataset seeded");
    tracing::info!("💡 Press Ctrl+C to stop the server");

    let state = Arc::new(AppState::new(schema, dataset, config.execution.clone()));
    server::serve(&config, state).await
}
