pub mod config;
pub mod dataset;
pub mod error;
pub mod execution;
pub mod query;
pub mod schema;
pub mod server;
pub mod tutorials;
pub mod value;

// Re-export commonly used types
pub use config::{Config, ExecutionConfig, ServerConfig};
pub use dataset::{Dataset, InMemoryDataset, SharedDataset};
pub use error::{GraphletError, Result};
pub use execution::{Executor, Request, Response};
pub use schema::{Schema, SchemaBuilder};
pub use value::Value;
