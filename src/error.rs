use crate::schema::ConstructionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphletError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Schema construction error: {0}")]
    Schema(#[from] ConstructionError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<::config::ConfigError> for GraphletError {
    fn from(err: ::config::ConfigError) -> Self {
        GraphletError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for GraphletError {
    fn from(err: toml::de::Error) -> Self {
        GraphletError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for GraphletError {
    fn from(err: toml::ser::Error) -> Self {
        GraphletError::Serialization(format!("TOML serialization error: {}", err))
    }
}

impl From<serde_json::Error> for GraphletError {
    fn from(err: serde_json::Error) -> Self {
        GraphletError::Serialization(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, GraphletError>;
