mod types;

pub use types::{Config, ExecutionConfig, ServerConfig};

use crate::error::{GraphletError, Result};
use std::fs;
use std::path::Path;

/// Environment variable prefix for overrides, e.g. `GRAPHLET_SERVER__PORT`
pub const ENV_PREFIX: &str = "GRAPHLET";

/// Load configuration from a TOML file, with environment overrides
pub fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        return Err(GraphletError::Config(format!(
            "Failed to read config file '{}': file not found",
            path
        )));
    }
    build(path, true)
}

/// Load configuration if the file exists, otherwise start from defaults
pub fn load_or_default(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        build(path, true)
    } else {
        tracing::warn!("Config file '{}' not found, using defaults", path);
        build(path, false)
    }
}

fn build(path: &str, required: bool) -> Result<Config> {
    let settings = ::config::Config::builder()
        .add_source(
            ::config::File::new(path, ::config::FileFormat::Toml).required(required),
        )
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate().map_err(GraphletError::Config)?;

    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &Config, path: &str) -> Result<()> {
    config.validate().map_err(GraphletError::Config)?;

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)
        .map_err(|e| GraphletError::Config(format!("Failed to write config file '{}': {}", path, e)))?;

    Ok(())
}
