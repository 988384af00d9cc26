use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind the server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface to bind the server to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

fn default_port() -> u16 {
    12345
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

/// Limits and strictness applied to every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Deepest selection nesting accepted by validation
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Reject input-object keys the input type does not declare.
    /// When false they are silently dropped.
    #[serde(default = "default_strict_input_objects")]
    pub strict_input_objects: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict_input_objects: default_strict_input_objects(),
        }
    }
}

fn default_max_depth() -> usize {
    16
}

fn default_strict_input_objects() -> bool {
    true
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be non-zero".to_string());
        }
        if self.server.bind.trim().is_empty() {
            return Err("Server bind address must not be empty".to_string());
        }
        if self.execution.max_depth == 0 {
            return Err("execution.max_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, 12345);
        assert_eq!(config.execution.max_depth, 16);
        assert!(config.execution.strict_input_objects);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_port_is_invalid() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_depth_is_invalid() {
        let mut config = Config::default();
        config.execution.max_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[execution]\nstrict_input_objects = false\n").unwrap();
        assert!(!config.execution.strict_input_objects);
        assert_eq!(config.execution.max_depth, 16);
        assert_eq!(config.server.port, 12345);
    }
}
