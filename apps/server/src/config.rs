//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Directory for uploaded media (product photos)
    pub media_dir: PathBuf,

    /// Maximum request body size in bytes (default: 10MB, photos included)
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./bodega.db".to_string())
                .into(),

            media_dir: env::var("MEDIA_DIR")
                .unwrap_or_else(|_| "./media".to_string())
                .into(),

            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| "10485760".to_string()) // 10MB
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MAX_BODY_BYTES".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only read defaults here; setting env vars would leak across tests
        let config = ServerConfig::load().unwrap();
        assert!(config.http_port > 0);
        assert!(config.max_body_bytes > 0);
    }
}
