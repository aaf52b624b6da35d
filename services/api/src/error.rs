//! services/api/src/error.rs
//!
//! Errors that stop the service binaries before or while serving.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connecting to SQLite or applying migrations failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Binding the listener, serving, or writing the OpenAPI document failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not render the OpenAPI document: {0}")]
    OpenApi(#[from] serde_json::Error),

    #[error("Invalid CORS origin '{origin}': {reason}")]
    InvalidCorsOrigin { origin: String, reason: String },
}
