//! Application-wide error types.
//!
//! Every variant is fatal at startup; nothing in the crate recovers from them.

use thiserror::Error;

use crate::config::Kind;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing required configuration: {key}")]
    MissingRequiredConfiguration { key: String },

    #[error("type conversion error for {key}: expected {expected}, got {found}")]
    TypeConversion {
        key: String,
        expected: Kind,
        found: String,
    },

    #[error("cannot construct resource gated by {key}: {reason}")]
    ConditionalResourceConstruction { key: String, reason: String },

    #[error("invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("env file error: {0}")]
    EnvFile(String),

    #[error("settings already initialized")]
    AlreadyInitialized,

    #[error("settings not initialized")]
    NotInitialized,

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub(crate) fn missing(key: &str) -> Self {
        AppError::MissingRequiredConfiguration { key: key.to_string() }
    }
}
