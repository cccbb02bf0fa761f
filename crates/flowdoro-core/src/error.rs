//! Core error types for flowdoro-core.
//!
//! Validation failures are the only errors a user ever sees during an
//! operation. Store failures are logged and swallowed by the components
//! that hit them, so they only surface when a store is opened. Front ends
//! collect everything into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for flowdoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected user input
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Key/value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML rendering errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Validation errors.
///
/// The display text doubles as the notification shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A focus or break duration of zero or less
    #[error("Duration must be greater than 0")]
    NonPositiveDuration { field: &'static str, value: i64 },

    /// A duration above its upper bound
    #[error("Duration exceeds maximum limit")]
    DurationExceedsMaximum {
        field: &'static str,
        value: i64,
        max: u32,
    },

    /// A task name that is blank after trimming
    #[error("Task name cannot be empty")]
    EmptyTaskName,
}

/// Key/value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a known setting
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
