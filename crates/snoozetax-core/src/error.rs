//! Core error types for snoozetax-core.
//!
//! Domain operations on the alarm and the ledger never fail; they return
//! `None` when a guard turns them into a no-op. The errors below cover the
//! edges: persistence, configuration, outbound collaborators, and parsing
//! user input.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for snoozetax-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Payment link errors
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
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

    /// A stored value exists but cannot be decoded
    #[error("Stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
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

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Errors reported by a notification scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The host refused to deliver notifications
    #[error("Notification authorization denied")]
    AuthorizationDenied,
}

/// Payment link errors.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The link could not be built
    #[error("Invalid payment URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Neither the deep link nor the web fallback could be opened
    #[error("Failed to open payment link: {0}")]
    OpenFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unparseable time of day
    #[error("Invalid alarm time '{0}': expected HH:MM or H:MM AM/PM")]
    InvalidTime(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
