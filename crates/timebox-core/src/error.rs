//! Core error types for timebox-core.
//!
//! Conflicts, overload and burnout streaks are reported as result values by
//! the reasoning modules. The types here cover what is actually a failure:
//! malformed input, configuration problems and collaborator errors.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timebox-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Activity store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The external reasoning service failed or returned garbage
    #[error("Reasoning service error: {message}")]
    Reasoner {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Audit sink rejected an entry
    #[error("Audit error: {0}")]
    Audit(String),

    /// Per-user request budget exhausted
    #[error("Too many requests, retry after {reset_at}")]
    Throttled { reset_at: DateTime<Utc> },

    /// Activity not found for this owner
    #[error("Activity not found: {id}")]
    NotFound { id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Wrap a reasoning-service failure.
    pub fn reasoner(message: impl Into<String>) -> Self {
        CoreError::Reasoner {
            message: message.into(),
            source: None,
        }
    }
}

/// Validation errors.
///
/// These mirror the caller-side preconditions of the reasoning modules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Day window with start at or after end
    #[error("Invalid day window: day_end ({end}) must be greater than day_start ({start})")]
    InvalidDayWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Priority outside 1..=5
    #[error("Invalid priority {0}: must be between 1 and 5")]
    InvalidPriority(u8),

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Activity store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend could not be reached or failed the query
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store state is poisoned or locked
    #[error("Store is locked")]
    Locked,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
