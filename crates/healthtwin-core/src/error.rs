//! Core error types for healthtwin-core.
//!
//! The page runtime itself never fails: bad selections are ignored and bad
//! sign-up input becomes a notification. Errors surface only where a caller
//! hands us configuration or construction input we cannot work with.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for healthtwin-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors for construction input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Zero-length interval where a positive one is required
    #[error("Interval '{field}' must be greater than zero")]
    ZeroInterval { field: String },
}

/// Reasons a sign-up submission is rejected before it starts.
///
/// The `Display` text is exactly what the error banner shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignupError {
    #[error("Please enter your email address")]
    EmptyEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
