//! Error types for Prompter.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, record lookup, argument
//! validation, template rendering, and serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for Prompter.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A prompt record does not exist
    #[error("Prompt not found: {0}")]
    NotFound(String),

    /// A prompt record with the same id already exists
    #[error("Prompt already exists: {0}")]
    AlreadyExists(String),

    /// Caller supplied a value outside the accepted set
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A template placeholder has no binding
    #[error("Undefined variable: '{name}'")]
    UndefinedVariable { name: String },

    /// The provider override file exists but cannot be understood
    #[error("Malformed override source {path:?}: {reason}")]
    MalformedOverrideSource { path: PathBuf, reason: String },

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
