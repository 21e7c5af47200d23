//! Error types for the thinklens client core.
//!
//! Uses `thiserror` for public API error types. Validation failures block a
//! submission before any request is made; transport failures come back from the
//! analysis service or the network; configuration failures come from loading
//! layered settings.

use std::path::PathBuf;

/// Top-level error type for the thinklens core library.
#[derive(Debug, thiserror::Error)]
pub enum ThinklensError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Client-side form validation failures.
///
/// The display text is what the user sees in the alert.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter text to analyze")]
    EmptyText,

    #[error("Please select at least one thinking method")]
    NoMethodSelected,

    #[error("Text exceeds maximum size of {limit} characters ({actual} given)")]
    TextTooLong { limit: usize, actual: usize },
}

/// Failures while talking to the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Request failed: {message}")]
    Network { message: String },

    #[error("Invalid JSON in response: {message}")]
    Parse { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl TransportError {
    /// HTTP status of a server-reported failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `ThinklensError`.
pub type Result<T> = std::result::Result<T, ThinklensError>;
