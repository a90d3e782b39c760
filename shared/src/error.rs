//! Error types for the event announcement Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a request.
#[derive(Error, Debug)]
pub enum Error {
    /// AWS SDK error that has no more specific classification
    #[error("AWS error: {0}")]
    Aws(String),

    /// The table's provisioned throughput was exceeded
    #[error("Throughput exceeded: {0}")]
    ThroughputExceeded(String),

    /// The configured table (or topic) does not exist
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
