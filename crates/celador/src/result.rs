//! Result and error types for Celador.

use thiserror::Error;

/// Result type for Celador operations
pub type CeladorResult<T> = Result<T, CeladorError>;

/// Errors that can occur in Celador
#[derive(Debug, Error)]
pub enum CeladorError {
    /// Session construction failed
    #[error("Failed to construct session: {message}")]
    SessionConstruction {
        /// Error message
        message: String,
    },

    /// Required environment variable is not set
    #[error("Required environment variable {name} is not set")]
    MissingEnv {
        /// Variable name
        name: String,
    },

    /// Environment variable holds a value that cannot be parsed
    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv {
        /// Variable name
        name: String,
        /// Offending value
        value: String,
    },

    /// No session factory registered under the requested key
    #[error("No driver registered under key '{key}'")]
    UnknownDriver {
        /// Registry key
        key: String,
    },

    /// Polled condition did not produce a result before the deadline
    #[error("Timed out after {ms}ms waiting for {waiting_for}")]
    ConditionTimeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the polled condition
        waiting_for: String,
    },

    /// Session close failed (best-effort; the lifecycle manager swallows this)
    #[error("Failed to close session: {message}")]
    SessionClose {
        /// Error message
        message: String,
    },

    /// Test body failure
    #[error("Test failed: {message}")]
    TestFailure {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
