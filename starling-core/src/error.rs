//! Error types for Starling

use thiserror::Error;

/// Result type alias for Starling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Starling operations
#[derive(Error, Debug)]
pub enum Error {
    /// The review request itself was malformed; nothing was spawned
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The model process exited with a non-zero status
    #[error("Model process for '{model}' failed: {stderr}")]
    Process {
        /// Model identifier the process was started with
        model: String,
        /// Captured stderr of the failed process
        stderr: String,
    },

    /// The model process exited cleanly but its output yielded no usable review
    #[error("Failed to extract review from model output: {reason}")]
    Extraction {
        /// Why extraction failed
        reason: String,
        /// Raw captured stdout, kept for diagnosis
        raw: String,
    },

    /// The configured wall-clock deadline for one invocation elapsed
    #[error("Model process for '{model}' timed out after {elapsed:?}")]
    Timeout {
        /// Model identifier the process was started with
        model: String,
        /// The deadline that elapsed
        elapsed: std::time::Duration,
    },

    /// The runner executable could not be started
    #[error("Failed to start model runner: {0}")]
    Spawn(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Diagnostic payload carried by this error, if any.
    ///
    /// For process failures this is the captured stderr; for extraction
    /// failures it is the raw model output. Surfaced to callers as the
    /// `details` field of an aggregate batch failure.
    pub fn details(&self) -> Option<&str> {
        match self {
            Error::Process { stderr, .. } => Some(stderr),
            Error::Extraction { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
