//! Error types for the switchconf core
//!
//! Every failure here is local and recoverable. Callers surface them to the
//! host through a result or a log line, never by aborting.

use thiserror::Error;

/// Result type alias for switchconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// No provider is registered for the requested section key
    #[error("No configuration known for {0}")]
    NotFound(String),

    /// The provider exists but has no document logic
    #[error("Rendering not implemented for {0}")]
    NotImplemented(String),

    /// The module is already in the requested state
    #[error("Already {state} {module}")]
    AlreadyInState {
        /// Module name
        module: String,
        /// State the module is already in ("loaded" or "unloaded")
        state: &'static str,
    },

    /// The module was never registered or reported
    #[error("Unknown module {0}")]
    UnknownTarget(String),

    /// Malformed input rejected at the boundary (masks, prefixes, headers)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// XML serialization failure
    #[error("Render error: {0}")]
    Render(String),

    /// I/O errors (profile files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Create a "not implemented" error
    pub fn not_implemented(key: impl Into<String>) -> Self {
        Self::NotImplemented(key.into())
    }

    /// Create an "already in state" error
    pub fn already_in_state(module: impl Into<String>, state: &'static str) -> Self {
        Self::AlreadyInState {
            module: module.into(),
            state,
        }
    }

    /// Create an "unknown target" error
    pub fn unknown_target(module: impl Into<String>) -> Self {
        Self::UnknownTarget(module.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
