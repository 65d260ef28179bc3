use std::io;

/// Errors that can occur while running pulumi actions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input field is missing or malformed. Raised before any
    /// external call is made.
    #[error("{0}")]
    InputError(String),

    #[error("Command `{command}` failed with exit code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: String,
        stderr: String,
    },

    #[error("Output '{0}' not found in update result")]
    OutputNotFound(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Automation error: {0}")]
    AutomationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error was caused by the caller's input rather than by an
    /// external system
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InputError(_))
    }
}

/// Result type alias for pulumi-actions operations
pub type Result<T> = std::result::Result<T, Error>;
