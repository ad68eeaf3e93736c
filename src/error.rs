//! Error types for the Coincast application.

use thiserror::Error;

/// The main error type for Coincast.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/TUI related errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Transport failure: the request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote answered with a non-success status.
    #[error("Remote error {status}: {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Response detail or body text.
        message: String,
    },

    /// Malformed response payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}

impl Error {
    /// Create a new terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new remote error.
    pub fn remote(status: u16, msg: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: msg.into(),
        }
    }

    /// Check if this error is recoverable (user can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Remote { .. } | Self::Parse(_)
        )
    }

    /// Human-readable message for display inside a view.
    ///
    /// Remote errors show only the service's own message; parse failures are
    /// reported the same way as transport failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            Self::Parse(msg) => format!("Network error: {msg}"),
            other => other.to_string(),
        }
    }
}
