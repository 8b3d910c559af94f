//! Error Types

use thiserror::Error;

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform error types
#[derive(Error, Debug)]
pub enum PlatformError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// No chunk arrived within the configured idle window
    #[error("Stream timed out after {secs}s of inactivity")]
    StreamTimeout { secs: u64 },

    /// Session error
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlatformError::ProviderUnavailable(_)
                | PlatformError::StreamTimeout { .. }
                | PlatformError::RateLimited(_)
                | PlatformError::Io(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PlatformError::Provider(msg) => {
                format!("The AI service encountered an error: {}", msg)
            }
            PlatformError::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            PlatformError::StreamTimeout { .. } => {
                "The agent took too long to respond. Please try again.".into()
            }
            PlatformError::Session(msg) => format!("Session error: {}", msg),
            PlatformError::RateLimited(_) => {
                "You've made too many requests. Please wait a moment.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for PlatformError {
    fn from(err: anyhow::Error) -> Self {
        PlatformError::Other(err.to_string())
    }
}
