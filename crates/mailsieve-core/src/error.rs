//! Error types for the core library.

use thiserror::Error;

/// Errors from the mail pipeline.
#[derive(Debug, Error)]
pub enum MailError {
    /// Login or network failure, or no active session.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server rejected the date search.
    #[error("Search failed: {0}")]
    Search(String),

    /// A single message could not be fetched or parsed.
    #[error("Message {id} skipped: {reason}")]
    MessageParse {
        /// Sequence number of the message.
        id: u32,
        /// What went wrong.
        reason: String,
    },

    /// The blocklist file could not be read or written.
    #[error("Blocklist file error: {0}")]
    Persistence(String),
}

/// Result type alias using [`MailError`].
pub type Result<T> = std::result::Result<T, MailError>;

/// Errors from the checklist assistant.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The model returned nothing usable.
    #[error("Empty response from model")]
    EmptyResponse,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}
