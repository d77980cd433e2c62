//! Error types for entrez-dl
//!
//! Every failure in the retrieval pipeline is fatal: nothing here is retried
//! or silently swallowed. Errors propagate to the top-level caller, which is
//! responsible for user-facing messaging and process exit status. The one
//! deliberately non-error outcome — a search that matches zero records — is
//! not represented here at all; it surfaces as
//! [`RetrievalOutcome::Empty`](crate::types::RetrievalOutcome).

use thiserror::Error;

/// Result type alias for entrez-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for entrez-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Search call failed or returned a malformed response (missing count,
    /// WebEnv or query key). Fatal; the session was never established.
    #[error("search session error: {0}")]
    Session(String),

    /// A fetch was attempted before any search established a session.
    /// This is a programming-contract violation, not a remote failure.
    #[error("no search session established: call search() before fetching")]
    NotInitialized,

    /// A batch fetch call failed. Halts orchestration; records already
    /// yielded from earlier batches remain with the caller.
    #[error("batch fetch error: {0}")]
    RemoteFetch(String),

    /// The GenBank parser rejected part of a fetched batch
    #[error("record parse error: {0}")]
    Parse(String),

    /// I/O error while writing an output artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart construction or rasterization error
    #[error("chart render error: {0}")]
    Render(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "email")
        key: Option<String>,
    },
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a specific key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
