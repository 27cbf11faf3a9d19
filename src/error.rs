//! Centralized error types for mailnote.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailnote library.
#[derive(Error, Debug)]
pub enum MailNoteError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A required configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// No notebook matches the configured name.
    #[error("Notebook '{0}' not found in the note store")]
    NotebookNotFound(String),

    /// The IMAP server rejected a command or the connection dropped.
    #[error("IMAP error: {0}")]
    Imap(#[from] imap::Error),

    /// TLS setup for the mailbox connection failed.
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// A mailbox operation failed for a reason other than the protocol layer.
    #[error("Mailbox error: {0}")]
    Mailbox(String),

    /// The HTTP request to the note store could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The note store answered with a non-200 status.
    #[error("Note store returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// A JSON payload could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTML-to-Markdown conversion gave up on a body.
    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Convenience alias for `Result<T, MailNoteError>`.
pub type Result<T> = std::result::Result<T, MailNoteError>;

impl MailNoteError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare; prefer `MailNoteError::io`).
impl From<std::io::Error> for MailNoteError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
