//! Error types shared across the ideapost crates.
//!
//! [`IdeapostError`] covers the run-level failure taxonomy and
//! [`ChannelError`] the mail transport layer. Fatal variants abort a run
//! before any state file is written.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for daily runs, reply checks and catalog imports.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IdeapostError {
    /// Configuration is missing a required field or has an invalid value.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// A required state file (config, catalog) could not be read or parsed.
    #[error("failed to load {what} from {}: {reason}", path.display())]
    StateUnavailable {
        /// Which record failed ("catalog", "history", ...).
        what: &'static str,
        /// File that was being read.
        path: PathBuf,
        /// Underlying read or parse error, rendered.
        reason: String,
    },

    /// The selector produced no ideas; nothing is emailed.
    #[error("no ideas available to send")]
    NothingToSend,

    /// Mail transport failed.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Mail transport error, produced by the SMTP mailer and IMAP inbox.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChannelError {
    /// Could not reach the mail server or negotiate TLS.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server rejected the credentials.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Building or submitting an outbound message failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Searching or fetching inbound messages failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Catch-all for errors that do not fit other variants.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, IdeapostError>;
