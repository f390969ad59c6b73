//! Error types for the log module.

use chanreplay_core::{CoreError, MessageKind};
use thiserror::Error;

/// Errors that can occur while reading a message log.
#[derive(Debug, Error)]
pub enum LogError {
    /// Entry lacks a `+` (sent) or `-` (received) prefix.
    #[error("{0} does not start with +/-")]
    MalformedDirection(String),

    /// Entry has a direction but no path.
    #[error("log entry {0:?} names no message")]
    EmptyPath(String),

    /// No message stored under this path.
    #[error("message not found: {0}")]
    NotFound(String),

    /// Message bytes could not be decoded.
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: CoreError,
    },

    /// Decoded fine, but not the message type the caller needs.
    #[error("{path} holds a {found} message, expected {expected}")]
    WrongKind {
        path: String,
        expected: MessageKind,
        found: MessageKind,
    },

    /// I/O error.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
