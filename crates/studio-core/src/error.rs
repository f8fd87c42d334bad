//! Error types for Content Studio operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Studio crates. Uses `thiserror` for derive macros.
//!
//! The variants map onto the failure classes of the generation pipeline:
//!
//! - [`Error::InvalidInput`]: a brief or form was rejected before any side effect
//! - [`Error::Upstream`]: the model backend failed before producing output
//! - [`Error::StreamInterrupted`]: the model backend failed after output began
//! - [`Error::Clipboard`] and the I/O variants: copy or export did not complete

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Studio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with the path that caused it.
    #[error("I/O error at {}: {source}", path.display())]
    IoWithPath {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller-supplied input was rejected.
    #[error("{0}")]
    InvalidInput(String),

    /// The resource already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The model backend could not be reached or refused the request.
    #[error("Upstream error: {message}")]
    Upstream {
        /// Human-readable description.
        message: String,
        /// HTTP status returned by the backend, if one was received.
        status: Option<u16>,
    },

    /// The stream broke after output had started.
    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    /// The system clipboard could not be written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl Error {
    /// Create an I/O error without path context.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Create an I/O error that records the offending path.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source: err,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an input validation error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an upstream error with no HTTP status (transport failure).
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream {
            message: msg.into(),
            status: None,
        }
    }

    /// Create an upstream error from a non-success HTTP status.
    pub fn upstream_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Upstream {
            message: msg.into(),
            status: Some(status),
        }
    }

    /// Create an upstream error that keeps the source error's message.
    pub fn upstream_with_source(msg: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Upstream {
            message: format!("{}: {}", msg.into(), source),
            status: None,
        }
    }

    /// Create a stream interruption error.
    pub fn stream_interrupted(msg: impl Into<String>) -> Self {
        Self::StreamInterrupted(msg.into())
    }

    /// Create a clipboard error.
    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Transport failures, rate limits and server-side errors are retryable.
    /// Everything else, including mid-stream interruptions, is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { status: None, .. } => true,
            Self::Upstream {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// Whether this error was caused by the caller's input.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias using Studio's Error type.
pub type Result<T> = std::result::Result<T, Error>;
