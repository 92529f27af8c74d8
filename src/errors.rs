//! Error types for the quillnotes application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during note management operations.

use std::io;

use thiserror::Error;

/// The main error type for the quillnotes application.
#[derive(Error, Debug)]
pub enum QnError {
    /// Errors related to terminal or stream I/O.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Sharing a note failed on every available channel.
    #[error("Share failed: {message}")]
    ShareFailed { message: String },

    /// Errors raised by the interactive editor session.
    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
