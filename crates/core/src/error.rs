//! Error types for agenda operations.
//!
//! This module defines [`AgendaError`], the single error type returned by every
//! stage of the content-to-action pipeline. The first seven variants are the
//! pipeline kinds a caller reports to a user; the remaining variants come from
//! the capability implementations (HTTP, transcripts, token files) and are folded
//! into a pipeline kind at the stage boundary.
//!
//! # Example
//!
//! ```rust
//! use agenda_core::{AgendaError, ErrorKind};
//!
//! let err = AgendaError::InvalidUrlFormat("not-a-url".to_string());
//! assert_eq!(err.kind(), ErrorKind::InvalidUrlFormat);
//! assert!(err.to_string().contains("not-a-url"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    /// Neither a url nor text was supplied.
    #[error("Either url or text must be provided")]
    InvalidInput,

    /// The url is neither a video url nor an http(s) url.
    #[error("Invalid URL format: {0}")]
    InvalidUrlFormat(String),

    /// Acquiring content from an external source failed.
    ///
    /// Covers network errors, non-2xx responses, missing transcripts and
    /// video urls whose id cannot be extracted.
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    /// The fetch succeeded but produced no text.
    #[error("Could not extract text from {source_kind} at {url}")]
    EmptyContent { source_kind: String, url: String },

    /// The text-generation capability returned an error.
    #[error("Text generation failed: {0}")]
    GenerationFailure(String),

    /// No valid calendar credential is available.
    #[error("Calendar authorization failed: {0}")]
    CalendarAuthFailure(String),

    /// The calendar capability rejected or failed an event creation.
    #[error("Failed to schedule '{action}': {reason}")]
    CalendarApiFailure { action: String, reason: String },

    /// HTTP request errors from reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// A response arrived with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParse(String),

    /// No transcript could be located for a video.
    #[error("No transcript available: {0}")]
    TranscriptUnavailable(String),

    /// A response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token file missing.
    #[error("Token not found at {0}")]
    TokenNotFound(PathBuf),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pipeline category of an [`AgendaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidUrlFormat,
    FetchFailure,
    EmptyContent,
    GenerationFailure,
    CalendarAuthFailure,
    CalendarApiFailure,
    /// Transport, parsing or configuration errors not yet mapped to a stage.
    Internal,
}

impl AgendaError {
    /// Returns the pipeline category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgendaError::InvalidInput => ErrorKind::InvalidInput,
            AgendaError::InvalidUrlFormat(_) => ErrorKind::InvalidUrlFormat,
            AgendaError::FetchFailure { .. } => ErrorKind::FetchFailure,
            AgendaError::EmptyContent { .. } => ErrorKind::EmptyContent,
            AgendaError::GenerationFailure(_) => ErrorKind::GenerationFailure,
            AgendaError::CalendarAuthFailure(_) => ErrorKind::CalendarAuthFailure,
            AgendaError::CalendarApiFailure { .. } => ErrorKind::CalendarApiFailure,
            _ => ErrorKind::Internal,
        }
    }

    /// Wraps any acquisition error into [`AgendaError::FetchFailure`] for `url`.
    ///
    /// Errors that already are a `FetchFailure` pass through unchanged.
    pub fn into_fetch_failure(self, url: &str) -> Self {
        match self {
            err @ AgendaError::FetchFailure { .. } => err,
            other => AgendaError::FetchFailure { url: url.to_string(), reason: other.to_string() },
        }
    }
}

/// Result type alias for AgendaError.
pub type Result<T> = std::result::Result<T, AgendaError>;
