//! Error types for Excerpta operations.
//!
//! This module defines the main error type [`ExcerptaError`] which represents
//! everything that can go wrong while loading an export, searching it,
//! ordering highlights and writing them out. Failures of the positional
//! ordering attempt have their own type, [`PositionalError`], so callers can
//! decide per kind whether to fall back to chronological ordering.
//!
//! # Example
//!
//! ```rust
//! use excerpta_core::{ExcerptaError, Result};
//!
//! fn require_title(title: &str) -> Result<&str> {
//!     if title.trim().is_empty() {
//!         return Err(ExcerptaError::InvalidQuery("empty title".to_string()));
//!     }
//!     Ok(title)
//! }
//! # assert!(require_title("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Excerpta operations.
#[derive(Error, Debug)]
pub enum ExcerptaError {
    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Filesystem errors while reading the export or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The export is not valid JSON or does not have the expected shape.
    #[error("Failed to parse export: {0}")]
    Json(#[from] serde_json::Error),

    /// A search query that cannot be evaluated (empty text, `top_n` of zero).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid run configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Neither a title nor a URL was supplied.
    #[error("A title or a URL is required")]
    MissingQuery,

    /// No filename could be derived for the output file.
    #[error("Cannot derive an output filename without a title or URL")]
    MissingFilename,

    /// An annotation timestamp that none of the supported formats accept.
    ///
    /// This is fatal for chronological ordering.
    #[error("Unparseable timestamp: {value:?}")]
    TimestampParse { value: String },

    /// A positional ordering failure the fallback policy chose not to absorb.
    #[error("Positional ordering failed: {0}")]
    Positional(#[from] PositionalError),
}

/// Why ordering highlights by their position in the article failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionalError {
    /// The full text could not be retrieved.
    #[error("could not fetch article text: {0}")]
    FetchFailed(String),

    /// The article was retrieved but contained no text.
    #[error("article text is empty")]
    EmptyArticle,

    /// A highlight does not occur in the article text.
    #[error("quote not found in article text: {quote:?}")]
    QuoteNotFound { quote: String },
}

impl PositionalError {
    /// Short, stable name of the failure kind, used in logs and CLI flags.
    pub fn kind(&self) -> &'static str {
        match self {
            PositionalError::FetchFailed(_) => "fetch",
            PositionalError::EmptyArticle => "empty",
            PositionalError::QuoteNotFound { .. } => "missing-quote",
        }
    }
}

/// Result type alias for ExcerptaError.
pub type Result<T> = std::result::Result<T, ExcerptaError>;
