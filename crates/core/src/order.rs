//! Reading-order reconstruction for highlights.
//!
//! Exports store highlights in whatever order the service kept them. The
//! natural order is the order they appear in the article, so each quote is
//! located in the article's full text and sorted by offset. When that is not
//! possible, because the page cannot be fetched, is empty, or no longer
//! contains a quote, highlights are sorted by creation time instead. Which of
//! those failures may fall back is decided by a [`FallbackPolicy`].
//!
//! # Example
//!
//! ```rust
//! use excerpta_core::{Annotation, order_by_position};
//!
//! let annotations = vec![
//!     Annotation::new("second part", "2020-01-01"),
//!     Annotation::new("first part", "2020-01-02"),
//! ];
//! let quotes = order_by_position("First part ... second part", &annotations).unwrap();
//! assert_eq!(quotes, vec!["first part", "second part"]);
//! ```

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::PositionalError;
use crate::fetch::FullTextProvider;
use crate::store::{Annotation, Record};
use crate::text::collapse_whitespace;
use crate::timestamp::parse_timestamp;
use crate::Result;

/// Number of leading characters of a quote searched for in the article.
pub const QUOTE_PREFIX_CHARS: usize = 20;

/// Which positional failures fall back to chronological ordering.
///
/// A disabled kind is returned to the caller as
/// [`ExcerptaError::Positional`](crate::ExcerptaError::Positional).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub on_fetch_failure: bool,
    pub on_empty_article: bool,
    pub on_missing_quote: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self { on_fetch_failure: true, on_empty_article: true, on_missing_quote: true }
    }
}

impl FallbackPolicy {
    /// A policy that never falls back.
    pub fn strict() -> Self {
        Self { on_fetch_failure: false, on_empty_article: false, on_missing_quote: false }
    }

    /// Whether `error` should be absorbed by chronological ordering.
    pub fn allows(&self, error: &PositionalError) -> bool {
        match error {
            PositionalError::FetchFailed(_) => self.on_fetch_failure,
            PositionalError::EmptyArticle => self.on_empty_article,
            PositionalError::QuoteNotFound { .. } => self.on_missing_quote,
        }
    }
}

/// Configuration for [`order`].
#[derive(Debug, Clone, Default)]
pub struct OrderConfig {
    pub fallback: FallbackPolicy,
}

/// How the returned order was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// By offset in the article text.
    Positional,
    /// By creation time, after the positional attempt failed.
    Chronological { reason: PositionalError },
}

/// Highlights of one record in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered {
    /// The record's URL, or the fallback label when it has none.
    pub source_url: String,
    pub quotes: Vec<String>,
    pub strategy: Strategy,
}

/// Orders `annotations` by where their quotes occur in `text`.
///
/// Matching is case-insensitive on the first [`QUOTE_PREFIX_CHARS`]
/// characters of each quote. Whitespace runs, NBSP and newlines included,
/// compare as a single space on both sides. Empty quotes are dropped,
/// repeated identical quotes are emitted once, and quotes found at the same
/// offset keep their input order.
///
/// # Errors
///
/// [`PositionalError::EmptyArticle`] when `text` is blank and
/// [`PositionalError::QuoteNotFound`] for the first quote that does not occur.
pub fn order_by_position(text: &str, annotations: &[Annotation]) -> std::result::Result<Vec<String>, PositionalError> {
    if text.trim().is_empty() {
        return Err(PositionalError::EmptyArticle);
    }

    let haystack = collapse_whitespace(&text.to_lowercase());
    let mut seen = HashSet::new();
    let mut located: Vec<(usize, &str)> = Vec::new();

    for annotation in annotations.iter().filter(|a| !a.quote.is_empty()) {
        let needle = collapse_whitespace(&annotation.quote)
            .chars()
            .take(QUOTE_PREFIX_CHARS)
            .collect::<String>()
            .to_lowercase();

        let offset = haystack
            .find(&needle)
            .ok_or_else(|| PositionalError::QuoteNotFound { quote: annotation.quote.clone() })?;

        if seen.insert((offset, annotation.quote.as_str())) {
            debug!(offset, quote = %needle, "Located quote");
            located.push((offset, annotation.quote.as_str()));
        }
    }

    located.sort_by_key(|&(offset, _)| offset);

    Ok(located.into_iter().map(|(_, quote)| quote.to_string()).collect())
}

/// Orders `annotations` by their `created_at` time, oldest first.
///
/// Empty quotes are dropped; equal times keep input order.
///
/// # Errors
///
/// Returns [`ExcerptaError::TimestampParse`](crate::ExcerptaError::TimestampParse)
/// for the first unparseable timestamp.
pub fn order_by_time(annotations: &[Annotation]) -> Result<Vec<String>> {
    let mut timed = annotations
        .iter()
        .filter(|a| !a.quote.is_empty())
        .map(|a| parse_timestamp(&a.created_at).map(|at| (at, a.quote.as_str())))
        .collect::<Result<Vec<_>>>()?;

    timed.sort_by_key(|&(at, _)| at);

    Ok(timed.into_iter().map(|(_, quote)| quote.to_string()).collect())
}

/// Puts a record's highlights in reading order.
///
/// Tries [`order_by_position`] against the text `provider` returns for the
/// record's URL, and falls back to [`order_by_time`] for the failure kinds
/// `config.fallback` allows.
pub async fn order<P: FullTextProvider>(record: &Record, provider: &P, config: &OrderConfig) -> Result<Ordered> {
    let source_url = record.source_url().to_string();

    let attempt = if record.has_url() {
        match provider.full_text(&source_url).await {
            Ok(text) => {
                info!("Sorting annotations by position");
                order_by_position(&text, &record.annotations)
            }
            Err(e) => Err(PositionalError::FetchFailed(e.to_string())),
        }
    } else {
        Err(PositionalError::FetchFailed("record has no URL".to_string()))
    };

    match attempt {
        Ok(quotes) => Ok(Ordered { source_url, quotes, strategy: Strategy::Positional }),
        Err(reason) if config.fallback.allows(&reason) => {
            warn!(kind = reason.kind(), "{reason}");
            info!("Sorting annotations by timestamp");
            let quotes = order_by_time(&record.annotations)?;
            Ok(Ordered { source_url, quotes, strategy: Strategy::Chronological { reason } })
        }
        Err(reason) => Err(reason.into()),
    }
}
