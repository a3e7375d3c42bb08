//! Approximate title and URL search over a [`Store`].
//!
//! Scores are a case-insensitive indel similarity, `2 * lcs / (len a + len b)`
//! scaled to `0..=100`, so a single extra character on a short title still
//! clears [`CONFIDENT_SCORE`]. Records whose compared field is empty are not scored at all.
//!
//! # Example
//!
//! ```rust
//! use excerpta_core::{SearchField, Store, search};
//!
//! let store = Store::from_json(r#"{"list": {"1": {"resolved_title": "My Article"}}}"#).unwrap();
//! let matches = search(&store, "my article", SearchField::Title, 5).unwrap();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].score, 100.0);
//! ```

use rapidfuzz::distance::indel;
use tracing::{debug, info};

use crate::store::{Record, Store};
use crate::{ExcerptaError, Result};

/// Default number of results returned by a search.
pub const DEFAULT_TOP_N: usize = 5;

/// A top score strictly above this is treated as an unambiguous match.
pub const CONFIDENT_SCORE: f64 = 95.0;

/// Which record field a query is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// `resolved_title`
    Title,
    /// The resolved URL, or the given URL when nothing was resolved.
    Url,
}

impl SearchField {
    fn value(self, record: &Record) -> &str {
        match self {
            SearchField::Title => &record.resolved_title,
            SearchField::Url if record.has_url() => record.source_url(),
            SearchField::Url => "",
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    /// Similarity in `0.0..=100.0`.
    pub score: f64,
    pub item_id: &'a str,
    pub record: &'a Record,
}

impl Match<'_> {
    /// Whether the score clears [`CONFIDENT_SCORE`].
    pub fn is_confident(&self) -> bool {
        self.score > CONFIDENT_SCORE
    }
}

/// Case-insensitive similarity of two strings in `0.0..=100.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    let score = indel::normalized_similarity(a.chars(), b.chars()) * 100.0;
    score.clamp(0.0, 100.0)
}

/// Ranks the records of `store` against `query`.
///
/// Results are sorted by descending score, ties keeping store order, and cut
/// to `top_n`. When the best score clears [`CONFIDENT_SCORE`] only that hit
/// is returned. An empty result means nothing matched.
///
/// # Errors
///
/// Returns [`ExcerptaError::InvalidQuery`] for a blank query or a `top_n` of zero.
pub fn search<'a>(store: &'a Store, query: &str, field: SearchField, top_n: usize) -> Result<Vec<Match<'a>>> {
    if query.trim().is_empty() {
        return Err(ExcerptaError::InvalidQuery("query must not be empty".to_string()));
    }
    if top_n == 0 {
        return Err(ExcerptaError::InvalidQuery("top_n must be at least 1".to_string()));
    }

    info!(query, ?field, "Searching export");

    let mut matches: Vec<Match<'a>> = store
        .iter()
        .filter_map(|record| {
            let target = field.value(record);
            if target.is_empty() {
                return None;
            }
            Some(Match { score: similarity(query, target), item_id: &record.item_id, record })
        })
        .collect();

    // `sort_by` is stable, so equal scores keep store order.
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(top_n);

    if matches.first().is_some_and(Match::is_confident) {
        matches.truncate(1);
    }

    for m in &matches {
        debug!(item_id = m.item_id, score = m.score, "Candidate");
    }

    Ok(matches)
}

/// Searches by title with the default result count.
pub fn search_title<'a>(store: &'a Store, title: &str) -> Result<Vec<Match<'a>>> {
    search(store, title, SearchField::Title, DEFAULT_TOP_N)
}

/// Searches by URL with the default result count.
pub fn search_url<'a>(store: &'a Store, url: &str) -> Result<Vec<Match<'a>>> {
    search(store, url, SearchField::Url, DEFAULT_TOP_N)
}
