//! End-to-end dump: load, match, order, write.
//!
//! # Example
//!
//! ```rust,no_run
//! use excerpta_core::{DumpConfig, HttpProvider, Query, dump};
//!
//! # #[tokio::main]
//! # async fn main() -> excerpta_core::Result<()> {
//! let config = DumpConfig::builder("data/sync.json").dest_dir("data/annotations").build()?;
//! let provider = HttpProvider::new(config.fetch.clone());
//! let query = Query::new(Some("My Article"), None)?;
//!
//! match dump(&config, &query, &provider).await? {
//!     Some(outcome) => println!("wrote {}", outcome.path.display()),
//!     None => println!("no match"),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::DumpConfig;
use crate::fetch::FullTextProvider;
use crate::matcher::{Match, SearchField, search};
use crate::order::{Ordered, Strategy, order};
use crate::store::Store;
use crate::writer::{render_annotations, write_annotations};
use crate::{ExcerptaError, Result};

/// What to look for: a title, a URL, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    title: Option<String>,
    url: Option<String>,
}

impl Query {
    /// Creates a query from optional title and URL text.
    ///
    /// # Errors
    ///
    /// [`ExcerptaError::MissingQuery`] when both are absent or blank.
    pub fn new(title: Option<&str>, url: Option<&str>) -> Result<Self> {
        let clean = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        let query = Self { title: clean(title), url: clean(url) };

        if query.title.is_none() && query.url.is_none() {
            return Err(ExcerptaError::MissingQuery);
        }
        Ok(query)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Searches `store` for `query`.
///
/// With only a title or only a URL, that field is searched. With both, each
/// is searched and the ranking whose top hit scores higher wins; the title
/// wins ties.
pub fn find<'a>(store: &'a Store, query: &Query, top_n: usize) -> Result<Vec<Match<'a>>> {
    let by_title = query.title().map(|t| search(store, t, SearchField::Title, top_n)).transpose()?;
    let by_url = query.url().map(|u| search(store, u, SearchField::Url, top_n)).transpose()?;

    let top = |matches: &[Match<'_>]| matches.first().map_or(f64::NEG_INFINITY, |m| m.score);

    Ok(match (by_title, by_url) {
        (Some(title), Some(url)) if top(&url) > top(&title) => url,
        (Some(title), _) => title,
        (None, Some(url)) => url,
        (None, None) => Vec::new(),
    })
}

/// A matched record with its highlights ordered, ready to render or write.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub item_id: String,
    pub score: f64,
    /// Title used for the header and filename.
    pub title: Option<String>,
    /// URL used for the header; absent when the record has none.
    pub url: Option<String>,
    pub ordered: Ordered,
}

impl Prepared {
    /// The dump text.
    pub fn render(&self) -> String {
        render_annotations(&self.ordered.quotes, self.title.as_deref(), self.url.as_deref())
    }

    /// Writes the dump into `dest_dir` and returns its path.
    pub fn write(&self, dest_dir: &Path) -> Result<PathBuf> {
        write_annotations(&self.ordered.quotes, self.title.as_deref(), self.url.as_deref(), dest_dir)
    }

    pub fn strategy(&self) -> &Strategy {
        &self.ordered.strategy
    }
}

/// Result of a completed [`dump`].
#[derive(Debug, Clone)]
pub struct DumpOutcome {
    pub path: PathBuf,
    pub prepared: Prepared,
}

/// Loads the export, picks the best match for `query` and orders its
/// highlights. Returns `None` when nothing matches.
pub async fn prepare<P: FullTextProvider>(config: &DumpConfig, query: &Query, provider: &P) -> Result<Option<Prepared>> {
    let store = Store::load(&config.data_path)?;
    let matches = find(&store, query, config.top_n)?;

    let Some(best) = matches.first() else {
        debug!(title = query.title(), url = query.url(), "No item matched the query");
        return Ok(None);
    };

    let record = best.record;
    info!(item_id = best.item_id, score = best.score, title = record.title(), "Matched item");

    let ordered = order(record, provider, &config.order).await?;

    let title = record.title().or(query.title()).map(str::to_string);
    let url = record.has_url().then(|| ordered.source_url.clone());

    Ok(Some(Prepared { item_id: best.item_id.to_string(), score: best.score, title, url, ordered }))
}

/// Runs [`prepare`] and writes the result into `config.dest_dir`.
pub async fn dump<P: FullTextProvider>(config: &DumpConfig, query: &Query, provider: &P) -> Result<Option<DumpOutcome>> {
    let Some(prepared) = prepare(config, query, provider).await? else {
        return Ok(None);
    };

    let path = prepared.write(&config.dest_dir)?;
    Ok(Some(DumpOutcome { path, prepared }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_requires_something() {
        assert!(matches!(Query::new(None, None), Err(ExcerptaError::MissingQuery)));
        assert!(matches!(Query::new(Some("  "), Some("")), Err(ExcerptaError::MissingQuery)));
    }

    #[test]
    fn test_query_trims() {
        let query = Query::new(Some("  My Article "), None).unwrap();
        assert_eq!(query.title(), Some("My Article"));
        assert_eq!(query.url(), None);
    }

    fn two_records() -> Store {
        Store::from_json(
            r#"{"list": {
                "1": {"resolved_url": "https://ex.com/untitled"},
                "2": {"resolved_title": "Titled", "resolved_url": "https://ex.com/titled"}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_find_prefers_stronger_url_hit() {
        let store = two_records();
        let query = Query::new(Some("zzzz"), Some("https://ex.com/untitled")).unwrap();
        let matches = find(&store, &query, 5).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].item_id, "1");
        assert_eq!(matches[0].score, 100.0);
    }

    #[test]
    fn test_find_prefers_stronger_title_hit() {
        let store = two_records();
        let query = Query::new(Some("Titled"), Some("https://elsewhere.org/x")).unwrap();
        let matches = find(&store, &query, 5).unwrap();
        assert_eq!(matches[0].item_id, "2");
        assert_eq!(matches[0].score, 100.0);
    }

    #[test]
    fn test_find_exact_url_beats_weak_title_guess() {
        let store = Store::from_json(
            r#"{"list": {
                "1": {"resolved_title": "Something Else Entirely", "resolved_url": "https://ex.com/wanted"},
                "2": {"resolved_title": "Something", "resolved_url": "https://ex.com/other"}
            }}"#,
        )
        .unwrap();
        let query = Query::new(Some("something new"), Some("https://ex.com/wanted")).unwrap();
        let matches = find(&store, &query, 5).unwrap();
        assert_eq!(matches[0].item_id, "1");
    }

    #[test]
    fn test_find_url_only() {
        let store = two_records();
        let query = Query::new(None, Some("https://ex.com/untitled")).unwrap();
        let matches = find(&store, &query, 5).unwrap();
        assert_eq!(matches[0].item_id, "1");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_find_empty_store() {
        let store = Store::default();
        let query = Query::new(Some("t"), Some("https://ex.com")).unwrap();
        assert!(find(&store, &query, 5).unwrap().is_empty());
    }
}
