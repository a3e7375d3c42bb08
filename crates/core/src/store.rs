//! Saved-item export loading.
//!
//! An export is a JSON document whose top-level `list` maps item ids to
//! saved items. Each item carries its resolved title and URL plus the
//! highlights the user made while reading it.
//!
//! ```json
//! {
//!   "list": {
//!     "1": {
//!       "resolved_title": "My Article",
//!       "resolved_url": "http://ex.com/a",
//!       "annotations": [{ "quote": "first part", "created_at": "2020-01-01" }]
//!     }
//!   }
//! }
//! ```
//!
//! The [`Store`] keeps items in document order and is never written back.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use std::fmt;

use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::{ExcerptaError, Result};

/// URL label used when an item has neither a resolved nor a given URL.
pub const FALLBACK_URL_LABEL: &str = "given_url";

/// A single highlighted quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Annotation {
    /// Identifier assigned by the export, when present.
    #[serde(default)]
    pub annotation_id: Option<String>,

    /// The highlighted text.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub quote: String,

    /// When the highlight was made, as written by the export.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub created_at: String,
}

impl Annotation {
    pub fn new(quote: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self { annotation_id: None, quote: quote.into(), created_at: created_at.into() }
    }
}

/// One saved item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Key of this item in the export's `list`.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub item_id: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub resolved_title: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub resolved_url: String,

    /// Title as originally saved, before the service resolved it.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub given_title: String,

    /// URL as originally saved, before redirects were resolved.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub given_url: String,

    /// Highlights in storage order.
    #[serde(default, deserialize_with = "annotations_or_empty")]
    pub annotations: Vec<Annotation>,
}

impl Record {
    /// The URL to fetch full text from and to print in headers.
    ///
    /// Prefers the resolved URL, then the given URL, then [`FALLBACK_URL_LABEL`].
    pub fn source_url(&self) -> &str {
        if !self.resolved_url.is_empty() {
            &self.resolved_url
        } else if !self.given_url.is_empty() {
            &self.given_url
        } else {
            FALLBACK_URL_LABEL
        }
    }

    /// Whether [`Record::source_url`] points at something fetchable.
    pub fn has_url(&self) -> bool {
        !self.resolved_url.is_empty() || !self.given_url.is_empty()
    }

    /// The best available title, if any.
    pub fn title(&self) -> Option<&str> {
        [self.resolved_title.as_str(), self.given_title.as_str()]
            .into_iter()
            .find(|t| !t.trim().is_empty())
    }

    /// Highlights with non-empty quotes, in storage order.
    pub fn quoted_annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|a| !a.quote.is_empty())
    }
}

#[derive(Deserialize)]
struct Export {
    #[serde(default, deserialize_with = "items_or_empty")]
    list: IndexMap<String, Record>,
}

/// Read-only collection of saved items keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct Store {
    items: IndexMap<String, Record>,
}

impl Store {
    /// Parses an export from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let export: Export = serde_json::from_str(json)?;
        Ok(Self::from_items(export.list))
    }

    /// Loads an export from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ExcerptaError::FileNotFound`] when `path` does not exist and
    /// [`ExcerptaError::Json`] when it is not a valid export.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExcerptaError::FileNotFound(path.to_path_buf()));
        }

        info!(path = %path.display(), "Loading export");
        let json = fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        debug!(items = store.len(), "Export loaded");

        Ok(store)
    }

    fn from_items(items: IndexMap<String, Record>) -> Self {
        let items = items
            .into_iter()
            .map(|(id, mut record)| {
                record.item_id.clone_from(&id);
                (id, record)
            })
            .collect();

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&Record> {
        self.items.get(item_id)
    }

    /// Iterates records in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.items.values()
    }
}

impl FromIterator<Record> for Store {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let items = iter.into_iter().map(|r| (r.item_id.clone(), r)).collect();
        Self { items }
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn annotations_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Annotation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Annotation>>::deserialize(deserializer)?.unwrap_or_default())
}

/// An account with no saved items is exported as `"list": []`.
///
/// Records are read straight off the map so a malformed item reports its own
/// error rather than a failed variant match.
fn items_or_empty<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, Record>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ItemsVisitor;

    impl<'de> Visitor<'de> for ItemsVisitor {
        type Value = IndexMap<String, Record>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object keyed by item id, or an empty array")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut items = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((id, record)) = map.next_entry::<String, Record>()? {
                items.insert(id, record);
            }
            Ok(items)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
            if seq.next_element::<IgnoredAny>()?.is_some() {
                return Err(serde::de::Error::custom("`list` must be an object keyed by item id"));
            }
            Ok(IndexMap::new())
        }

        fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(IndexMap::new())
        }

        fn visit_none<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(IndexMap::new())
        }
    }

    deserializer.deserialize_any(ItemsVisitor)
}
