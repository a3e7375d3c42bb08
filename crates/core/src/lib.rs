pub mod config;
pub mod dump;
pub mod error;
pub mod fetch;
pub mod matcher;
pub mod order;
pub mod store;
pub mod text;
pub mod timestamp;
pub mod writer;

pub use config::{DumpConfig, DumpConfigBuilder, default_dest_dir};
pub use dump::{DumpOutcome, Prepared, Query, dump, find, prepare};
pub use error::{ExcerptaError, PositionalError, Result};
#[cfg(feature = "fetch")]
pub use fetch::{HttpProvider, fetch_url};
pub use fetch::{FetchConfig, FileProvider, FullTextProvider, StaticProvider, fetch_file, validate_url};
pub use matcher::{CONFIDENT_SCORE, DEFAULT_TOP_N, Match, SearchField, search, search_title, search_url, similarity};
pub use order::{FallbackPolicy, OrderConfig, Ordered, QUOTE_PREFIX_CHARS, Strategy, order, order_by_position, order_by_time};
pub use store::{Annotation, FALLBACK_URL_LABEL, Record, Store};
pub use text::article_text;
pub use timestamp::parse_timestamp;
pub use writer::{derive_filename, filename_from_title, filename_from_url, render_annotations, write_annotations};
