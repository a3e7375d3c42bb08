//! Run configuration.
//!
//! Every path a run touches is carried by [`DumpConfig`]; nothing is resolved
//! against the working directory behind the caller's back.
//!
//! # Example
//!
//! ```rust
//! use excerpta_core::{DumpConfig, FallbackPolicy};
//!
//! let config = DumpConfig::builder("data/sync.json")
//!     .dest_dir("out/annotations")
//!     .top_n(3)
//!     .fallback(FallbackPolicy::strict())
//!     .build()
//!     .unwrap();
//! assert_eq!(config.top_n, 3);
//! ```

use std::path::PathBuf;

use crate::fetch::FetchConfig;
use crate::matcher::DEFAULT_TOP_N;
use crate::order::{FallbackPolicy, OrderConfig};
use crate::{ExcerptaError, Result};

/// Everything one dump needs besides the query.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// The JSON export to search.
    pub data_path: PathBuf,

    /// Directory dumps are written to.
    pub dest_dir: PathBuf,

    /// Maximum number of search hits considered (default: 5).
    pub top_n: usize,

    /// HTTP settings for fetching article text.
    pub fetch: FetchConfig,

    /// Ordering settings.
    pub order: OrderConfig,
}

impl DumpConfig {
    /// Creates a builder for a run over the export at `data_path`.
    pub fn builder(data_path: impl Into<PathBuf>) -> DumpConfigBuilder {
        DumpConfigBuilder::new(data_path)
    }
}

/// Default output directory: `<data dir>/excerpta/annotations`.
///
/// Uses the platform data directory, then the home directory. Returns `None`
/// when neither is known.
pub fn default_dest_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join("excerpta").join("annotations"))
}

/// Builder for [`DumpConfig`].
pub struct DumpConfigBuilder {
    data_path: PathBuf,
    dest_dir: Option<PathBuf>,
    top_n: usize,
    fetch: FetchConfig,
    order: OrderConfig,
}

impl DumpConfigBuilder {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            dest_dir: None,
            top_n: DEFAULT_TOP_N,
            fetch: FetchConfig::default(),
            order: OrderConfig::default(),
        }
    }

    /// Sets the output directory.
    pub fn dest_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.dest_dir = Some(value.into());
        self
    }

    /// Sets the number of search hits considered.
    pub fn top_n(mut self, value: usize) -> Self {
        self.top_n = value;
        self
    }

    /// Sets the HTTP fetch settings.
    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.fetch = value;
        self
    }

    /// Sets which positional failures fall back to chronological ordering.
    pub fn fallback(mut self, value: FallbackPolicy) -> Self {
        self.order.fallback = value;
        self
    }

    /// Builds the config, resolving the default output directory if needed.
    ///
    /// # Errors
    ///
    /// [`ExcerptaError::ConfigError`] when `top_n` is zero or no output
    /// directory was given and none can be determined.
    pub fn build(self) -> Result<DumpConfig> {
        if self.top_n == 0 {
            return Err(ExcerptaError::ConfigError("top_n must be at least 1".to_string()));
        }

        let dest_dir = match self.dest_dir {
            Some(dir) => dir,
            None => default_dest_dir().ok_or_else(|| {
                ExcerptaError::ConfigError("no output directory given and no data directory found".to_string())
            })?,
        };

        Ok(DumpConfig { data_path: self.data_path, dest_dir, top_n: self.top_n, fetch: self.fetch, order: self.order })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DumpConfig::builder("sync.json").dest_dir("out").build().unwrap();
        assert_eq!(config.data_path, PathBuf::from("sync.json"));
        assert_eq!(config.dest_dir, PathBuf::from("out"));
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert_eq!(config.fetch.timeout, 30);
        assert_eq!(config.order.fallback, FallbackPolicy::default());
    }

    #[test]
    fn test_builder_overrides() {
        let fetch = FetchConfig { timeout: 5, user_agent: "test".to_string() };
        let config = DumpConfig::builder("sync.json")
            .dest_dir("out")
            .top_n(1)
            .fetch(fetch)
            .fallback(FallbackPolicy::strict())
            .build()
            .unwrap();

        assert_eq!(config.top_n, 1);
        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.order.fallback, FallbackPolicy::strict());
    }

    #[test]
    fn test_builder_rejects_zero_top_n() {
        let result = DumpConfig::builder("sync.json").dest_dir("out").top_n(0).build();
        assert!(matches!(result, Err(ExcerptaError::ConfigError(_))));
    }

    #[test]
    fn test_default_dest_dir_shape() {
        if let Some(dir) = default_dest_dir() {
            assert!(dir.ends_with("excerpta/annotations"));
        }
    }
}
