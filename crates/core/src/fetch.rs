//! Full-text providers.
//!
//! Positional ordering needs the plaintext of the article a record points
//! at. A [`FullTextProvider`] turns a URL into that text: [`HttpProvider`]
//! downloads the page, [`FileProvider`] reads a saved HTML snapshot and
//! [`StaticProvider`] hands back text it was given.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
use tracing::info;
use url::Url;

use crate::text::article_text;
use crate::{ExcerptaError, Result};

/// Source of article plaintext for a URL.
pub trait FullTextProvider {
    /// Returns the readable text of the article at `url`.
    fn full_text(&self, url: &str) -> impl Future<Output = Result<String>>;
}

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Excerpta/0.1)".to_string() }
    }
}

/// Checks that `url` is an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ExcerptaError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ExcerptaError::InvalidUrl(format!(
            "{url}: unsupported scheme {other:?} (expected http or https)"
        ))),
    }
}

/// Fetches HTML content from a URL.
///
/// Follows redirects, respects the configured timeout and sends a
/// browser-like User-Agent.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = validate_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(ExcerptaError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ExcerptaError::Timeout { timeout: config.timeout }
            } else {
                ExcerptaError::HttpError(e)
            }
        })?
        .error_for_status()?;

    let content = response.text().await?;

    Ok(content)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &Path) -> Result<String> {
    if !path.exists() {
        Err(ExcerptaError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(ExcerptaError::from)
    }
}

/// Downloads pages over HTTP and extracts their article text.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone, Default)]
pub struct HttpProvider {
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpProvider {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "fetch")]
impl FullTextProvider for HttpProvider {
    async fn full_text(&self, url: &str) -> Result<String> {
        info!(url, "Extracting article text");
        let html = fetch_url(url, &self.config).await?;
        Ok(article_text(&html))
    }
}

/// Reads a saved HTML snapshot instead of touching the network.
///
/// The requested URL is ignored; the snapshot is assumed to be that page.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FullTextProvider for FileProvider {
    async fn full_text(&self, url: &str) -> Result<String> {
        info!(url, path = %self.path.display(), "Extracting article text from snapshot");
        let html = fetch_file(&self.path)?;
        Ok(article_text(&html))
    }
}

/// Returns the same plaintext for every URL.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    text: String,
}

impl StaticProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl FullTextProvider for StaticProvider {
    async fn full_text(&self, _url: &str) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Excerpta"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a?b=c").is_ok());
        assert!(matches!(validate_url("example.com"), Err(ExcerptaError::InvalidUrl(_))));
        assert!(matches!(validate_url("given_url"), Err(ExcerptaError::InvalidUrl(_))));
        assert!(matches!(validate_url("ftp://example.com"), Err(ExcerptaError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(ExcerptaError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file(Path::new("/nonexistent/path/file.html"));
        assert!(matches!(result, Err(ExcerptaError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_file_provider_extracts_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html><body><article><p>Hello there.</p></article></body></html>").unwrap();

        let provider = FileProvider::new(file.path());
        let text = provider.full_text("https://example.com").await.unwrap();
        assert_eq!(text, "Hello there.");
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticProvider::new("fixed text");
        assert_eq!(provider.full_text("anything").await.unwrap(), "fixed text");
    }
}
