//! Plain-text output of ordered highlights.
//!
//! A dump is a short header (title, then URL, then a blank line) followed by
//! one highlight per line. Files are named after the title, or after the URL
//! when there is no title, and silently replace an earlier dump of the same
//! name.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::text::collapse_whitespace;
use crate::{ExcerptaError, Result};

static PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?|ftp)://|\bwww\.").expect("protocol pattern is valid"));

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern is valid"));

static PATH_HOSTILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]+"#).expect("path pattern is valid"));

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Turns a URL into a filename stem.
///
/// Protocol tokens are dropped and every run of non-word characters becomes a
/// single space: `https://example.com/page?x=1` gives `example com page x 1`.
pub fn filename_from_url(url: &str) -> String {
    let stripped = PROTOCOL.replace_all(url, " ");
    NON_WORD.replace_all(&stripped, " ").trim().to_string()
}

/// Makes a title safe to use as a filename stem.
pub fn filename_from_title(title: &str) -> String {
    collapse_whitespace(&PATH_HOSTILE.replace_all(title, " "))
}

/// Picks the filename stem for a dump.
///
/// # Errors
///
/// Returns [`ExcerptaError::MissingFilename`] when neither the title nor the
/// URL yields a non-empty stem.
pub fn derive_filename(title: Option<&str>, url: Option<&str>) -> Result<String> {
    present(title)
        .map(filename_from_title)
        .filter(|name| !name.is_empty())
        .or_else(|| present(url).map(filename_from_url).filter(|name| !name.is_empty()))
        .ok_or(ExcerptaError::MissingFilename)
}

/// Renders a dump without writing it.
pub fn render_annotations(quotes: &[String], title: Option<&str>, url: Option<&str>) -> String {
    let mut output = String::new();

    for line in [present(title), present(url)].into_iter().flatten() {
        output.push_str(line);
        output.push('\n');
    }
    if !output.is_empty() {
        output.push('\n');
    }

    output.push_str(&quotes.join("\n"));
    output
}

/// Writes a dump to `<dest_dir>/<stem>.txt` and returns the path.
///
/// `dest_dir` is created when missing. An existing file at the same path is
/// overwritten.
pub fn write_annotations(quotes: &[String], title: Option<&str>, url: Option<&str>, dest_dir: &Path) -> Result<PathBuf> {
    let stem = derive_filename(title, url)?;

    fs::create_dir_all(dest_dir)?;
    let path = dest_dir.join(format!("{stem}.txt"));

    info!(path = %path.display(), quotes = quotes.len(), "Dumping annotations");
    fs::write(&path, render_annotations(quotes, title, url))?;

    Ok(path)
}
