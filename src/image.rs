//! Image URL normalization and the fallback shown when an image is missing.
//!
//! Wiki image URLs carry a `/revision/latest?cb=...` suffix that the CDN uses
//! for cache busting. The bare file URL in front of it is stable and loads
//! without the suffix, so [`clean_image_url`] strips it.
//!
//! When there is no usable URL, or the image fails to load, views render the
//! record's initial instead ([`initial_badge`]).
//!
//! # Examples
//!
//! ```rust
//! use titanwiki::image::{ImageSource, clean_image_url, initial_badge};
//!
//! assert_eq!(
//!     clean_image_url("https://host/img/foo/revision/latest?x=1").as_deref(),
//!     Some("https://host/img/foo")
//! );
//!
//! let source = ImageSource::resolve(None, "assets/placeholder.png");
//! assert_eq!(source, ImageSource::Placeholder("assets/placeholder.png".to_string()));
//! assert_eq!(initial_badge("armin Arlert"), 'A');
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

static REVISION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/revision/.*$").expect("revision pattern is valid"));

/// Strips the `/revision/...` suffix (query string included) from an image URL.
///
/// Returns `None` for empty input, strings that don't parse as URLs, and
/// schemes other than `http`/`https`. URLs without a revision suffix are
/// returned unchanged.
///
/// # Examples
///
/// ```rust
/// use titanwiki::image::clean_image_url;
///
/// assert_eq!(
///     clean_image_url("https://static.wikia.nocookie.net/shingekinokyojin/images/a/a1/Eren.png/revision/latest/scale-to-width-down/350?cb=20220123").as_deref(),
///     Some("https://static.wikia.nocookie.net/shingekinokyojin/images/a/a1/Eren.png")
/// );
/// assert_eq!(clean_image_url("https://host/plain.png").as_deref(), Some("https://host/plain.png"));
/// assert_eq!(clean_image_url("   "), None);
/// assert_eq!(clean_image_url("data:image/png;base64,AAAA"), None);
/// ```
pub fn clean_image_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = url::Url::parse(trimmed).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let cleaned = REVISION_SUFFIX.replace(trimmed, "");
    Some(cleaned.into_owned())
}

/// What a view should show for a record's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A cleaned remote URL
    Remote(String),
    /// Path of the local placeholder asset
    Placeholder(String),
}

impl ImageSource {
    /// Picks the cleaned remote URL, or the placeholder when there is none.
    pub fn resolve(raw: Option<&str>, placeholder: &str) -> Self {
        match raw.and_then(clean_image_url) {
            Some(url) => ImageSource::Remote(url),
            None => ImageSource::Placeholder(placeholder.to_string()),
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match self {
            ImageSource::Remote(url) => Some(url),
            ImageSource::Placeholder(_) => None,
        }
    }
}

/// Load state of the one image a details view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageStatus {
    #[default]
    Unknown,
    Loaded,
    Failed,
}

impl ImageStatus {
    /// Maps a probe result onto a status. Probe errors only ever flip the
    /// image to its fallback.
    pub fn from_probe(result: &Result<()>) -> Self {
        match result {
            Ok(()) => ImageStatus::Loaded,
            Err(_) => ImageStatus::Failed,
        }
    }

    /// Whether the initial badge should be rendered in place of the image.
    pub fn shows_badge(&self, source: &ImageSource) -> bool {
        matches!(self, ImageStatus::Failed) || matches!(source, ImageSource::Placeholder(_))
    }
}

/// The uppercase first letter of `name`, or `?` when the name is blank.
pub fn initial_badge(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_revision_suffix_is_stripped() {
        assert_eq!(
            clean_image_url("https://host/img/foo/revision/latest?x=1").as_deref(),
            Some("https://host/img/foo")
        );
        assert_eq!(
            clean_image_url("  http://host/a.jpg/revision/latest  ").as_deref(),
            Some("http://host/a.jpg")
        );
    }

    #[test]
    fn test_urls_without_suffix_keep_query() {
        assert_eq!(
            clean_image_url("https://host/a.png?size=large").as_deref(),
            Some("https://host/a.png?size=large")
        );
    }

    #[test]
    fn test_unusable_urls() {
        assert_eq!(clean_image_url(""), None);
        assert_eq!(clean_image_url("not a url"), None);
        assert_eq!(clean_image_url("ftp://host/a.png"), None);
    }

    #[test]
    fn test_resolve_falls_back_to_placeholder() {
        assert_eq!(
            ImageSource::resolve(Some("https://host/a.png/revision/latest"), "ph.png"),
            ImageSource::Remote("https://host/a.png".to_string())
        );
        assert_eq!(
            ImageSource::resolve(Some(""), "ph.png"),
            ImageSource::Placeholder("ph.png".to_string())
        );
        assert_eq!(ImageSource::resolve(None, "ph.png").remote_url(), None);
    }

    #[test]
    fn test_badge_after_failed_image_check() {
        let remote = ImageSource::Remote("https://host/a.png".to_string());
        let failed = ImageStatus::from_probe(&Err(Error::http(404, "https://host/a.png")));

        assert_eq!(failed, ImageStatus::Failed);
        assert!(failed.shows_badge(&remote));
        assert!(!ImageStatus::from_probe(&Ok(())).shows_badge(&remote));
        assert!(ImageStatus::Unknown.shows_badge(&ImageSource::Placeholder("ph.png".into())));
    }

    #[test]
    fn test_initial_badge() {
        assert_eq!(initial_badge("Eren Yeager"), 'E');
        assert_eq!(initial_badge("  ymir"), 'Y');
        assert_eq!(initial_badge(""), '?');
    }
}
