//! Extraction of the post count from a hashtag exploration page.
//!
//! The page does not expose the count in a labeled element; it sits in the
//! `content` attribute of the seventh `<meta>` tag, as the first
//! whitespace-delimited token (e.g. `"1.2M posts - see photos ..."`).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScraperError;
use crate::shorthand::parse_shorthand_count;

/// Zero-based index of the `<meta>` tag that carries the count.
const COUNT_META_INDEX: usize = 6;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta-tag regex"));

static CONTENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bcontent\s*=\s*["']([^"']*)["']"#).expect("valid content-attr regex")
});

/// Parses the approximate post count out of an exploration page.
///
/// # Errors
///
/// [`ScraperError::MissingMarkup`] when the page has fewer than seven
/// `<meta>` tags or the seventh has no `content` attribute;
/// [`ScraperError::MalformedCount`] when the leading token of that
/// attribute is not a shorthand number.
pub(crate) fn extract_count(html: &str) -> Result<u64, ScraperError> {
    let meta = META_TAG
        .find_iter(html)
        .nth(COUNT_META_INDEX)
        .ok_or_else(|| ScraperError::MissingMarkup {
            context: format!("page has fewer than {} <meta> tags", COUNT_META_INDEX + 1),
        })?;

    let content = CONTENT_ATTR
        .captures(meta.as_str())
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ScraperError::MissingMarkup {
            context: "count <meta> tag has no content attribute".to_string(),
        })?
        .as_str();

    let token = content.split_whitespace().next().unwrap_or("");
    parse_shorthand_count(token).ok_or_else(|| ScraperError::MalformedCount {
        token: token.to_string(),
    })
}
