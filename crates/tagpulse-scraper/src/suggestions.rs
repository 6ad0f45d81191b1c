//! Extraction of related-hashtag tokens from a suggestion ranking page.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScraperError;

/// Class marker of the container that carries the suggested hashtags. The
/// page renders them as plain text inside this box, one `#token` after
/// another separated by whitespace.
const TAG_BOX_CLASS: &str = "tag-box tag-box-v3 margin-bottom-40";

static TAG_BOX_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*\bclass\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("valid tag-box regex")
});

static CLOSE_DIV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</div\s*>").expect("valid close-div regex"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag-strip regex"));

/// Pulls up to `top_n` whitespace-delimited tokens out of the tag box.
///
/// Tolerant scanning, not DOM parsing: the first `<div>` whose class list
/// contains the marker is taken, its content up to the next `</div>` is
/// stripped of nested tags, and the remaining text is split on whitespace.
///
/// # Errors
///
/// [`ScraperError::MissingMarkup`] when no such container exists in `html`
/// (the page layout changed, or the site served an error shell).
pub(crate) fn extract_suggestions(html: &str, top_n: usize) -> Result<Vec<String>, ScraperError> {
    let inner = tag_box_content(html).ok_or_else(|| ScraperError::MissingMarkup {
        context: format!("suggestion container <div class=\"{TAG_BOX_CLASS}\">"),
    })?;

    let text = ANY_TAG.replace_all(inner, " ");
    Ok(text
        .split_whitespace()
        .take(top_n)
        .map(str::to_string)
        .collect())
}

/// Returns the markup between the opening tag-box `<div>` and the next
/// `</div>`. The box is known to contain only inline content, so the first
/// close tag is the right boundary.
fn tag_box_content(html: &str) -> Option<&str> {
    for caps in TAG_BOX_OPEN.captures_iter(html) {
        let class_attr = caps.get(1)?.as_str();
        if !class_attr.contains(TAG_BOX_CLASS) {
            continue;
        }
        let body_start = caps.get(0)?.end();
        let rest = &html[body_start..];
        let body_end = CLOSE_DIV.find(rest).map_or(rest.len(), |m| m.start());
        return Some(&rest[..body_end]);
    }
    None
}

#[cfg(test)]
#[path = "suggestions_test.rs"]
mod tests;
