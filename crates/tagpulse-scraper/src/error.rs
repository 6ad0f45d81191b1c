use thiserror::Error;

/// Internal error taxonomy for the two scraping paths.
///
/// These never cross the public `fetch_suggestions` / `resolve_count`
/// boundary: both degrade to their empty/zero defaults and report the error
/// through `tracing` instead. The variants exist so the retry policy can
/// distinguish rate limiting from everything else, and so the log channel
/// carries a precise failure reason.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {host} (retry after {retry_after_secs}s)")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("expected markup not found: {context}")]
    MissingMarkup { context: String },

    #[error("count token \"{token}\" is not a recognizable shorthand number")]
    MalformedCount { token: String },
}
