use std::path::PathBuf;

/// Runtime configuration for one analysis run.
///
/// Every field has a working default; the environment only needs to be
/// touched to redirect the cache file, point the scraper at different
/// origins (the integration tests do this), or tune the retry policy.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Path of the persistent hashtag → count cache file.
    pub cache_path: PathBuf,
    /// Origin of the hashtag-suggestion site.
    pub suggest_base_url: String,
    /// Origin of the count-resolution site.
    pub count_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub retry_backoff_base_ms: u64,
    /// Politeness delay before each count request (jittered).
    pub inter_request_delay_ms: u64,
}
