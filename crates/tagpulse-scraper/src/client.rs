use std::time::Duration;

use rand::Rng;
use reqwest::Client;

use tagpulse_core::{cache_key, AppConfig};

use crate::error::ScraperError;
use crate::explore::extract_count;
use crate::rate_limit::{retry_with_backoff, RetryPolicy};
use crate::suggestions::extract_suggestions;

/// Rotation pool for the suggestion path. The ranking site blocks repeat
/// clients by User-Agent; each retry attempt identifies as a different
/// mainstream browser.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// HTTP client for the two external hashtag sites.
///
/// Both public operations degrade on failure instead of propagating:
/// [`Self::fetch_suggestions`] returns an empty list and
/// [`Self::resolve_count`] returns 0, with the underlying error reported
/// through `tracing`. The caller can always proceed with partial results.
pub struct HashtagClient {
    client: Client,
    suggest_base_url: String,
    count_base_url: String,
    /// Additional attempts after the first failure for retriable errors.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    backoff_base_ms: u64,
    /// Upper bound of the jittered politeness delay before count requests.
    inter_request_delay_ms: u64,
}

impl HashtagClient {
    /// Creates a client from the application config: request and connect
    /// timeouts, default `User-Agent`, site origins, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            suggest_base_url: config.suggest_base_url.trim_end_matches('/').to_string(),
            count_base_url: config.count_base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            inter_request_delay_ms: config.inter_request_delay_ms,
        })
    }

    /// Fetches up to `top_n` related hashtags for `tag` from the ranking
    /// site. Never fails: any error degrades to an empty list and is logged.
    pub async fn fetch_suggestions(&self, tag: &str, top_n: usize) -> Vec<String> {
        match self.try_fetch_suggestions(tag, top_n).await {
            Ok(tags) => tags,
            Err(err) => {
                tracing::warn!(tag, error = %err, "suggestion fetch failed — no suggestions available");
                Vec::new()
            }
        }
    }

    /// Resolves the approximate post count for a hashtag. Never fails: any
    /// error degrades to 0 and is logged.
    pub async fn resolve_count(&self, hashtag: &str) -> u64 {
        self.pace().await;
        match self.try_resolve_count(hashtag).await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(hashtag, error = %err, "count resolution failed — treating as 0");
                0
            }
        }
    }

    /// Fortified suggestion fetch: 429 and transport failures are retried
    /// with jittered backoff, and every attempt draws a fresh User-Agent
    /// from the rotation pool.
    async fn try_fetch_suggestions(
        &self,
        tag: &str,
        top_n: usize,
    ) -> Result<Vec<String>, ScraperError> {
        let url = format!("{}/hashtag/{}/", self.suggest_base_url, tag.trim());
        retry_with_backoff(
            RetryPolicy::TransientAndRateLimit,
            self.max_retries,
            self.backoff_base_ms,
            || {
                let url = url.clone();
                async move {
                    let ua = pick_user_agent();
                    let html = self.get_page(&url, Some(ua)).await?;
                    extract_suggestions(&html, top_n)
                }
            },
        )
        .await
    }

    /// Fortified count resolution: only 429 is retried (bounded, with
    /// backoff); every other failure terminates immediately.
    async fn try_resolve_count(&self, hashtag: &str) -> Result<u64, ScraperError> {
        let url = format!(
            "{}/explore/tags/{}/",
            self.count_base_url,
            cache_key(hashtag.trim())
        );
        retry_with_backoff(
            RetryPolicy::RateLimitOnly,
            self.max_retries,
            self.backoff_base_ms,
            || {
                let url = url.clone();
                async move {
                    let html = self.get_page(&url, None).await?;
                    extract_count(&html)
                }
            },
        )
        .await
    }

    /// One GET with status triage. `user_agent` overrides the client-level
    /// default for this request only.
    async fn get_page(&self, url: &str, user_agent: Option<&str>) -> Result<String, ScraperError> {
        let mut request = self.client.get(url);
        if let Some(ua) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, ua);
        }
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited {
                host: extract_host(url),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Politeness pause before a count request: a random delay up to the
    /// configured bound, so successive resolutions don't hammer the site at
    /// a fixed cadence.
    async fn pace(&self) {
        if self.inter_request_delay_ms == 0 {
            return;
        }
        let delay_ms = rand::rng().random_range(0..=self.inter_request_delay_ms);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

fn pick_user_agent() -> &'static str {
    USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())]
}

/// Hostname portion of `url` for error messages; falls back to the full
/// string if it doesn't look like a URL.
fn extract_host(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(url)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_host_strips_scheme_and_path() {
        assert_eq!(
            extract_host("https://best-hashtags.com/hashtag/travel/"),
            "best-hashtags.com"
        );
        assert_eq!(extract_host("http://127.0.0.1:9000/x"), "127.0.0.1:9000");
        assert_eq!(extract_host("weird"), "weird");
    }

    #[test]
    fn pick_user_agent_draws_from_pool() {
        for _ in 0..32 {
            assert!(USER_AGENTS.contains(&pick_user_agent()));
        }
    }
}
