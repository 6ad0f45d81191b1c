//! The aggregation pass: seeds in, ranked popularity table out.
//!
//! One run walks the seed requests in order, fetches suggestions per seed,
//! resolves a count per suggested hashtag (consulting the cache first), and
//! builds the ranked table. The cache is mutated as soon as a count comes
//! back, so a hashtag surfacing under several seeds within the same run is
//! resolved over the network at most once.

use tagpulse_core::{cache_key, rank_counts, CacheError, CountCache, RankedEntry, SeedRequest};

use crate::client::HashtagClient;

/// The two network-facing operations the aggregator needs. Implemented by
/// [`HashtagClient`]; tests substitute a canned stub, and the cache is
/// injected by the caller, so the whole pass runs without I/O.
#[allow(async_fn_in_trait)]
pub trait HashtagSource {
    /// Up to `top_n` related hashtags for a seed; empty on failure.
    async fn fetch_suggestions(&self, tag: &str, top_n: usize) -> Vec<String>;
    /// Approximate post count for one hashtag; 0 on failure.
    async fn resolve_count(&self, hashtag: &str) -> u64;
}

impl HashtagSource for HashtagClient {
    async fn fetch_suggestions(&self, tag: &str, top_n: usize) -> Vec<String> {
        HashtagClient::fetch_suggestions(self, tag, top_n).await
    }

    async fn resolve_count(&self, hashtag: &str) -> u64 {
        HashtagClient::resolve_count(self, hashtag).await
    }
}

/// Suggestions that came back for one seed, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSuggestions {
    pub seed: String,
    pub hashtags: Vec<String>,
}

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Ranked table across all seeds: descending by count, zero counts
    /// excluded, duplicates across seeds kept as separate rows.
    pub global: Vec<RankedEntry>,
    /// Per-seed suggestion lists in request order (including seeds that
    /// produced nothing).
    pub per_seed: Vec<SeedSuggestions>,
}

impl AnalysisReport {
    /// Every suggested hashtag across all seeds, in encounter order,
    /// duplicates included — the "combined" view.
    #[must_use]
    pub fn all_hashtags(&self) -> Vec<&str> {
        self.per_seed
            .iter()
            .flat_map(|s| s.hashtags.iter().map(String::as_str))
            .collect()
    }
}

/// Runs the aggregation pass against `source`, reusing and filling `cache`.
///
/// Purely in-memory apart from what `source` does; the caller decides when
/// (and whether) the cache is persisted. See [`run_analysis`] for the
/// persist-at-the-end variant the CLI uses.
pub async fn analyze<S: HashtagSource>(
    source: &S,
    requests: &[SeedRequest],
    cache: &mut CountCache,
) -> AnalysisReport {
    let mut flat: Vec<(String, u64)> = Vec::new();
    let mut per_seed = Vec::with_capacity(requests.len());

    for request in requests {
        let hashtags = source
            .fetch_suggestions(request.tag(), request.top_n())
            .await;
        tracing::info!(
            seed = request.tag(),
            requested = request.top_n(),
            received = hashtags.len(),
            "fetched suggestions"
        );

        for hashtag in &hashtags {
            let key = cache_key(hashtag);
            let count = if let Some(cached) = cache.get(key) {
                tracing::debug!(hashtag = key, count = cached, "cache hit");
                cached
            } else {
                let resolved = source.resolve_count(key).await;
                cache.insert(key, resolved);
                resolved
            };
            flat.push((hashtag.clone(), count));
        }

        per_seed.push(SeedSuggestions {
            seed: request.tag().to_string(),
            hashtags,
        });
    }

    AnalysisReport {
        global: rank_counts(flat),
        per_seed,
    }
}

/// [`analyze`], then one cache flush after all seeds are processed.
///
/// # Errors
///
/// Only [`CacheError`] from the final persist propagates; scraping failures
/// have already degraded per item inside the report.
pub async fn run_analysis<S: HashtagSource>(
    source: &S,
    requests: &[SeedRequest],
    cache: &mut CountCache,
) -> Result<AnalysisReport, CacheError> {
    let report = analyze(source, requests, cache).await;
    cache.persist()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    /// Canned source: fixed suggestion lists and counts, with a resolution
    /// counter to assert cache idempotence.
    struct StubSource {
        suggestions: HashMap<&'static str, Vec<&'static str>>,
        counts: HashMap<&'static str, u64>,
        resolve_calls: AtomicU32,
    }

    impl StubSource {
        fn new(
            suggestions: &[(&'static str, &[&'static str])],
            counts: &[(&'static str, u64)],
        ) -> Self {
            Self {
                suggestions: suggestions
                    .iter()
                    .map(|(seed, tags)| (*seed, tags.to_vec()))
                    .collect(),
                counts: counts.iter().copied().collect(),
                resolve_calls: AtomicU32::new(0),
            }
        }

        fn resolve_call_count(&self) -> u32 {
            self.resolve_calls.load(Ordering::SeqCst)
        }
    }

    impl HashtagSource for StubSource {
        async fn fetch_suggestions(&self, tag: &str, top_n: usize) -> Vec<String> {
            self.suggestions
                .get(tag)
                .map(|tags| tags.iter().take(top_n).map(|t| (*t).to_string()).collect())
                .unwrap_or_default()
        }

        async fn resolve_count(&self, hashtag: &str) -> u64 {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            self.counts.get(hashtag).copied().unwrap_or(0)
        }
    }

    fn seed(tag: &str, top_n: usize) -> SeedRequest {
        SeedRequest::new(tag, top_n).unwrap()
    }

    #[tokio::test]
    async fn ranks_resolved_counts_descending() {
        let source = StubSource::new(
            &[("travel", &["#beach", "#sunset", "#ocean"])],
            &[("beach", 500), ("sunset", 2_000_000), ("ocean", 1500)],
        );
        let mut cache = CountCache::in_memory();

        let report = analyze(&source, &[seed("travel", 3)], &mut cache).await;

        let order: Vec<(&str, u64)> = report
            .global
            .iter()
            .map(|e| (e.hashtag.as_str(), e.count))
            .collect();
        assert_eq!(
            order,
            [("#sunset", 2_000_000), ("#ocean", 1500), ("#beach", 500)]
        );

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("beach"), Some(500));
        assert_eq!(cache.get("sunset"), Some(2_000_000));
        assert_eq!(cache.get("ocean"), Some(1500));
    }

    #[tokio::test]
    async fn shared_hashtag_across_seeds_is_resolved_once_but_listed_twice() {
        let source = StubSource::new(
            &[("vacation", &["#travel"]), ("wanderlust", &["#travel"])],
            &[("travel", 900)],
        );
        let mut cache = CountCache::in_memory();

        let report = analyze(
            &source,
            &[seed("vacation", 5), seed("wanderlust", 5)],
            &mut cache,
        )
        .await;

        assert_eq!(source.resolve_call_count(), 1, "second occurrence must hit the cache");
        assert_eq!(report.global.len(), 2);
        assert!(report
            .global
            .iter()
            .all(|e| e.hashtag == "#travel" && e.count == 900));
    }

    #[tokio::test]
    async fn cached_hashtag_is_never_resolved() {
        let source = StubSource::new(&[("travel", &["#beach"])], &[("beach", 123)]);
        let mut cache = CountCache::in_memory();
        cache.insert("beach", 777);

        let report = analyze(&source, &[seed("travel", 5)], &mut cache).await;

        assert_eq!(source.resolve_call_count(), 0);
        assert_eq!(report.global[0].count, 777, "stale cache entries win");
    }

    #[tokio::test]
    async fn zero_counts_are_cached_but_not_ranked() {
        let source = StubSource::new(&[("niche", &["#obscure", "#known"])], &[("known", 10)]);
        let mut cache = CountCache::in_memory();

        let report = analyze(&source, &[seed("niche", 5)], &mut cache).await;

        assert_eq!(report.global.len(), 1);
        assert_eq!(report.global[0].hashtag, "#known");
        // The failed resolution is cached as 0 and not retried next run.
        assert_eq!(cache.get("obscure"), Some(0));
    }

    #[tokio::test]
    async fn seed_with_no_suggestions_still_appears_in_per_seed_view() {
        let source = StubSource::new(&[("travel", &["#beach"])], &[("beach", 5)]);
        let mut cache = CountCache::in_memory();

        let report = analyze(
            &source,
            &[seed("unknownseed", 5), seed("travel", 5)],
            &mut cache,
        )
        .await;

        assert_eq!(report.per_seed.len(), 2);
        assert_eq!(report.per_seed[0].seed, "unknownseed");
        assert!(report.per_seed[0].hashtags.is_empty());
        assert_eq!(report.per_seed[1].hashtags, ["#beach"]);
    }

    #[tokio::test]
    async fn all_hashtags_keeps_encounter_order_and_duplicates() {
        let source = StubSource::new(
            &[("a", &["#x", "#y"]), ("b", &["#x"])],
            &[("x", 1), ("y", 2)],
        );
        let mut cache = CountCache::in_memory();

        let report = analyze(&source, &[seed("a", 5), seed("b", 5)], &mut cache).await;
        assert_eq!(report.all_hashtags(), ["#x", "#y", "#x"]);
    }

    #[tokio::test]
    async fn run_analysis_persists_in_memory_cache_without_error() {
        let source = StubSource::new(&[("travel", &["#beach"])], &[("beach", 5)]);
        let mut cache = CountCache::in_memory();

        let report = run_analysis(&source, &[seed("travel", 5)], &mut cache)
            .await
            .unwrap();
        assert_eq!(report.global.len(), 1);
    }
}
