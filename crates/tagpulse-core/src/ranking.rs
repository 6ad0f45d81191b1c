//! Ranked popularity table built from resolved (hashtag, count) pairs.

/// One row of the ranked output: a hashtag in its scraped form (usually
/// `#`-prefixed) and its approximate post count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub hashtag: String,
    pub count: u64,
}

/// Returns the cache key for a scraped hashtag token: the leading `#` is
/// stripped, everything else (including case) is kept as scraped.
#[must_use]
pub fn cache_key(hashtag: &str) -> &str {
    hashtag.trim_start_matches('#')
}

/// Builds the ranked table from the flat list of resolved pairs.
///
/// Entries with a zero count are dropped (a zero means the count could not
/// be resolved, not that the hashtag is unused). The sort is stable and
/// descending by count, so pairs that tie keep their encounter order, and
/// duplicates in the input survive as duplicate rows.
#[must_use]
pub fn rank_counts(pairs: Vec<(String, u64)>) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = pairs
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(hashtag, count)| RankedEntry { hashtag, count })
        .collect();
    entries.sort_by_key(|e| std::cmp::Reverse(e.count));
    entries
}
