use thiserror::Error;

/// Bounds for the per-seed suggestion limit.
pub const MIN_TOP_N: usize = 1;
pub const MAX_TOP_N: usize = 10;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed tag is empty")]
    EmptyTag,

    #[error("top-n {0} is out of range {MIN_TOP_N}..={MAX_TOP_N}")]
    TopNOutOfRange(usize),
}

/// One user-supplied starting hashtag plus the number of related
/// suggestions to fetch for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequest {
    tag: String,
    top_n: usize,
}

impl SeedRequest {
    /// Builds a validated seed request.
    ///
    /// The tag is trimmed and any leading `#` is stripped; the
    /// suggestion site addresses ranking pages by bare tag name.
    ///
    /// # Errors
    ///
    /// [`SeedError::EmptyTag`] if nothing remains after trimming, or
    /// [`SeedError::TopNOutOfRange`] if `top_n` is outside `1..=10`.
    pub fn new(tag: &str, top_n: usize) -> Result<Self, SeedError> {
        let tag = tag.trim().trim_start_matches('#').trim();
        if tag.is_empty() {
            return Err(SeedError::EmptyTag);
        }
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&top_n) {
            return Err(SeedError::TopNOutOfRange(top_n));
        }
        Ok(Self {
            tag: tag.to_string(),
            top_n,
        })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }
}
