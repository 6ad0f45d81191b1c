pub mod analyze;
pub mod client;
pub mod error;
pub mod shorthand;

mod explore;
mod rate_limit;
mod suggestions;

pub use analyze::{analyze, run_analysis, AnalysisReport, HashtagSource, SeedSuggestions};
pub use client::HashtagClient;
pub use error::ScraperError;
pub use shorthand::parse_shorthand_count;
