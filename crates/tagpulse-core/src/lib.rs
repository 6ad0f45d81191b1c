pub mod app_config;
pub mod cache;
pub mod config;
pub mod ranking;
pub mod seed;

pub use app_config::AppConfig;
pub use cache::{CacheError, CountCache};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use ranking::{cache_key, rank_counts, RankedEntry};
pub use seed::{SeedError, SeedRequest};
