use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tagpulse_core::CountCache;
use tagpulse_scraper::{run_analysis, HashtagClient};

mod report;
mod seeds;

#[derive(Debug, Parser)]
#[command(name = "tagpulse")]
#[command(about = "Fetch related hashtags, resolve approximate post counts, and rank them")]
struct Cli {
    /// Seed hashtags, each as TAG or TAG:TOP_N (top-n in 1..=10)
    #[arg(required = true, value_name = "SEED[:TOP_N]")]
    seeds: Vec<String>,

    /// Suggestions to fetch per seed when no per-seed top-n is given
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Cache file path (overrides TAGPULSE_CACHE_PATH)
    #[arg(long, value_name = "PATH")]
    cache: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = tagpulse_core::load_app_config_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let requests = seeds::parse_seeds(&cli.seeds, cli.top_n)?;
    let cache_path = cli.cache.unwrap_or_else(|| config.cache_path.clone());

    let mut cache = CountCache::load(&cache_path)?;
    tracing::info!(
        cache = %cache_path.display(),
        cached_entries = cache.len(),
        seeds = requests.len(),
        "starting analysis run"
    );

    let client = HashtagClient::new(&config)?;
    let report = run_analysis(&client, &requests, &mut cache).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render_report(&report, &mut out)?;
    out.flush()?;

    Ok(())
}
