use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("TAGPULSE_LOG_LEVEL", "info");
    let cache_path = PathBuf::from(or_default("TAGPULSE_CACHE_PATH", "./database.json"));

    let suggest_base_url = trim_origin(&or_default(
        "TAGPULSE_SUGGEST_BASE_URL",
        "https://best-hashtags.com",
    ));
    let count_base_url = trim_origin(&or_default(
        "TAGPULSE_COUNT_BASE_URL",
        "https://www.instagram.com",
    ));

    let request_timeout_secs = parse_u64("TAGPULSE_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("TAGPULSE_USER_AGENT", "tagpulse/0.1 (hashtag-research)");
    let max_retries = parse_u32("TAGPULSE_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("TAGPULSE_RETRY_BACKOFF_BASE_MS", "1000")?;
    let inter_request_delay_ms = parse_u64("TAGPULSE_INTER_REQUEST_DELAY_MS", "400")?;

    Ok(AppConfig {
        log_level,
        cache_path,
        suggest_base_url,
        count_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        inter_request_delay_ms,
    })
}

/// Normalizes a configured origin: trailing slashes are stripped so URL
/// construction can always join with a single `/`.
fn trim_origin(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
