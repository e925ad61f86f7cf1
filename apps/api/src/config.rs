use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::layout::PageSize;

/// Application configuration loaded from environment variables.
/// Every setting has a default; startup fails only on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub page_size: PageSize,
    pub image_fetch_timeout: Duration,
    pub image_max_bytes: usize,
    pub print_fallback: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            page_size: PageSize::A4,
            image_fetch_timeout: Duration::from_secs(10),
            image_max_bytes: 10 * 1024 * 1024,
            print_fallback: Duration::from_millis(1500),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let page_size = match lookup("PAGE_SIZE") {
            Some(raw) => PageSize::from_str(&raw).map_err(|e| anyhow!("PAGE_SIZE: {e}"))?,
            None => defaults.page_size,
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            page_size,
            image_fetch_timeout: Duration::from_secs(
                parse_or(&lookup, "IMAGE_FETCH_TIMEOUT_SECS", 10u64)
                    .context("IMAGE_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            image_max_bytes: parse_or(&lookup, "IMAGE_MAX_BYTES", defaults.image_max_bytes)
                .context("IMAGE_MAX_BYTES must be a byte count")?,
            print_fallback: Duration::from_millis(
                parse_or(&lookup, "PRINT_FALLBACK_MS", 1500u64)
                    .context("PRINT_FALLBACK_MS must be a whole number of milliseconds")?,
            ),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for {key}")),
        None => Ok(default),
    }
}
