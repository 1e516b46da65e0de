use anyhow::{Context, Result};
use dotenvy::dotenv;
use lot_scout::ScoutConfig;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Marketplace API app id; blank or unset selects the scraping path
    pub ebay_app_id: Option<String>,
    pub max_concurrent_lots: usize,
    pub listing_requests_per_second: u32,
    pub comps_delay_min_ms: u64,
    pub comps_delay_max_ms: u64,
    pub request_timeout_secs: u64,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = ScoutConfig::default();

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            ebay_app_id: env::var("EBAY_APP_ID")
                .ok()
                .filter(|id| !id.trim().is_empty()),
            max_concurrent_lots: parse_var("MAX_CONCURRENT_LOTS", defaults.max_concurrent_lots)?,
            listing_requests_per_second: parse_var(
                "LISTING_REQUESTS_PER_SECOND",
                defaults.listing_requests_per_second,
            )?,
            comps_delay_min_ms: parse_var("COMPS_DELAY_MIN_MS", defaults.comps_delay_min_ms)?,
            comps_delay_max_ms: parse_var("COMPS_DELAY_MAX_MS", defaults.comps_delay_max_ms)?,
            request_timeout_secs: at_least_one(
                "REQUEST_TIMEOUT_SECS",
                parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            )?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|origins| split_origins(&origins))
                .unwrap_or_default(),
        })
    }

    /// Library configuration for the scout pipeline.
    pub fn scout_config(&self) -> ScoutConfig {
        let config = ScoutConfig::new()
            .with_max_concurrent_lots(self.max_concurrent_lots)
            .with_listing_rate(self.listing_requests_per_second)
            .with_comps_delay(self.comps_delay_min_ms, self.comps_delay_max_ms)
            .with_request_timeout(self.request_timeout_secs);

        match &self.ebay_app_id {
            Some(app_id) => config.with_ebay_app_id(app_id.clone()),
            None => config,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        _ => Ok(default),
    }
}

/// A zero timeout would fail every request.
fn at_least_one(name: &str, value: u64) -> Result<u64> {
    if value == 0 {
        anyhow::bail!("{} must be at least 1", name);
    }
    Ok(value)
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
