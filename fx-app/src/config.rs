//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Default upstream rate provider, keyed by base currency path segment.
const DEFAULT_API_BASE: &str = "https://open.er-api.com/v6/latest";

/// Application configuration.
pub struct Config {
    pub port: u16,
    /// History storage is optional; with no URL the API runs with the
    /// static fallback history.
    pub database_url: Option<String>,
    pub exchange_api_base: String,
    pub exchange_api_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").ok();

        let exchange_api_base =
            env::var("EXCHANGE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let exchange_api_timeout = match env::var("EXCHANGE_API_TIMEOUT") {
            Ok(secs) => Duration::from_secs(secs.parse()?),
            Err(_) => fx_provider::DEFAULT_TIMEOUT,
        };

        Ok(Self {
            port,
            database_url,
            exchange_api_base,
            exchange_api_timeout,
        })
    }
}
