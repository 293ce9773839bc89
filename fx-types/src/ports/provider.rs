//! Exchange rate provider port.
//!
//! This trait defines the interface for upstream rate services.
//! Implementations can be HTTP clients, mock providers, etc.

use crate::domain::{CurrencyCode, RateSnapshot};

/// Error type for rate provider operations.
///
/// Each variant corresponds to one branch of the HTTP error mapping:
/// timeout -> 504, unreachable/provider/malformed -> 502, upstream status
/// passthrough, unsupported base -> 400.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to rate provider timed out")]
    Timeout,

    #[error("rate provider unreachable: {0}")]
    Unreachable(String),

    #[error("rate provider returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("base currency '{0}' is not supported by the provider")]
    UnsupportedBase(CurrencyCode),

    #[error("provider-reported error: {0}")]
    Provider(String),

    #[error("malformed provider payload: {0}")]
    Malformed(String),
}

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Fetches the current rate table for `base`.
    ///
    /// Single attempt, bounded by the implementation's timeout; the caller
    /// never retries.
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateSnapshot, ProviderError>;
}
