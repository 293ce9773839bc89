//! # FX Provider
//!
//! Outbound HTTP adapter for the upstream exchange rate service.
//!
//! Speaks the `GET {base_url}/{BASE}` shape of open.er-api.com style
//! providers and translates transport and payload failures into the typed
//! [`ProviderError`] taxonomy. One attempt per request, bounded by the
//! client timeout; retrying is deliberately the caller's non-concern.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use fx_types::{CurrencyCode, ProviderError, ProviderMetadata, RateProvider, RateSnapshot};

/// Default upstream request timeout, overridable via configuration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP implementation of the [`RateProvider`] port.
pub struct HttpRateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateProvider {
    /// Creates a provider client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Raw upstream payload. The provider has shipped two field namings for the
/// rate table over time; both are accepted.
#[derive(Debug, Deserialize)]
struct RawRatesPayload {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    rates: Option<serde_json::Value>,
    conversion_rates: Option<serde_json::Value>,
    time_last_update_utc: Option<String>,
    time_last_update: Option<String>,
    time_next_update_utc: Option<String>,
    time_next_update: Option<String>,
    documentation: Option<String>,
    terms_of_use: Option<String>,
}

#[async_trait::async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateSnapshot, ProviderError> {
        let url = format!("{}/{}", self.base_url, base);

        tracing::debug!(%url, "fetching exchange rates");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UpstreamStatus(status.as_u16()));
        }

        let payload: RawRatesPayload = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if payload.result.as_deref() == Some("error") {
            let tag = payload
                .error_type
                .unwrap_or_else(|| "exchange_rate_error".to_string());
            if tag == "unsupported-code" {
                return Err(ProviderError::UnsupportedBase(base.clone()));
            }
            return Err(ProviderError::Provider(tag));
        }

        let raw_rates = payload
            .rates
            .or(payload.conversion_rates)
            .ok_or_else(|| ProviderError::Malformed("missing rates table".into()))?;

        Ok(RateSnapshot {
            base: base.clone(),
            rates: parse_rate_table(raw_rates)?,
            last_updated: payload.time_last_update_utc.or(payload.time_last_update),
            next_update: payload.time_next_update_utc.or(payload.time_next_update),
            metadata: build_metadata(payload.documentation, payload.terms_of_use),
        })
    }
}

fn classify_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Unreachable(err.to_string())
    }
}

/// Validates that the rate table is a flat mapping of code to number and
/// parses each rate at full provider precision.
fn parse_rate_table(
    raw: serde_json::Value,
) -> Result<BTreeMap<CurrencyCode, Decimal>, ProviderError> {
    let serde_json::Value::Object(entries) = raw else {
        return Err(ProviderError::Malformed("rates table is not a mapping".into()));
    };

    let mut rates = BTreeMap::new();
    for (key, value) in entries {
        let code = CurrencyCode::parse(&key)
            .map_err(|_| ProviderError::Malformed(format!("invalid rate key '{key}'")))?;
        let rate = match &value {
            serde_json::Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        }
        .ok_or_else(|| ProviderError::Malformed(format!("rate for '{code}' is not a number")))?;
        rates.insert(code, rate);
    }
    Ok(rates)
}

fn build_metadata(
    documentation: Option<String>,
    terms_of_use: Option<String>,
) -> Option<ProviderMetadata> {
    if documentation.is_none() && terms_of_use.is_none() {
        return None;
    }
    Some(ProviderMetadata {
        documentation,
        terms_of_use,
    })
}
