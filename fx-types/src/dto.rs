//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Request DTOs keep every field optional and validation happens in an
//! explicit pass in the service layer, so a missing or malformed field is a
//! uniform 400 rather than a serde rejection.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::{
    ConversionRecord, CurrencyCode, ProviderMetadata, RateSnapshot, RecordPatch, parse_amount,
};
use crate::error::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for a conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub amount: Option<serde_json::Value>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Response after a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub result: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    pub last_updated: Option<String>,
    pub timestamp: String,
}

impl From<ConversionRecord> for ConvertResponse {
    fn from(record: ConversionRecord) -> Self {
        Self {
            success: true,
            from: record.from,
            to: record.to,
            amount: record.amount,
            result: record.result,
            rate: record.rate,
            last_updated: record.last_updated,
            timestamp: record.timestamp,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for the rates endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatesQuery {
    pub base: Option<String>,
}

/// Rate table response for one base currency.
#[derive(Debug, Clone, Serialize)]
pub struct RatesResponse {
    pub success: bool,
    pub base: CurrencyCode,
    #[serde(serialize_with = "serialize_rates")]
    pub rates: BTreeMap<CurrencyCode, Decimal>,
    pub last_updated: Option<String>,
    pub next_update: Option<String>,
    pub metadata: Option<ProviderMetadata>,
}

impl From<RateSnapshot> for RatesResponse {
    fn from(snapshot: RateSnapshot) -> Self {
        Self {
            success: true,
            base: snapshot.base,
            rates: snapshot.rates,
            last_updated: snapshot.last_updated,
            next_update: snapshot.next_update,
            metadata: snapshot.metadata,
        }
    }
}

fn serialize_rates<S: Serializer>(
    rates: &BTreeMap<CurrencyCode, Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        rates
            .iter()
            .map(|(code, rate)| (code, rate.to_f64().unwrap_or_default())),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// History DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for the history listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

/// History listing, annotated with where the data came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<ConversionRecord>,
    /// `"store"` when read from the backing store, `"mock"` for the static
    /// fallback dataset.
    pub source: String,
}

/// Request body for an explicit history create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<serde_json::Value>,
    pub result: Option<serde_json::Value>,
    pub rate: Option<serde_json::Value>,
    pub last_updated: Option<String>,
    pub timestamp: Option<String>,
}

/// Response after an explicit history create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecordResponse {
    pub success: bool,
    pub message: String,
    pub data: ConversionRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Single-record response for point lookups and updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub success: bool,
    pub conversion: ConversionRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Request body for a partial history update.
///
/// Unknown fields are silently ignored; fields outside the allow-list never
/// reach the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<serde_json::Value>,
    pub result: Option<serde_json::Value>,
    pub rate: Option<serde_json::Value>,
    pub last_updated: Option<String>,
}

impl UpdateRecordRequest {
    /// Validates the present fields into a typed patch.
    pub fn into_patch(self) -> Result<RecordPatch, DomainError> {
        Ok(RecordPatch {
            from: self.from.as_deref().map(CurrencyCode::parse).transpose()?,
            to: self.to.as_deref().map(CurrencyCode::parse).transpose()?,
            amount: self.amount.as_ref().map(parse_amount).transpose()?,
            result: self.result.as_ref().map(parse_amount).transpose()?,
            rate: self.rate.as_ref().map(parse_amount).transpose()?,
            last_updated: self.last_updated,
        })
    }
}

/// Generic success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
