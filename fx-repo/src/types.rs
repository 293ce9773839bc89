//! Shared database row types for the history adapters.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::FromRow;

use fx_types::{ConversionRecord, CurrencyCode, StoreError};

/// Fixed partition value; all history records share one partition and are
/// ordered within it by sort key.
pub const PARTITION_KEY: &str = "conversion#history";

/// History row from the database. All monetary columns are TEXT so values
/// round-trip at full precision.
#[derive(FromRow)]
pub struct DbConversionRow {
    pub sk: String,
    pub from_code: String,
    pub to_code: String,
    pub amount: String,
    pub result: String,
    pub rate: String,
    pub created_at: String,
    pub last_updated: Option<String>,
}

impl DbConversionRow {
    pub fn into_domain(self) -> Result<ConversionRecord, StoreError> {
        Ok(ConversionRecord {
            id: self.sk,
            from: parse_code(&self.from_code)?,
            to: parse_code(&self.to_code)?,
            amount: parse_decimal(&self.amount)?,
            result: parse_decimal(&self.result)?,
            rate: parse_decimal(&self.rate)?,
            timestamp: self.created_at,
            last_updated: self.last_updated,
        })
    }
}

fn parse_code(raw: &str) -> Result<CurrencyCode, StoreError> {
    CurrencyCode::parse(raw).map_err(|e| StoreError::Decode(e.to_string()))
}

fn parse_decimal(raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw).map_err(|e| StoreError::Decode(format!("'{raw}': {e}")))
}
