//! The conversion engine: amount x rate, rounded half-up at 2 decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::{CurrencyCode, RateSnapshot};
use crate::error::DomainError;

/// A computed conversion, before it is assigned a history identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: Decimal,
    pub result: Decimal,
    pub rate: Decimal,
    pub last_updated: Option<String>,
    pub timestamp: String,
}

/// Parses a request-supplied amount into a decimal.
///
/// Request payloads may carry the amount as a JSON number or a numeric
/// string; anything else fails with [`DomainError::InvalidAmount`].
pub fn parse_amount(raw: &serde_json::Value) -> Result<Decimal, DomainError> {
    let text = match raw {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        other => return Err(DomainError::InvalidAmount(other.to_string())),
    };
    Decimal::from_str(&text).map_err(|_| DomainError::InvalidAmount(text))
}

/// Converts `amount` from the snapshot's base currency into `to`.
///
/// The product is computed with arbitrary-precision decimal arithmetic and
/// rounded half-up (midpoint away from zero) at 2 decimal places only at this
/// point; the rate itself is carried at full provider precision.
pub fn convert(
    from: &CurrencyCode,
    to: &CurrencyCode,
    amount: Decimal,
    snapshot: &RateSnapshot,
) -> Result<Conversion, DomainError> {
    if snapshot.base != *from {
        return Err(DomainError::BaseMismatch {
            expected: from.clone(),
            got: snapshot.base.clone(),
        });
    }

    let rate = snapshot
        .rate_for(to)
        .ok_or_else(|| DomainError::UnsupportedTargetCurrency(to.clone()))?;

    let result =
        (amount * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(Conversion {
        from: from.clone(),
        to: to.clone(),
        amount,
        result,
        rate,
        last_updated: snapshot.last_updated.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
