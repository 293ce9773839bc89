//! Exchange rate snapshot for a single base currency.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::CurrencyCode;

/// Optional provider metadata passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    pub documentation: Option<String>,
    pub terms_of_use: Option<String>,
}

/// The set of exchange rates for one base currency at one point in time.
///
/// Immutable once fetched; a snapshot lives for the duration of a single
/// request. Rates are kept at full provider precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    pub rates: BTreeMap<CurrencyCode, Decimal>,
    pub last_updated: Option<String>,
    pub next_update: Option<String>,
    pub metadata: Option<ProviderMetadata>,
}

impl RateSnapshot {
    /// Looks up the rate for a target currency, if the provider quoted one.
    pub fn rate_for(&self, target: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(target).copied()
    }
}
