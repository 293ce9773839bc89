//! Persisted conversion history records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Conversion, CurrencyCode};

/// A conversion history entry.
///
/// The `id` doubles as the store sort key: it begins with the creation
/// timestamp, so lexicographic order on ids is chronological order. Monetary
/// fields are kept at full precision; rounding happened when the result was
/// computed, never afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub id: String,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub result: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    pub timestamp: String,
    pub last_updated: Option<String>,
}

impl ConversionRecord {
    /// Wraps a computed conversion into a record with a fresh identifier.
    pub fn new(conversion: Conversion) -> Self {
        Self {
            id: record_id(&conversion.timestamp),
            from: conversion.from,
            to: conversion.to,
            amount: conversion.amount,
            result: conversion.result,
            rate: conversion.rate,
            timestamp: conversion.timestamp,
            last_updated: conversion.last_updated,
        }
    }
}

/// Derives a unique record identifier from a creation timestamp.
///
/// The timestamp prefix keeps ids sorted by creation time; the random suffix
/// makes two records created within the same instant distinct.
pub fn record_id(timestamp: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{timestamp}#{}", &suffix[..8])
}

/// Allow-listed partial update for a stored record.
///
/// Only {from, to, amount, result, rate, last_updated} can be changed;
/// unknown payload fields are silently ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub from: Option<CurrencyCode>,
    pub to: Option<CurrencyCode>,
    pub amount: Option<Decimal>,
    pub result: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub last_updated: Option<String>,
}

impl RecordPatch {
    /// True when no allowed field is present in the patch.
    pub fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.amount.is_none()
            && self.result.is_none()
            && self.rate.is_none()
            && self.last_updated.is_none()
    }
}
