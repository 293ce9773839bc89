//! Validated ISO-style currency code.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A 3-letter uppercase alphabetic currency code (e.g. "USD", "EUR").
///
/// The only way to construct one is [`CurrencyCode::parse`], so a value of
/// this type is always normalized: trimmed, uppercased, exactly three ASCII
/// letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Normalizes and validates arbitrary input into a currency code.
    ///
    /// Trims whitespace and uppercases. Fails with
    /// [`DomainError::InvalidCurrencyCode`] when the input is empty, not
    /// exactly 3 characters, or contains non-alphabetic characters.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.len() != 3 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrencyCode(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let code = CurrencyCode::parse("  usd ").unwrap();
        assert_eq!(code.as_str(), "USD");
    }

    #[test]
    fn test_parse_keeps_valid_uppercase() {
        let code = CurrencyCode::parse("EUR").unwrap();
        assert_eq!(code.as_str(), "EUR");
    }

    #[test]
    fn test_parse_rejects_empty() {
        let result = CurrencyCode::parse("");
        assert!(matches!(result, Err(DomainError::InvalidCurrencyCode(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(CurrencyCode::parse("US").is_err());
        assert!(CurrencyCode::parse("USDT").is_err());
    }

    #[test]
    fn test_parse_rejects_non_alphabetic() {
        assert!(CurrencyCode::parse("U5D").is_err());
        assert!(CurrencyCode::parse("US-").is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let code: CurrencyCode = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(code.as_str(), "GBP");

        let err = serde_json::from_str::<CurrencyCode>("\"not-a-code\"");
        assert!(err.is_err());
    }
}
