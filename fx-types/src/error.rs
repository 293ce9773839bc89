//! Error types for the FX converter service.

use crate::domain::CurrencyCode;
use crate::ports::ProviderError;

/// Domain-level errors (input validation and conversion rules).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid currency code '{0}'")]
    InvalidCurrencyCode(String),

    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),

    #[error("Currency '{0}' is not supported")]
    UnsupportedTargetCurrency(CurrencyCode),

    #[error("Rate snapshot is for base {got}, expected {expected}")]
    BaseMismatch {
        expected: CurrencyCode,
        got: CurrencyCode,
    },
}

/// Store-level errors (data access failures inside an adapter).
///
/// These never cross the `HistoryStore` port: the port degrades them to
/// boolean / `storage_active` outcomes after logging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record: {0}")]
    Decode(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Exchange rate service timed out")]
    GatewayTimeout,

    #[error("Exchange rate service returned an error")]
    UpstreamStatus { status: u16, detail: String },

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::BaseMismatch { .. } => AppError::Internal(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout => AppError::GatewayTimeout,
            ProviderError::UpstreamStatus(status) => AppError::UpstreamStatus {
                status,
                detail: format!("upstream returned HTTP {status}"),
            },
            ProviderError::Unreachable(_) => {
                AppError::BadGateway("Unable to contact exchange rate service".into())
            }
            ProviderError::UnsupportedBase(code) => {
                AppError::BadRequest(format!("Currency '{code}' is not supported"))
            }
            ProviderError::Provider(tag) => {
                AppError::BadGateway(format!("Exchange rate provider error: {tag}"))
            }
            ProviderError::Malformed(detail) => {
                AppError::BadGateway(format!("Invalid response from exchange rate provider: {detail}"))
            }
        }
    }
}
