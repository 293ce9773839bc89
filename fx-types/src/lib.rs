//! # FX Types
//!
//! Domain types and port traits for the currency converter service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, RateSnapshot, ConversionRecord)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Conversion, ConversionRecord, CurrencyCode, ProviderMetadata, RateSnapshot, RecordPatch,
    convert, parse_amount, record_id,
};
pub use dto::*;
pub use error::{AppError, DomainError, StoreError};
pub use ports::{HistoryStore, ProviderError, RateProvider};
