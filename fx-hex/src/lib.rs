//! # FX Hex
//!
//! Application service layer and HTTP adapter for the FX converter service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `P: RateProvider` and `S: HistoryStore`,
//! allowing different provider and store implementations to be injected.

pub mod inbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::ConversionService;
