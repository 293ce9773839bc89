//! Domain models for the currency converter.

pub mod conversion;
pub mod currency;
pub mod record;
pub mod snapshot;

pub use conversion::{Conversion, convert, parse_amount};
pub use currency::CurrencyCode;
pub use record::{ConversionRecord, RecordPatch, record_id};
pub use snapshot::{ProviderMetadata, RateSnapshot};
