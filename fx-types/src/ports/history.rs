//! History store port.
//!
//! Best-effort persistence: every operation degrades rather than fails.
//! Callers must not special-case the concrete backend, only the
//! `storage_active` flag.

use crate::domain::{ConversionRecord, RecordPatch};

/// Port trait for the conversion history store.
///
/// "Not found" and "store unavailable" are distinguishable through the
/// boolean `storage_active` component of the read operations. Write
/// operations collapse both into `false`, which callers treat as a
/// non-fatal, best-effort outcome.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// Upserts a record by identifier. Returns `false` (not an error) when
    /// the backing store cannot be reached.
    async fn put(&self, record: &ConversionRecord) -> bool;

    /// Returns up to `limit` records, most-recent-first, plus the
    /// `storage_active` flag. An unavailable store yields an empty sequence;
    /// the store never fabricates fallback data itself.
    async fn list(&self, limit: u32) -> (Vec<ConversionRecord>, bool);

    /// Point lookup by identifier.
    async fn get(&self, id: &str) -> (Option<ConversionRecord>, bool);

    /// Applies an allow-listed partial update. Returns `false` when the
    /// record does not exist, the store is unreachable, or the patch carries
    /// no allowed field.
    async fn update(&self, id: &str, patch: &RecordPatch) -> bool;

    /// Removes a record. Idempotent: deleting an absent key is not
    /// distinguished from success. Returns `false` only when the store is
    /// unreachable or the operation itself errors.
    async fn delete(&self, id: &str) -> bool;
}
