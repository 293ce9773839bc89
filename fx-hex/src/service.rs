//! Conversion Application Service
//!
//! Orchestrates domain operations through the provider and history ports.
//! Contains NO infrastructure logic - pure business orchestration.
//!
//! Persistence is best-effort throughout: a dead history store degrades the
//! `storage_active`/persisted flags but never fails a conversion.

use fx_types::{
    AppError, ConversionRecord, ConvertRequest, CreateRecordRequest, CurrencyCode, HistoryStore,
    RateProvider, RateSnapshot, UpdateRecordRequest, convert, parse_amount, record_id,
};

/// Default number of history entries returned by a listing.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Application service for currency conversion operations.
///
/// Generic over the two ports - the adapters are injected at compile time.
/// This enables:
/// - Swapping providers/stores without code changes
/// - Testing with mock ports
/// - Compile-time checks for port implementation
pub struct ConversionService<P: RateProvider, S: HistoryStore> {
    provider: P,
    store: S,
}

impl<P: RateProvider, S: HistoryStore> ConversionService<P, S> {
    /// Creates a new service with the given provider and history store.
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rates & Conversion
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetches the current rate table for a base currency (default USD).
    pub async fn get_rates(&self, base: Option<&str>) -> Result<RateSnapshot, AppError> {
        let base = CurrencyCode::parse(base.unwrap_or("USD"))?;
        Ok(self.provider.fetch_rates(&base).await?)
    }

    /// Converts an amount and records the outcome, best-effort.
    ///
    /// Fetches a fresh snapshot for the source currency, computes the rounded
    /// result, and persists a history record. A failed persist is logged and
    /// the conversion still succeeds.
    pub async fn convert(&self, req: ConvertRequest) -> Result<ConversionRecord, AppError> {
        let from = CurrencyCode::parse(&required(req.from, "from")?)?;
        let to = CurrencyCode::parse(&required(req.to, "to")?)?;
        let amount = parse_amount(&required(req.amount, "amount")?)?;

        let snapshot = self.provider.fetch_rates(&from).await?;
        let conversion = convert(&from, &to, amount, &snapshot)?;
        let record = ConversionRecord::new(conversion);

        if !self.store.put(&record).await {
            tracing::warn!(id = %record.id, "conversion not persisted, history store inactive");
        }

        Ok(record)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// Lists history, most-recent-first, plus the `storage_active` flag.
    /// Substituting fallback data for an inactive store is the caller's job.
    pub async fn list_history(&self, limit: Option<u32>) -> (Vec<ConversionRecord>, bool) {
        self.store
            .list(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .await
    }

    /// Creates a history record from an explicit request.
    ///
    /// Returns the record plus whether it was actually persisted; an inactive
    /// store yields `persisted = false`, which the HTTP layer surfaces as a
    /// warning, not a failure.
    pub async fn create_record(
        &self,
        req: CreateRecordRequest,
    ) -> Result<(ConversionRecord, bool), AppError> {
        let from = CurrencyCode::parse(&required(req.from, "from")?)?;
        let to = CurrencyCode::parse(&required(req.to, "to")?)?;
        let amount = parse_amount(&required(req.amount, "amount")?)?;
        let result = parse_amount(&required(req.result, "result")?)?;
        let rate = parse_amount(&required(req.rate, "rate")?)?;

        let timestamp = req
            .timestamp
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let record = ConversionRecord {
            id: record_id(&timestamp),
            from,
            to,
            amount,
            result,
            rate,
            timestamp,
            last_updated: req.last_updated,
        };

        let persisted = self.store.put(&record).await;
        Ok((record, persisted))
    }

    /// Point lookup; "not found" and "store unavailable" stay distinguishable.
    pub async fn get_record(&self, id: &str) -> (Option<ConversionRecord>, bool) {
        self.store.get(id).await
    }

    /// Applies a partial update and returns the updated record, or `None`
    /// when the record does not exist (or the store is unreachable, which the
    /// HTTP layer reports identically as 404).
    pub async fn update_record(
        &self,
        id: &str,
        req: UpdateRecordRequest,
    ) -> Result<Option<ConversionRecord>, AppError> {
        let patch = req.into_patch()?;
        if patch.is_empty() {
            return Err(AppError::BadRequest(
                "No updatable fields in payload".into(),
            ));
        }

        let (existing, storage_active) = self.store.get(id).await;
        if !storage_active || existing.is_none() {
            return Ok(None);
        }

        if !self.store.update(id, &patch).await {
            return Ok(None);
        }

        let (updated, _) = self.store.get(id).await;
        Ok(updated)
    }

    /// Deletes a record. Returns `false` when it does not exist (or the
    /// store is unreachable); the store-level delete itself is idempotent.
    pub async fn delete_record(&self, id: &str) -> Result<bool, AppError> {
        let (existing, storage_active) = self.store.get(id).await;
        if !storage_active || existing.is_none() {
            return Ok(false);
        }

        if self.store.delete(id).await {
            Ok(true)
        } else {
            Err(AppError::Internal(format!(
                "could not delete conversion '{id}'"
            )))
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("'{field}' is required")))
}
