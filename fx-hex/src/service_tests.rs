//! ConversionService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::str::FromStr;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use fx_types::{
        AppError, ConversionRecord, ConvertRequest, CreateRecordRequest, CurrencyCode,
        HistoryStore, ProviderError, RateProvider, RateSnapshot, RecordPatch,
        UpdateRecordRequest,
    };

    use crate::ConversionService;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mock ports
    // ─────────────────────────────────────────────────────────────────────────

    /// Scripted provider outcome for one test.
    pub enum MockOutcome {
        Rates(Vec<(&'static str, &'static str)>),
        Timeout,
        Status(u16),
        Unreachable,
    }

    pub struct MockProvider {
        outcome: MockOutcome,
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateSnapshot, ProviderError> {
            match &self.outcome {
                MockOutcome::Rates(rates) => Ok(RateSnapshot {
                    base: base.clone(),
                    rates: rates
                        .iter()
                        .map(|(c, r)| (code(c), Decimal::from_str(r).unwrap()))
                        .collect::<BTreeMap<_, _>>(),
                    last_updated: Some("Tue, 28 Oct 2025 00:02:31 +0000".to_string()),
                    next_update: None,
                    metadata: None,
                }),
                MockOutcome::Timeout => Err(ProviderError::Timeout),
                MockOutcome::Status(status) => Err(ProviderError::UpstreamStatus(*status)),
                MockOutcome::Unreachable => {
                    Err(ProviderError::Unreachable("connection refused".into()))
                }
            }
        }
    }

    /// Simple in-memory history store for testing the service layer.
    pub struct MockStore {
        records: Mutex<Vec<ConversionRecord>>,
        active: bool,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                active: true,
            }
        }

        pub fn inactive() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                active: false,
            }
        }

        pub fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HistoryStore for MockStore {
        async fn put(&self, record: &ConversionRecord) -> bool {
            if !self.active {
                return false;
            }
            let mut records = self.records.lock().unwrap();
            records.retain(|r| r.id != record.id);
            records.push(record.clone());
            true
        }

        async fn list(&self, limit: u32) -> (Vec<ConversionRecord>, bool) {
            if !self.active {
                return (Vec::new(), false);
            }
            let mut records = self.records.lock().unwrap().clone();
            records.sort_by(|a, b| b.id.cmp(&a.id));
            records.truncate(limit as usize);
            (records, true)
        }

        async fn get(&self, id: &str) -> (Option<ConversionRecord>, bool) {
            if !self.active {
                return (None, false);
            }
            let found = self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned();
            (found, true)
        }

        async fn update(&self, id: &str, patch: &RecordPatch) -> bool {
            if !self.active || patch.is_empty() {
                return false;
            }
            let mut records = self.records.lock().unwrap();
            let Some(record) = records.iter_mut().find(|r| r.id == id) else {
                return false;
            };
            if let Some(from) = &patch.from {
                record.from = from.clone();
            }
            if let Some(to) = &patch.to {
                record.to = to.clone();
            }
            if let Some(amount) = patch.amount {
                record.amount = amount;
            }
            if let Some(result) = patch.result {
                record.result = result;
            }
            if let Some(rate) = patch.rate {
                record.rate = rate;
            }
            if let Some(last_updated) = &patch.last_updated {
                record.last_updated = Some(last_updated.clone());
            }
            true
        }

        async fn delete(&self, id: &str) -> bool {
            if !self.active {
                return false;
            }
            self.records.lock().unwrap().retain(|r| r.id != id);
            true
        }
    }

    fn service(
        outcome: MockOutcome,
        store: MockStore,
    ) -> ConversionService<MockProvider, MockStore> {
        ConversionService::new(MockProvider { outcome }, store)
    }

    fn convert_request(amount: serde_json::Value, from: &str, to: &str) -> ConvertRequest {
        ConvertRequest {
            amount: Some(amount),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_convert_success_and_persists() {
        let svc = service(MockOutcome::Rates(vec![("EUR", "0.85")]), MockStore::new());

        let record = svc
            .convert(convert_request(serde_json::json!(100), "USD", "EUR"))
            .await
            .unwrap();

        assert_eq!(record.from, code("USD"));
        assert_eq!(record.to, code("EUR"));
        assert_eq!(record.result, Decimal::from_str("85.00").unwrap());
        assert_eq!(record.rate, Decimal::from_str("0.85").unwrap());

        let (stored, active) = svc.get_record(&record.id).await;
        assert!(active);
        assert_eq!(stored, Some(record));
    }

    #[tokio::test]
    async fn test_convert_normalizes_codes() {
        let svc = service(MockOutcome::Rates(vec![("EUR", "0.895")]), MockStore::new());

        let record = svc
            .convert(convert_request(serde_json::json!(100), " usd ", "eur"))
            .await
            .unwrap();

        assert_eq!(record.from, code("USD"));
        assert_eq!(record.result, Decimal::from_str("89.50").unwrap());
    }

    #[tokio::test]
    async fn test_convert_unsupported_target() {
        let svc = service(MockOutcome::Rates(vec![("EUR", "0.85")]), MockStore::new());

        let result = svc
            .convert(convert_request(serde_json::json!(100), "USD", "JPY"))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_convert_invalid_amount() {
        let svc = service(MockOutcome::Rates(vec![("EUR", "0.85")]), MockStore::new());

        let result = svc
            .convert(convert_request(serde_json::json!("abc"), "USD", "EUR"))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_convert_missing_fields() {
        let svc = service(MockOutcome::Rates(vec![("EUR", "0.85")]), MockStore::new());

        let result = svc.convert(ConvertRequest::default()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_convert_timeout_distinct_from_unreachable() {
        let svc = service(MockOutcome::Timeout, MockStore::new());
        let result = svc
            .convert(convert_request(serde_json::json!(100), "USD", "EUR"))
            .await;
        assert!(matches!(result, Err(AppError::GatewayTimeout)));

        let svc = service(MockOutcome::Unreachable, MockStore::new());
        let result = svc
            .convert(convert_request(serde_json::json!(100), "USD", "EUR"))
            .await;
        assert!(matches!(result, Err(AppError::BadGateway(_))));
    }

    #[tokio::test]
    async fn test_convert_preserves_upstream_status() {
        let svc = service(MockOutcome::Status(429), MockStore::new());

        let result = svc
            .convert(convert_request(serde_json::json!(100), "USD", "EUR"))
            .await;

        assert!(matches!(
            result,
            Err(AppError::UpstreamStatus { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_convert_succeeds_with_inactive_store() {
        let svc = service(
            MockOutcome::Rates(vec![("EUR", "0.85")]),
            MockStore::inactive(),
        );

        let record = svc
            .convert(convert_request(serde_json::json!(100), "USD", "EUR"))
            .await
            .unwrap();

        assert_eq!(record.result, Decimal::from_str("85.00").unwrap());
        let (history, storage_active) = svc.list_history(None).await;
        assert!(!storage_active);
        assert!(history.is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_rates_defaults_to_usd_and_normalizes() {
        let svc = service(MockOutcome::Rates(vec![("EUR", "0.85")]), MockStore::new());

        let snapshot = svc.get_rates(None).await.unwrap();
        assert_eq!(snapshot.base, code("USD"));

        let snapshot = svc.get_rates(Some(" gbp ")).await.unwrap();
        assert_eq!(snapshot.base, code("GBP"));
    }

    #[tokio::test]
    async fn test_get_rates_rejects_invalid_base() {
        let svc = service(MockOutcome::Rates(vec![]), MockStore::new());

        let result = svc.get_rates(Some("not-a-code")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History CRUD
    // ─────────────────────────────────────────────────────────────────────────

    fn create_request() -> CreateRecordRequest {
        CreateRecordRequest {
            from: Some("USD".to_string()),
            to: Some("EUR".to_string()),
            amount: Some(serde_json::json!(100)),
            result: Some(serde_json::json!(89.45)),
            rate: Some(serde_json::json!(0.8945)),
            last_updated: Some("2025-11-29T10:00:00Z".to_string()),
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_create_record_persists() {
        let svc = service(MockOutcome::Rates(vec![]), MockStore::new());

        let (record, persisted) = svc.create_record(create_request()).await.unwrap();

        assert!(persisted);
        assert!(record.id.starts_with(&record.timestamp));
        let (found, _) = svc.get_record(&record.id).await;
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn test_create_record_missing_required_field() {
        let svc = service(MockOutcome::Rates(vec![]), MockStore::new());

        let mut req = create_request();
        req.result = None;

        let result = svc.create_record(req).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_record_with_inactive_store_warns_not_fails() {
        let svc = service(MockOutcome::Rates(vec![]), MockStore::inactive());

        let (_, persisted) = svc.create_record(create_request()).await.unwrap();
        assert!(!persisted);
    }

    #[tokio::test]
    async fn test_update_record_applies_patch() {
        let store = MockStore::new();
        let svc = service(MockOutcome::Rates(vec![]), store);
        let (record, _) = svc.create_record(create_request()).await.unwrap();

        let req: UpdateRecordRequest =
            serde_json::from_str(r#"{"amount": 150, "result": 134.18}"#).unwrap();
        let updated = svc.update_record(&record.id, req).await.unwrap().unwrap();

        assert_eq!(updated.amount, Decimal::from(150));
        assert_eq!(updated.result, Decimal::from_str("134.18").unwrap());
        assert_eq!(updated.rate, record.rate);
    }

    #[tokio::test]
    async fn test_update_record_with_only_disallowed_fields() {
        let svc = service(MockOutcome::Rates(vec![]), MockStore::new());
        let (record, _) = svc.create_record(create_request()).await.unwrap();

        let req: UpdateRecordRequest =
            serde_json::from_str(r#"{"id": "hijack", "source": "mock"}"#).unwrap();
        let result = svc.update_record(&record.id, req).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let (found, _) = svc.get_record(&record.id).await;
        assert_eq!(found, Some(record), "record must be left unchanged");
    }

    #[tokio::test]
    async fn test_update_missing_record_is_none() {
        let svc = service(MockOutcome::Rates(vec![]), MockStore::new());

        let req: UpdateRecordRequest = serde_json::from_str(r#"{"amount": 1}"#).unwrap();
        let updated = svc.update_record("absent", req).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_record() {
        let svc = service(MockOutcome::Rates(vec![]), MockStore::new());
        let (record, _) = svc.create_record(create_request()).await.unwrap();

        assert!(svc.delete_record(&record.id).await.unwrap());
        assert!(!svc.delete_record(&record.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_history_limit_and_order() {
        let store = MockStore::new();
        let svc = service(MockOutcome::Rates(vec![]), store);

        for day in 1..=8 {
            let mut req = create_request();
            req.timestamp = Some(format!("2025-10-0{day}T10:00:00Z"));
            svc.create_record(req).await.unwrap();
        }

        let (history, storage_active) = svc.list_history(Some(5)).await;
        assert!(storage_active);
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].timestamp, "2025-10-08T10:00:00Z");
        assert!(history.windows(2).all(|w| w[0].id > w[1].id));
    }
}
