//! HTTP request handlers.
//!
//! Every success body carries `success: true`; errors render as
//! `{success: false, message, error?}` with the status mapping from the
//! application error taxonomy.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;

use fx_types::{
    AppError, ConversionRecord, ConvertRequest, ConvertResponse, CreateRecordRequest,
    CreateRecordResponse, CurrencyCode, HistoryQuery, HistoryResponse, HistoryStore,
    MessageResponse, RateProvider, RatesQuery, RatesResponse, RecordResponse, UpdateRecordRequest,
};

use crate::ConversionService;

/// Application state shared across handlers.
pub struct AppState<P: RateProvider, S: HistoryStore> {
    pub service: ConversionService<P, S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::GatewayTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Exchange rate service timed out".to_string(),
                None,
            ),
            AppError::UpstreamStatus { status, detail } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Exchange rate service returned an error".to_string(),
                Some(detail),
            ),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg, None),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(msg),
            ),
        };

        let mut body = serde_json::json!({
            "success": false,
            "message": message,
        });
        if let Some(detail) = detail {
            body["error"] = serde_json::Value::String(detail);
        }

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Current rate table for a base currency (default USD).
#[tracing::instrument(skip(state))]
pub async fn get_rates<P: RateProvider, S: HistoryStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Query(query): Query<RatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.service.get_rates(query.base.as_deref()).await?;
    Ok(Json(RatesResponse::from(snapshot)))
}

/// Convert an amount between two currencies.
#[tracing::instrument(skip(state, req))]
pub async fn convert_currency<P: RateProvider, S: HistoryStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Json(req): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.service.convert(req).await?;
    Ok(Json(ConvertResponse::from(record)))
}

/// List conversion history, most-recent-first.
///
/// When the store is inactive the static fallback dataset is substituted and
/// the response is marked `source: "mock"`.
#[tracing::instrument(skip(state))]
pub async fn list_history<P: RateProvider, S: HistoryStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (history, storage_active) = state.service.list_history(query.limit).await;

    let (history, source) = if storage_active {
        (history, "store")
    } else {
        let mut fallback = fallback_history();
        if let Some(limit) = query.limit {
            fallback.truncate(limit as usize);
        }
        (fallback, "mock")
    };

    Ok(Json(HistoryResponse {
        success: true,
        history,
        source: source.to_string(),
    }))
}

/// Explicitly create a history record.
#[tracing::instrument(skip(state, req))]
pub async fn create_record<P: RateProvider, S: HistoryStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Json(req): Json<CreateRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (record, persisted) = state.service.create_record(req).await?;

    let warning = (!persisted)
        .then(|| "History store unavailable; the record was not persisted".to_string());

    Ok((
        StatusCode::CREATED,
        Json(CreateRecordResponse {
            success: true,
            message: "Conversion record created".to_string(),
            data: record,
            warning,
        }),
    ))
}

/// Point lookup by record id. Falls back to the mock dataset when the store
/// is inactive.
#[tracing::instrument(skip(state), fields(record_id = %id))]
pub async fn get_record<P: RateProvider, S: HistoryStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (record, storage_active) = state.service.get_record(&id).await;

    let (record, source) = if storage_active {
        (record, "store")
    } else {
        let record = fallback_history().into_iter().find(|r| r.id == id);
        (record, "mock")
    };

    let conversion = record.ok_or_else(|| not_found(&id))?;

    Ok(Json(RecordResponse {
        success: true,
        conversion,
        source: Some(source.to_string()),
    }))
}

/// Partial update of a history record.
#[tracing::instrument(skip(state, req), fields(record_id = %id))]
pub async fn update_record<P: RateProvider, S: HistoryStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRecordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversion = state
        .service
        .update_record(&id, req)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(RecordResponse {
        success: true,
        conversion,
        source: None,
    }))
}

/// Delete a history record.
#[tracing::instrument(skip(state), fields(record_id = %id))]
pub async fn delete_record<P: RateProvider, S: HistoryStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.service.delete_record(&id).await? {
        return Err(not_found(&id));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Conversion deleted".to_string(),
    }))
}

fn not_found(id: &str) -> ApiError {
    AppError::NotFound(format!("Conversion '{id}' not found")).into()
}

/// Static dataset served when the history store is inactive. The store never
/// fabricates data; substitution happens here at the edge.
pub fn fallback_history() -> Vec<ConversionRecord> {
    [
        ("USD", "EUR", "100", "89", "0.89", "2025-10-28T10:00:00Z"),
        ("EUR", "COP", "50", "215000", "4300", "2025-10-27T14:30:00Z"),
    ]
    .into_iter()
    .filter_map(|(from, to, amount, result, rate, timestamp)| {
        Some(ConversionRecord {
            id: timestamp.to_string(),
            from: CurrencyCode::parse(from).ok()?,
            to: CurrencyCode::parse(to).ok()?,
            amount: Decimal::from_str(amount).ok()?,
            result: Decimal::from_str(result).ok()?,
            rate: Decimal::from_str(rate).ok()?,
            timestamp: timestamp.to_string(),
            last_updated: None,
        })
    })
    .collect()
}
