//! # FX Repo
//!
//! Concrete history store implementations (adapters) for the FX converter
//! service. This crate provides database adapters behind the `HistoryStore`
//! port, wrapped in a lazily-probed, best-effort facade: if the backing
//! store cannot be reached, every operation degrades instead of failing the
//! enclosing request.

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("Enable a repo feature: `postgres` or `sqlite`.");

use async_trait::async_trait;
use tokio::sync::OnceCell;

use fx_types::{ConversionRecord, HistoryStore, RecordPatch};

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
mod types;


#[cfg(feature = "postgres")]
pub use postgres::PostgresHistory;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteHistory;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
type Backend = sqlite::SqliteHistory;
#[cfg(feature = "postgres")]
type Backend = postgres::PostgresHistory;

/// Lazily-connected history store.
///
/// Connection establishment is deferred to first use and the outcome is
/// memoized for the process lifetime: an unreachable store is probed
/// effectively once, so repeated failed connection attempts never add
/// latency to later requests. A missing database URL behaves the same as an
/// unreachable store.
pub struct HistoryRepo {
    database_url: Option<String>,
    backend: OnceCell<Option<Backend>>,
}

/// Build a history repository from an optional database URL.
///
/// # Examples
///
/// ```ignore
/// // SQLite (with `sqlite` feature)
/// let repo = build_history(Some("sqlite://history.db?mode=rwc".into()));
///
/// // No URL configured: storage stays inactive, requests still succeed
/// let repo = build_history(None);
/// ```
pub fn build_history(database_url: Option<String>) -> HistoryRepo {
    HistoryRepo::new(database_url)
}

impl HistoryRepo {
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url,
            backend: OnceCell::new(),
        }
    }

    async fn backend(&self) -> Option<&Backend> {
        self.backend
            .get_or_init(|| async {
                let url = self.database_url.as_deref()?;
                match Backend::connect(url).await {
                    Ok(backend) => Some(backend),
                    Err(err) => {
                        tracing::warn!(%err, "conversion history disabled");
                        None
                    }
                }
            })
            .await
            .as_ref()
    }
}

#[async_trait]
impl HistoryStore for HistoryRepo {
    async fn put(&self, record: &ConversionRecord) -> bool {
        let Some(backend) = self.backend().await else {
            return false;
        };
        match backend.put(record).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, id = %record.id, "could not store conversion record");
                false
            }
        }
    }

    async fn list(&self, limit: u32) -> (Vec<ConversionRecord>, bool) {
        let Some(backend) = self.backend().await else {
            return (Vec::new(), false);
        };
        match backend.list(limit).await {
            Ok(records) => (records, true),
            Err(err) => {
                tracing::warn!(%err, "could not read conversion history");
                (Vec::new(), false)
            }
        }
    }

    async fn get(&self, id: &str) -> (Option<ConversionRecord>, bool) {
        let Some(backend) = self.backend().await else {
            return (None, false);
        };
        match backend.get(id).await {
            Ok(record) => (record, true),
            Err(err) => {
                tracing::warn!(%err, id, "could not read conversion record");
                (None, false)
            }
        }
    }

    async fn update(&self, id: &str, patch: &RecordPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let Some(backend) = self.backend().await else {
            return false;
        };
        match backend.update(id, patch).await {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(%err, id, "could not update conversion record");
                false
            }
        }
    }

    async fn delete(&self, id: &str) -> bool {
        let Some(backend) = self.backend().await else {
            return false;
        };
        match backend.delete(id).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, id, "could not delete conversion record");
                false
            }
        }
    }
}
