//! PostgreSQL history adapter.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use fx_types::{ConversionRecord, RecordPatch, StoreError};

use crate::types::{DbConversionRow, PARTITION_KEY};

/// Postgres-backed history store.
pub struct PostgresHistory {
    pool: PgPool,
}

impl PostgresHistory {
    /// Connects and runs the schema migration.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(db_err)?;

        let ddl = include_str!("../migrations/0001_create_history.sql");
        sqlx::query(ddl).execute(&pool).await.map_err(db_err)?;

        Ok(Self { pool })
    }

    pub async fn put(&self, record: &ConversionRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO conversion_history
                   (pk, sk, from_code, to_code, amount, result, rate, created_at, last_updated)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (pk, sk) DO UPDATE SET
                   from_code = EXCLUDED.from_code,
                   to_code = EXCLUDED.to_code,
                   amount = EXCLUDED.amount,
                   result = EXCLUDED.result,
                   rate = EXCLUDED.rate,
                   created_at = EXCLUDED.created_at,
                   last_updated = EXCLUDED.last_updated"#,
        )
        .bind(PARTITION_KEY)
        .bind(&record.id)
        .bind(record.from.as_str())
        .bind(record.to.as_str())
        .bind(record.amount.to_string())
        .bind(record.result.to_string())
        .bind(record.rate.to_string())
        .bind(&record.timestamp)
        .bind(&record.last_updated)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    pub async fn list(&self, limit: u32) -> Result<Vec<ConversionRecord>, StoreError> {
        let rows: Vec<DbConversionRow> = sqlx::query_as(
            r#"SELECT sk, from_code, to_code, amount, result, rate, created_at, last_updated
               FROM conversion_history
               WHERE pk = $1
               ORDER BY sk DESC
               LIMIT $2"#,
        )
        .bind(PARTITION_KEY)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbConversionRow::into_domain).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<ConversionRecord>, StoreError> {
        let row: Option<DbConversionRow> = sqlx::query_as(
            r#"SELECT sk, from_code, to_code, amount, result, rate, created_at, last_updated
               FROM conversion_history
               WHERE pk = $1 AND sk = $2"#,
        )
        .bind(PARTITION_KEY)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbConversionRow::into_domain).transpose()
    }

    /// Applies the patch; returns `false` when the record does not exist or
    /// the patch carries no field.
    pub async fn update(&self, id: &str, patch: &RecordPatch) -> Result<bool, StoreError> {
        let mut sets = Vec::new();
        let mut position = 0;
        let mut next = |column: &str| {
            position += 1;
            format!("{column} = ${position}")
        };

        if patch.from.is_some() {
            sets.push(next("from_code"));
        }
        if patch.to.is_some() {
            sets.push(next("to_code"));
        }
        if patch.amount.is_some() {
            sets.push(next("amount"));
        }
        if patch.result.is_some() {
            sets.push(next("result"));
        }
        if patch.rate.is_some() {
            sets.push(next("rate"));
        }
        if patch.last_updated.is_some() {
            sets.push(next("last_updated"));
        }
        if sets.is_empty() {
            return Ok(false);
        }

        let sql = format!(
            "UPDATE conversion_history SET {} WHERE pk = ${} AND sk = ${}",
            sets.join(", "),
            position + 1,
            position + 2
        );

        let mut query = sqlx::query(&sql);
        if let Some(from) = &patch.from {
            query = query.bind(from.as_str().to_string());
        }
        if let Some(to) = &patch.to {
            query = query.bind(to.as_str().to_string());
        }
        if let Some(amount) = &patch.amount {
            query = query.bind(amount.to_string());
        }
        if let Some(result) = &patch.result {
            query = query.bind(result.to_string());
        }
        if let Some(rate) = &patch.rate {
            query = query.bind(rate.to_string());
        }
        if let Some(last_updated) = &patch.last_updated {
            query = query.bind(last_updated.clone());
        }

        let outcome = query
            .bind(PARTITION_KEY)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(outcome.rows_affected() > 0)
    }

    /// Idempotent removal; deleting an absent key is not an error.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query(r#"DELETE FROM conversion_history WHERE pk = $1 AND sk = $2"#)
            .bind(PARTITION_KEY)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}
