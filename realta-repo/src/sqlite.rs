//! SQLite repository adapter.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use realta_types::{RateRepository, RepoError, StoredRate};

use crate::types::SqliteRateRow;

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:"
                && let Some(parent) = std::path::Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_currency_rates.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RateRepository for SqliteRepo {
    async fn upsert_rate(&self, rate: &StoredRate) -> Result<StoredRate, RepoError> {
        sqlx::query(
            r#"INSERT INTO currency_rates (base_currency, target_currency, rate, last_updated)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (base_currency, target_currency)
               DO UPDATE SET rate = excluded.rate, last_updated = excluded.last_updated"#,
        )
        .bind(&rate.base_currency)
        .bind(&rate.target_currency)
        .bind(rate.rate)
        .bind(rate.last_updated.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(rate.clone())
    }

    async fn get_rate(&self, base: &str, target: &str) -> Result<Option<StoredRate>, RepoError> {
        let row: Option<SqliteRateRow> = sqlx::query_as(
            r#"SELECT base_currency, target_currency, rate, last_updated
               FROM currency_rates WHERE base_currency = ? AND target_currency = ?"#,
        )
        .bind(base)
        .bind(target)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(SqliteRateRow::into_domain).transpose()
    }

    async fn list_rates(&self, base: &str) -> Result<Vec<StoredRate>, RepoError> {
        let rows: Vec<SqliteRateRow> = sqlx::query_as(
            r#"SELECT base_currency, target_currency, rate, last_updated
               FROM currency_rates WHERE base_currency = ? ORDER BY target_currency"#,
        )
        .bind(base)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(SqliteRateRow::into_domain).collect()
    }
}
