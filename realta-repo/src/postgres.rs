//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use realta_types::{RateRepository, RepoError, StoredRate};

use crate::types::PgRateRow;

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_currency_rates_pg.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RateRepository for PostgresRepo {
    async fn upsert_rate(&self, rate: &StoredRate) -> Result<StoredRate, RepoError> {
        let row: PgRateRow = sqlx::query_as(
            r#"INSERT INTO currency_rates (base_currency, target_currency, rate, last_updated)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (base_currency, target_currency)
               DO UPDATE SET rate = EXCLUDED.rate, last_updated = EXCLUDED.last_updated
               RETURNING base_currency, target_currency, rate, last_updated"#,
        )
        .bind(&rate.base_currency)
        .bind(&rate.target_currency)
        .bind(rate.rate)
        .bind(rate.last_updated)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.into_domain()
    }

    async fn get_rate(&self, base: &str, target: &str) -> Result<Option<StoredRate>, RepoError> {
        let row: Option<PgRateRow> = sqlx::query_as(
            r#"SELECT base_currency, target_currency, rate, last_updated
               FROM currency_rates WHERE base_currency = $1 AND target_currency = $2"#,
        )
        .bind(base)
        .bind(target)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(PgRateRow::into_domain).transpose()
    }

    async fn list_rates(&self, base: &str) -> Result<Vec<StoredRate>, RepoError> {
        let rows: Vec<PgRateRow> = sqlx::query_as(
            r#"SELECT base_currency, target_currency, rate, last_updated
               FROM currency_rates WHERE base_currency = $1 ORDER BY target_currency"#,
        )
        .bind(base)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(PgRateRow::into_domain).collect()
    }
}
