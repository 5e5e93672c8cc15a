//! Database row structs for the `currency_rates` table.

use sqlx::FromRow;

use realta_types::{RepoError, StoredRate};

/// Rate row from SQLite (timestamps stored as RFC 3339 text).
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteRateRow {
    pub base_currency: String,
    pub target_currency: String,
    pub rate: f64,
    pub last_updated: String,
}

#[cfg(feature = "sqlite")]
impl SqliteRateRow {
    pub fn into_domain(self) -> Result<StoredRate, RepoError> {
        let last_updated = chrono::DateTime::parse_from_rfc3339(&self.last_updated)
            .map_err(|e| RepoError::Database(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&chrono::Utc);
        StoredRate::new(
            self.base_currency,
            self.target_currency,
            self.rate,
            last_updated,
        )
        .map_err(RepoError::Domain)
    }
}

/// Rate row from PostgreSQL.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgRateRow {
    pub base_currency: String,
    pub target_currency: String,
    pub rate: f64,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

#[cfg(feature = "postgres")]
impl PgRateRow {
    pub fn into_domain(self) -> Result<StoredRate, RepoError> {
        StoredRate::new(
            self.base_currency,
            self.target_currency,
            self.rate,
            self.last_updated,
        )
        .map_err(RepoError::Domain)
    }
}
