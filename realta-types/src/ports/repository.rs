//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory mocks) implement this trait.

use crate::domain::StoredRate;
use crate::error::RepoError;

/// Persistent store of refreshed exchange rates.
#[async_trait::async_trait]
pub trait RateRepository: Send + Sync + 'static {
    /// Inserts a rate or replaces the one stored for the same currency pair.
    async fn upsert_rate(&self, rate: &StoredRate) -> Result<StoredRate, RepoError>;

    /// Gets the rate stored for a currency pair.
    async fn get_rate(&self, base: &str, target: &str) -> Result<Option<StoredRate>, RepoError>;

    /// Lists all rates quoted against `base`, ordered by target currency.
    async fn list_rates(&self, base: &str) -> Result<Vec<StoredRate>, RepoError>;
}
