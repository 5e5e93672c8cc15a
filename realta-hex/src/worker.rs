//! Background reload of the converter snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, instrument};

use realta_types::RateRepository;

use crate::CurrencyService;

/// Default time between reloads.
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(3600);

/// Periodically reloads persisted rates into a [`CurrencyService`].
///
/// Picks up rows written by another instance's refresh job.
pub struct RateReloadWorker<R: RateRepository> {
    service: Arc<CurrencyService<R>>,
    period: Duration,
}

impl<R: RateRepository> RateReloadWorker<R> {
    pub fn new(service: Arc<CurrencyService<R>>, period: Duration) -> Self {
        Self { service, period }
    }

    /// Runs forever. The first reload happens one period after start.
    #[instrument(skip(self), fields(period_secs = self.period.as_secs()))]
    pub async fn run(self) {
        info!("Starting rate reload worker");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.reload_once().await;
        }
    }

    async fn reload_once(&self) {
        if let Err(e) = self.service.reload_rates().await {
            error!("Failed to reload rates: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_tests::tests::{FixedSource, MockRateRepo};
    use chrono::Utc;
    use realta_types::StoredRate;

    #[tokio::test(start_paused = true)]
    async fn test_worker_reloads_after_each_period() {
        let repo = MockRateRepo::new();
        let service = Arc::new(CurrencyService::new(repo, Arc::new(FixedSource::empty())));
        let handle = tokio::spawn(
            RateReloadWorker::new(service.clone(), Duration::from_secs(60)).run(),
        );

        service
            .repo()
            .upsert_rate(&StoredRate::new("USD", "GTQ", 8.25, Utc::now()).unwrap())
            .await
            .unwrap();

        // Let the worker consume its immediate tick before checking.
        tokio::task::yield_now().await;
        assert_eq!(service.current_rates().await.rates["GTQ"], 7.8);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(service.current_rates().await.rates["GTQ"], 8.25);

        handle.abort();
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_previous_snapshot() {
        let repo = MockRateRepo::failing();
        let service = Arc::new(CurrencyService::new(repo, Arc::new(FixedSource::empty())));
        let worker = RateReloadWorker::new(service.clone(), DEFAULT_RELOAD_INTERVAL);

        worker.reload_once().await;

        assert_eq!(service.current_rates().await.rates["GTQ"], 7.8);
    }
}
