//! CurrencyService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use realta_types::{
        AppError, ConvertQuery, ExchangeError, ListingPrice, ListingPricesRequest, QuotedRate,
        RateRepository, RateSource, RepoError, StoredRate,
    };

    use crate::CurrencyService;

    /// Simple in-memory repository for testing the service layer.
    pub struct MockRateRepo {
        rates: Mutex<BTreeMap<(String, String), StoredRate>>,
        fail: bool,
        reject_target: Option<String>,
        stall_first_list: Option<Duration>,
        list_calls: AtomicUsize,
    }

    impl MockRateRepo {
        pub fn new() -> Self {
            Self {
                rates: Mutex::new(BTreeMap::new()),
                fail: false,
                reject_target: None,
                stall_first_list: None,
                list_calls: AtomicUsize::new(0),
            }
        }

        /// A repository whose first `list_rates` reads its rows, then holds
        /// them for `delay` before returning.
        pub fn stalling(delay: Duration) -> Self {
            Self {
                stall_first_list: Some(delay),
                ..Self::new()
            }
        }

        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        /// A repository whose every call fails.
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        /// A repository that refuses writes for one target currency.
        pub fn rejecting(target: &str) -> Self {
            Self {
                reject_target: Some(target.to_string()),
                ..Self::new()
            }
        }

        fn check(&self) -> Result<(), RepoError> {
            if self.fail {
                Err(RepoError::Database("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RateRepository for MockRateRepo {
        async fn upsert_rate(&self, rate: &StoredRate) -> Result<StoredRate, RepoError> {
            self.check()?;
            if self.reject_target.as_deref() == Some(rate.target_currency.as_str()) {
                return Err(RepoError::Database("constraint failed".into()));
            }
            self.rates.lock().unwrap().insert(
                (rate.base_currency.clone(), rate.target_currency.clone()),
                rate.clone(),
            );
            Ok(rate.clone())
        }

        async fn get_rate(
            &self,
            base: &str,
            target: &str,
        ) -> Result<Option<StoredRate>, RepoError> {
            self.check()?;
            Ok(self
                .rates
                .lock()
                .unwrap()
                .get(&(base.to_string(), target.to_string()))
                .cloned())
        }

        async fn list_rates(&self, base: &str) -> Result<Vec<StoredRate>, RepoError> {
            self.check()?;
            let rows: Vec<StoredRate> = self
                .rates
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.base_currency == base)
                .cloned()
                .collect();
            let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let (0, Some(delay)) = (call, self.stall_first_list) {
                tokio::time::sleep(delay).await;
            }
            Ok(rows)
        }
    }

    /// Rate source returning a fixed set of quotes.
    pub struct FixedSource {
        quotes: Result<Vec<QuotedRate>, String>,
    }

    impl FixedSource {
        pub fn new(quotes: &[(&str, f64)]) -> Self {
            Self {
                quotes: Ok(quotes
                    .iter()
                    .map(|&(code, rate)| QuotedRate::new(code, rate))
                    .collect()),
            }
        }

        pub fn empty() -> Self {
            Self::new(&[])
        }

        pub fn unavailable() -> Self {
            Self {
                quotes: Err("upstream down".into()),
            }
        }
    }

    #[async_trait]
    impl RateSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_rates(&self, _base: &str) -> Result<Vec<QuotedRate>, ExchangeError> {
            self.quotes
                .clone()
                .map_err(ExchangeError::ServiceUnavailable)
        }
    }

    fn service_with(repo: MockRateRepo, source: FixedSource) -> CurrencyService<MockRateRepo> {
        CurrencyService::new(repo, Arc::new(source))
    }

    fn setup_service() -> CurrencyService<MockRateRepo> {
        service_with(MockRateRepo::new(), FixedSource::empty())
    }

    fn query(amount: i64, from: &str, to: &str, locale: Option<&str>) -> ConvertQuery {
        ConvertQuery {
            amount,
            from: from.into(),
            to: to.into(),
            locale: locale.map(Into::into),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_convert_usd_to_gtq() {
        let service = setup_service();

        let result = service
            .convert(query(10_000, "USD", "GTQ", Some("es-GT")))
            .await
            .unwrap();

        assert!((result.converted_amount - 780.0).abs() < 1e-9);
        assert!((result.exchange_rate - 7.8).abs() < 1e-9);
        assert_eq!(result.formatted_converted, "Q780");
    }

    #[tokio::test]
    async fn test_convert_defaults_locale() {
        let service = setup_service();

        let result = service
            .convert(query(175_000, "USD", "USD", None))
            .await
            .unwrap();

        assert_eq!(result.formatted_original, "US$1,750");
    }

    #[tokio::test]
    async fn test_convert_normalizes_codes() {
        let service = setup_service();

        let result = service
            .convert(query(10_000, " usd", "gtq ", Some("es-GT")))
            .await
            .unwrap();

        assert_eq!(result.original_currency, "USD");
        assert_eq!(result.converted_currency, "GTQ");
        assert!((result.converted_amount - 780.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_convert_unknown_currency_uses_parity() {
        let service = setup_service();

        let result = service
            .convert(query(10_000, "XYZ", "USD", Some("en-US")))
            .await
            .unwrap();

        assert!((result.converted_amount - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_convert_negative_amount_rejected() {
        let service = setup_service();

        let result = service.convert(query(-1, "USD", "MXN", None)).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_convert_listing_prices() {
        let service = setup_service();

        let views = service
            .convert_listing_prices(ListingPricesRequest {
                currency: "MXN".into(),
                locale: Some("es-MX".into()),
                listings: vec![
                    ListingPrice {
                        id: "casa-1".into(),
                        amount: 100_000,
                        currency: "USD".into(),
                    },
                    ListingPrice {
                        id: "depto-2".into(),
                        amount: 1_750_000,
                        currency: "MXN".into(),
                    },
                ],
            })
            .await
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, "casa-1");
        assert!((views[0].price.converted_amount - 17_500.0).abs() < 1e-9);
        assert_eq!(views[0].price.formatted_converted, "$17,500");
        assert_eq!(views[1].id, "depto-2");
        assert_eq!(views[1].price.exchange_rate, 1.0);
    }

    #[tokio::test]
    async fn test_convert_listing_prices_rejects_negative() {
        let service = setup_service();

        let result = service
            .convert_listing_prices(ListingPricesRequest {
                currency: "USD".into(),
                locale: None,
                listings: vec![ListingPrice {
                    id: "bad".into(),
                    amount: -500,
                    currency: "USD".into(),
                }],
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("bad")),
            other => panic!("Expected BadRequest, got {:?}", other.map(|v| v.len())),
        }
    }

    #[tokio::test]
    async fn test_supported_currencies() {
        let service = setup_service();

        let currencies = service.supported_currencies();

        assert_eq!(currencies.len(), 10);
        assert_eq!(currencies[0].code, "USD");
        assert!(currencies.iter().any(|c| c.code == "GTQ" && c.symbol == "Q"));
    }

    #[tokio::test]
    async fn test_current_rates_defaults() {
        let service = setup_service();

        let rates = service.current_rates().await;

        assert_eq!(rates.base, "USD");
        assert_eq!(rates.rates["USD"], 1.0);
        assert_eq!(rates.rates["MXN"], 17.5);
        assert_eq!(rates.rates.len(), 17);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reload Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_reload_overlays_stored_rates() {
        let service = setup_service();
        let now = Utc::now();
        service
            .repo()
            .upsert_rate(&StoredRate::new("USD", "GTQ", 7.9, now).unwrap())
            .await
            .unwrap();
        service
            .repo()
            .upsert_rate(&StoredRate::new("USD", "CAD", 1.35, now).unwrap())
            .await
            .unwrap();

        let applied = service.reload_rates().await.unwrap();

        assert_eq!(applied, 2);
        let rates = service.current_rates().await;
        assert_eq!(rates.rates["GTQ"], 7.9);
        assert_eq!(rates.rates["CAD"], 1.35);
        // Untouched defaults survive the overlay.
        assert_eq!(rates.rates["MXN"], 17.5);

        let result = service
            .convert(query(10_000, "USD", "GTQ", Some("es-GT")))
            .await
            .unwrap();
        assert!((result.converted_amount - 790.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_reload_skips_stored_base_override() {
        let service = setup_service();
        service
            .repo()
            .upsert_rate(&StoredRate::new("USD", "USD", 1.1, Utc::now()).unwrap())
            .await
            .unwrap();

        let applied = service.reload_rates().await.unwrap();

        assert_eq!(applied, 0);
        assert_eq!(service.current_rates().await.rates["USD"], 1.0);
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_snapshot() {
        let service = service_with(MockRateRepo::failing(), FixedSource::empty());
        let before = service.converter().await;

        let result = service.reload_rates().await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(Arc::ptr_eq(&before, &service.converter().await));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_reload_cannot_overwrite_newer_one() {
        let service = Arc::new(service_with(
            MockRateRepo::stalling(Duration::from_millis(200)),
            FixedSource::empty(),
        ));
        let now = Utc::now();
        service
            .repo()
            .upsert_rate(&StoredRate::new("USD", "GTQ", 7.5, now).unwrap())
            .await
            .unwrap();

        let slow = tokio::spawn({
            let service = service.clone();
            async move { service.reload_rates().await }
        });
        while service.repo().list_calls() == 0 {
            tokio::task::yield_now().await;
        }

        service
            .repo()
            .upsert_rate(&StoredRate::new("USD", "GTQ", 9.0, now).unwrap())
            .await
            .unwrap();
        service.reload_rates().await.unwrap();
        slow.await.unwrap().unwrap();

        assert_eq!(service.current_rates().await.rates["GTQ"], 9.0);
        assert_eq!(service.converter().await.exchange_rate("USD", "GTQ"), 9.0);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Refresh Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_refresh_stores_rounded_rates_and_reloads() {
        let service = service_with(
            MockRateRepo::new(),
            FixedSource::new(&[("GTQ", 7.812345678), ("EUR", 0.92)]),
        );

        let report = service.refresh_rates().await.unwrap();

        assert!(report.success);
        assert_eq!(report.updated, 2);
        assert_eq!(report.rates[0].currency, "GTQ");
        assert_eq!(report.rates[0].rate, "7.81234568");
        assert_eq!(report.rates[1].rate, "0.92000000");

        let stored = service.repo().get_rate("USD", "GTQ").await.unwrap().unwrap();
        assert_eq!(stored.rate, 7.81234568);
        assert_eq!(stored.last_updated, report.timestamp);

        assert_eq!(service.current_rates().await.rates["EUR"], 0.92);
    }

    #[tokio::test]
    async fn test_refresh_skips_failed_writes() {
        let service = service_with(
            MockRateRepo::rejecting("ARS"),
            FixedSource::new(&[("ARS", 350.5), ("BRL", 5.2)]),
        );

        let report = service.refresh_rates().await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.rates[0].currency, "BRL");
        assert!(service.repo().get_rate("USD", "ARS").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_skips_invalid_quotes() {
        let service = service_with(
            MockRateRepo::new(),
            FixedSource::new(&[("COP", -4100.0), ("CLP", 850.0), ("peso", 1.0)]),
        );

        let report = service.refresh_rates().await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.rates[0].currency, "CLP");
    }

    #[tokio::test]
    async fn test_refresh_source_failure_is_upstream_error() {
        let service = service_with(MockRateRepo::new(), FixedSource::unavailable());

        let result = service.refresh_rates().await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
    }
}
