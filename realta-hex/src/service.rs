//! Currency Application Service
//!
//! Orchestrates conversions over the active rate snapshot and keeps that
//! snapshot in step with the repository and the upstream rate source.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};

use realta_currency::{BASE_CURRENCY, CurrencyConverter, ExchangeRateTable};
use realta_types::{
    AppError, ConversionResult, ConvertQuery, CurrencyInfo, DEFAULT_LOCALE, ListingPriceView,
    ListingPricesRequest, RateRepository, RateSource, RatesResponse, RefreshResponse,
    RefreshedRate, StoredRate,
};

/// Application service for currency operations.
///
/// Generic over `R: RateRepository` - the adapter is injected at compile time.
/// Requests read an `Arc` snapshot of the converter; only reloads take the
/// write lock, and only long enough to swap the pointer. Reloads run one at
/// a time, so the last snapshot installed reflects the latest repository read.
pub struct CurrencyService<R: RateRepository> {
    repo: R,
    source: Arc<dyn RateSource>,
    converter: RwLock<Arc<CurrencyConverter>>,
    reload_lock: Mutex<()>,
}

/// Trims and upper-cases a currency code from user input.
fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl<R: RateRepository> CurrencyService<R> {
    /// Creates a service over the default rate table.
    pub fn new(repo: R, source: Arc<dyn RateSource>) -> Self {
        Self::with_converter(repo, source, CurrencyConverter::default())
    }

    /// Creates a service with an explicit starting converter.
    pub fn with_converter(repo: R, source: Arc<dyn RateSource>, converter: CurrencyConverter) -> Self {
        Self {
            repo,
            source,
            converter: RwLock::new(Arc::new(converter)),
            reload_lock: Mutex::new(()),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the active converter snapshot.
    pub async fn converter(&self) -> Arc<CurrencyConverter> {
        self.converter.read().await.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts one amount for display.
    pub async fn convert(&self, query: ConvertQuery) -> Result<ConversionResult, AppError> {
        if query.amount < 0 {
            return Err(AppError::BadRequest("Amount cannot be negative".into()));
        }

        let locale = query.locale.as_deref().unwrap_or(DEFAULT_LOCALE);
        let converter = self.converter().await;
        Ok(converter.convert_price(
            query.amount,
            &normalize_code(&query.from),
            &normalize_code(&query.to),
            locale,
        ))
    }

    /// Converts every listing price into the viewer's currency.
    pub async fn convert_listing_prices(
        &self,
        req: ListingPricesRequest,
    ) -> Result<Vec<ListingPriceView>, AppError> {
        if let Some(bad) = req.listings.iter().find(|l| l.amount < 0) {
            return Err(AppError::BadRequest(format!(
                "Listing {} has a negative amount",
                bad.id
            )));
        }

        let target = normalize_code(&req.currency);
        let locale = req.locale.as_deref().unwrap_or(DEFAULT_LOCALE);
        let converter = self.converter().await;

        Ok(req
            .listings
            .into_iter()
            .map(|listing| {
                let price = converter.convert_price(
                    listing.amount,
                    &normalize_code(&listing.currency),
                    &target,
                    locale,
                );
                ListingPriceView {
                    id: listing.id,
                    price,
                }
            })
            .collect())
    }

    /// The currencies offered in the selector.
    pub fn supported_currencies(&self) -> Vec<CurrencyInfo> {
        realta_currency::supported_currencies()
            .iter()
            .map(CurrencyInfo::from)
            .collect()
    }

    /// The rate table currently used for conversions.
    pub async fn current_rates(&self) -> RatesResponse {
        let converter = self.converter().await;
        let rates = converter.rates();
        RatesResponse {
            base: rates.base_currency().to_string(),
            rates: rates
                .iter_sorted()
                .map(|(code, rate)| (code.to_string(), rate))
                .collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rate Maintenance
    // ─────────────────────────────────────────────────────────────────────────────

    /// Rebuilds the converter from persisted rates laid over the defaults.
    ///
    /// Returns the number of persisted rates applied. If the repository
    /// fails, the current snapshot stays in place.
    #[instrument(skip(self))]
    pub async fn reload_rates(&self) -> Result<usize, AppError> {
        let _reloading = self.reload_lock.lock().await;
        let stored = self.repo.list_rates(BASE_CURRENCY).await?;

        let mut table = ExchangeRateTable::defaults();
        let mut applied = 0;
        for row in stored {
            match table.insert(row.target_currency.clone(), row.rate) {
                Ok(()) => applied += 1,
                Err(e) => warn!(currency = %row.target_currency, "Skipping stored rate: {}", e),
            }
        }

        let mut guard = self.converter.write().await;
        let next = guard.with_rates(table);
        *guard = Arc::new(next);
        drop(guard);

        info!("Loaded {} stored rates", applied);
        Ok(applied)
    }

    /// Fetches fresh quotes, persists them, and reloads the converter.
    ///
    /// A quote that cannot be stored is logged and left out of the report.
    #[instrument(skip(self), fields(source = %self.source.name()))]
    pub async fn refresh_rates(&self) -> Result<RefreshResponse, AppError> {
        let quotes = self.source.fetch_rates(BASE_CURRENCY).await?;
        let now = Utc::now();

        let mut updated = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let rate = match StoredRate::rounded(BASE_CURRENCY, &quote.currency, quote.rate, now) {
                Ok(rate) => rate,
                Err(e) => {
                    error!("Error updating rate for {}: {}", quote.currency, e);
                    continue;
                }
            };

            match self.repo.upsert_rate(&rate).await {
                Ok(saved) => updated.push(RefreshedRate {
                    currency: saved.target_currency.clone(),
                    rate: saved.rate_display(),
                }),
                Err(e) => error!("Error updating rate for {}: {}", quote.currency, e),
            }
        }

        info!("Updated {} currency rates", updated.len());

        if let Err(e) = self.reload_rates().await {
            warn!("Rates stored but reload failed: {}", e);
        }

        Ok(RefreshResponse {
            success: true,
            updated: updated.len(),
            rates: updated,
            timestamp: now,
        })
    }
}
