//! HTTP Server configuration and startup.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use realta_types::RateRepository;

use super::auth::{CronAuth, cron_auth_middleware};
use super::handlers::{self, AppState};
use super::rate_limit::{EVICTION_INTERVAL, RateLimiterState, rate_limit_middleware};
use crate::CurrencyService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Realta currency API.
pub struct HttpServer<R: RateRepository> {
    state: Arc<AppState<R>>,
    rate_limiter: Arc<RateLimiterState>,
    cron_auth: Arc<CronAuth>,
}

impl<R: RateRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service.
    ///
    /// The cron endpoint stays closed until a secret is set.
    pub fn new(service: Arc<CurrencyService<R>>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()),
            cron_auth: Arc::new(CronAuth::default()),
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: Arc<CurrencyService<R>>, requests_per_minute: u32) -> Self {
        Self {
            rate_limiter: Arc::new(RateLimiterState::per_minute(requests_per_minute)),
            ..Self::new(service)
        }
    }

    /// Keys rate limiting on the hop appended to `X-Forwarded-For` by a
    /// reverse proxy. Only enable this when every request passes through one.
    pub fn with_trusted_proxy(mut self, trust: bool) -> Self {
        self.rate_limiter = Arc::new(self.rate_limiter.trusting_proxy(trust));
        self
    }

    /// Sets the bearer secret required by `/api/cron/*`.
    pub fn with_cron_secret(mut self, secret: Option<String>) -> Self {
        self.cron_auth = Arc::new(CronAuth::new(secret));
        self
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let api = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/currencies", get(handlers::list_currencies::<R>))
            .route("/api/convert", get(handlers::convert::<R>))
            .route("/api/prices", post(handlers::listing_prices::<R>))
            .route("/api/rates", get(handlers::rates::<R>))
            .route("/api/cron/update-rates", get(handlers::update_rates::<R>))
            .with_state(self.state.clone());

        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .merge(api)
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.cron_auth.clone(),
                cron_auth_middleware,
            ))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let limiter = self.rate_limiter.clone();
        let sweeper = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(EVICTION_INTERVAL);
            loop {
                ticker.tick().await;
                limiter.evict_idle();
            }
        });

        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        served?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
