//! # Realta Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter and rate source
//! - Create the currency service and load persisted rates
//! - Start the reload worker and the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use realta_hex::{CurrencyService, RateReloadWorker, inbound::HttpServer};
use realta_repo::{HttpRateSource, SimulatedRateSource, build_repo};
use realta_types::RateSource;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("realta-currency-service"), provider))
}

/// Picks the upstream feed: HTTP when a URL is configured, simulated otherwise.
fn rate_source(rates_api_url: Option<&str>) -> Arc<dyn RateSource> {
    match rates_api_url {
        Some(url) => Arc::new(HttpRateSource::new(url)),
        None => Arc::new(SimulatedRateSource::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,realta_app=debug,realta_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting realta server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_display());
    if config.cron_secret.is_none() {
        tracing::warn!("CRON_SECRET is not set; /api/cron/update-rates will reject every request");
    }

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    let source = rate_source(config.rates_api_url.as_deref());
    tracing::info!("Using {} rate source", source.name());

    // Create the currency service and load whatever the refresh job stored last
    let service = Arc::new(CurrencyService::new(repo, source));
    if let Err(e) = service.reload_rates().await {
        tracing::warn!("Starting with default rates: {}", e);
    }

    tokio::spawn(RateReloadWorker::new(service.clone(), config.reload_interval).run());

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(service, config.rate_limit_per_minute)
        .with_cron_secret(config.cron_secret)
        .with_trusted_proxy(config.trust_proxy);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
