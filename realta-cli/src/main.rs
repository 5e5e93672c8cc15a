//! Realta CLI
//!
//! Command-line interface for the Realta currency API, plus offline
//! conversion with the built-in rate table.

use anyhow::Result;
use clap::{Parser, Subcommand};

use realta_client::RealtaClient;
use realta_currency::{CurrencyConverter, DEFAULT_LOCALE, NoopObserver};
use realta_types::ListingPrice;

#[derive(Parser)]
#[command(name = "realta")]
#[command(author, version, about = "Realta currency API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Realta API
    #[arg(long, env = "REALTA_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Secret for the cron endpoints
    #[arg(long, env = "CRON_SECRET", hide_env_values = true)]
    cron_secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// List the currencies offered in the selector
    Currencies,
    /// Convert an amount given in minor units (cents)
    Convert {
        /// Amount in minor units
        amount: i64,
        #[arg(long, default_value = "USD")]
        from: String,
        #[arg(long, default_value = "USD")]
        to: String,
        /// BCP-47 locale for the formatted strings
        #[arg(long)]
        locale: Option<String>,
        /// Use the built-in rate table instead of the server
        #[arg(long)]
        offline: bool,
    },
    /// Convert listing prices into one display currency
    Prices {
        /// Display currency
        #[arg(long, default_value = "USD")]
        currency: String,
        #[arg(long)]
        locale: Option<String>,
        /// Listing as ID:AMOUNT:CURRENCY, amount in minor units (repeatable)
        #[arg(long = "listing", value_parser = parse_listing, required = true)]
        listings: Vec<ListingPrice>,
    },
    /// Show the server's active rate table
    Rates,
    /// Run the rate refresh job (requires --cron-secret)
    Refresh,
    /// Format an amount in minor units without contacting the server
    Format {
        amount: i64,
        #[arg(long, default_value = "USD")]
        currency: String,
        #[arg(long, default_value = DEFAULT_LOCALE)]
        locale: String,
    },
}

fn parse_listing(s: &str) -> Result<ListingPrice, String> {
    let mut parts = s.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(amount), Some(currency)) if !id.is_empty() && !currency.is_empty() => {
            let amount = amount
                .parse()
                .map_err(|_| format!("Invalid amount in listing: {}", s))?;
            Ok(ListingPrice {
                id: id.to_string(),
                amount,
                currency: currency.to_uppercase(),
            })
        }
        _ => Err(format!("Expected ID:AMOUNT:CURRENCY, got: {}", s)),
    }
}

fn offline_converter() -> CurrencyConverter {
    CurrencyConverter::default().with_observer(std::sync::Arc::new(NoopObserver))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = RealtaClient::new(&cli.api_url);
    if let Some(secret) = cli.cron_secret {
        client = client.with_cron_secret(secret);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Currencies => {
            let currencies = client.currencies().await?;
            println!("{}", serde_json::to_string_pretty(&currencies)?);
        }

        Commands::Convert {
            amount,
            from,
            to,
            locale,
            offline,
        } => {
            let result = if offline {
                let locale = locale.as_deref().unwrap_or(DEFAULT_LOCALE);
                offline_converter().convert_price(
                    amount,
                    &from.to_uppercase(),
                    &to.to_uppercase(),
                    locale,
                )
            } else {
                client.convert(amount, &from, &to, locale.as_deref()).await?
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Prices {
            currency,
            locale,
            listings,
        } => {
            let views = client
                .listing_prices(&currency, locale.as_deref(), listings)
                .await?;
            println!("{}", serde_json::to_string_pretty(&views)?);
        }

        Commands::Rates => {
            let rates = client.rates().await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Commands::Refresh => {
            let report = client.refresh_rates().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Format {
            amount,
            currency,
            locale,
        } => {
            println!(
                "{}",
                offline_converter().format_minor(amount, &currency.to_uppercase(), &locale)
            );
        }
    }

    Ok(())
}
