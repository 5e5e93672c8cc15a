//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Bearer secret for `/api/cron/*`; the endpoint is closed without one.
    pub cron_secret: Option<String>,
    /// Upstream rates endpoint; the simulated source is used without one.
    pub rates_api_url: Option<String>,
    pub reload_interval: Duration,
    pub rate_limit_per_minute: u32,
    /// Key rate limiting on the proxy-appended `X-Forwarded-For` hop.
    pub trust_proxy: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let database_url = non_empty("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let reload_secs: u64 = non_empty("RATES_RELOAD_SECS")
            .unwrap_or_else(|| "3600".to_string())
            .parse()?;
        if reload_secs == 0 {
            anyhow::bail!("RATES_RELOAD_SECS must be greater than zero");
        }

        let rate_limit_per_minute = non_empty("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|| "100".to_string())
            .parse()?;

        let trust_proxy = match non_empty("TRUST_PROXY") {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => anyhow::bail!("TRUST_PROXY must be true or false, got {:?}", other),
            },
        };

        Ok(Self {
            port,
            database_url,
            cron_secret: non_empty("CRON_SECRET"),
            rates_api_url: non_empty("RATES_API_URL"),
            reload_interval: Duration::from_secs(reload_secs),
            rate_limit_per_minute,
            trust_proxy,
        })
    }

    /// The database URL with credentials stripped, for logging.
    pub fn database_display(&self) -> String {
        redact_credentials(&self.database_url)
    }
}

/// Drops the `user:password@` part of a connection URL.
fn redact_credentials(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://{}", scheme, &rest[at + 1..]),
        None => url.to_string(),
    }
}
