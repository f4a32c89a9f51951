//! Environment-driven configuration
//!
//! Values are read once at startup, after `.env` has been loaded with
//! `dotenvy`. Every variable is optional:
//!
//! | variable             | default           |
//! |----------------------|-------------------|
//! | `DATABASE_URL`       | `sqlite:cardb.db` |
//! | `HOST`               | `0.0.0.0`         |
//! | `PORT`               | `8000`            |
//! | `SCRAPE_SETTLE_SECS` | `3`               |
//! | `CHROME_HEADLESS`    | `true`            |

use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite:cardb.db";

/// Scheme prefixes hosting providers and Python drivers use for Postgres
const LEGACY_POSTGRES_SCHEMES: [&str; 3] = [
    "postgres://",
    "postgresql+psycopg://",
    "postgresql+psycopg2://",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub settle_delay: Duration,
    pub headless: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map_or_else(
                || DEFAULT_DATABASE_URL.to_string(),
                |url| normalize_database_url(url.trim()),
            );

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .map(|port| port.parse::<u16>())
            .transpose()
            .context("PORT must be a port number")?
            .unwrap_or(8000);

        let settle_secs = lookup("SCRAPE_SETTLE_SECS")
            .map(|secs| secs.parse::<u64>())
            .transpose()
            .context("SCRAPE_SETTLE_SECS must be a whole number of seconds")?
            .unwrap_or(3);

        let headless = lookup("CHROME_HEADLESS")
            .map(|flag| flag.parse::<bool>())
            .transpose()
            .context("CHROME_HEADLESS must be true or false")?
            .unwrap_or(true);

        Ok(Self {
            database_url,
            host,
            port,
            settle_delay: Duration::from_secs(settle_secs),
            headless,
        })
    }
}

/// Rewrite legacy Postgres scheme names to the `postgresql://` form sqlx expects
pub fn normalize_database_url(url: &str) -> String {
    LEGACY_POSTGRES_SCHEMES
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .map_or_else(|| url.to_string(), |rest| format!("postgresql://{rest}"))
}
