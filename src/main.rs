use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod car_finder;
mod config;
mod database;
mod models;
mod scraper;
mod scrapers;
mod traits;
mod valuation;

use api::AppState;
use car_finder::CarFinder;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Car Finder");

    let config = Config::from_env()?;
    let finder = CarFinder::new(&config).await?;
    let database = finder.database().clone();

    api::serve(AppState { finder }, &config.host, config.port).await?;

    database.close().await;
    info!("Database connections closed");

    Ok(())
}
