use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;
use crate::database::{Database, READ_LIMIT};
use crate::models::{EnrichedListing, SearchQuery, StoredCar};
use crate::scraper::{ChromeFetcher, Scraper};
use crate::scrapers::autoscout24_be;
use crate::valuation::appraise_batch;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("No cars found")]
    NoListings,

    #[error("Database error: {0:#}")]
    Storage(#[source] anyhow::Error),
}

#[derive(Clone)]
pub struct CarFinder {
    scraper: Scraper,
    database: Database,
}

impl CarFinder {
    pub async fn new(config: &Config) -> Result<Self> {
        let fetcher = ChromeFetcher::new(config.headless, config.settle_delay);
        let scraper = Scraper::new(autoscout24_be(), Arc::new(fetcher))?;
        let database = Database::connect(&config.database_url).await?;

        Ok(Self::with_parts(scraper, database))
    }

    pub fn with_parts(scraper: Scraper, database: Database) -> Self {
        Self { scraper, database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Scrape, value and store listings for one search profile
    pub async fn scrape_and_analyze(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<EnrichedListing>, FinderError> {
        let listings = self.scraper.search_listings(query).await;
        if listings.is_empty() {
            info!("No cars found for {} {}", query.make, query.model);
            return Err(FinderError::NoListings);
        }

        let enriched = appraise_batch(listings);

        self.database.insert_batch(&enriched).await.map_err(|e| {
            error!("Database write failed: {:#}", e);
            FinderError::Storage(e)
        })?;

        info!("Stored {} analyzed cars", enriched.len());
        Ok(enriched)
    }

    pub async fn recent_cars(&self) -> Result<Vec<StoredCar>, FinderError> {
        self.database.read_recent(READ_LIMIT).await.map_err(|e| {
            error!("Database read failed: {:#}", e);
            FinderError::Storage(e)
        })
    }
}
