mod browser;
mod extractor;

pub use browser::ChromeFetcher;
pub use extractor::ListingExtractor;

use std::sync::Arc;

use anyhow::Result;
use scraper::Html;
use tracing::{error, info, warn};

use crate::models::{RawListing, SearchQuery};
use crate::traits::{PageFetcher, SiteConfig};

#[derive(Clone)]
pub struct Scraper {
    config: SiteConfig,
    extractor: Arc<ListingExtractor>,
    fetcher: Arc<dyn PageFetcher>,
}

impl Scraper {
    pub fn new(config: SiteConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let extractor = Arc::new(ListingExtractor::new(&config)?);

        Ok(Self {
            config,
            extractor,
            fetcher,
        })
    }

    /// Scrape the first results page for a query.
    ///
    /// Never fails: a page that cannot be loaded yields no listings and a
    /// listing that cannot be parsed is skipped.
    pub async fn search_listings(&self, query: &SearchQuery) -> Vec<RawListing> {
        let url = self.config.build_search_url(query);
        info!(
            "Searching for {} {} under {} on {}",
            query.make, query.model, query.max_price, self.config.name
        );

        let html = match self.fetcher.fetch_rendered(&url).await {
            Ok(html) => html,
            Err(e) => {
                error!("Scraping failed: {:#}", e);
                return Vec::new();
            }
        };

        let listings = self.extract_listings(&html, query);
        info!("Found {} listings on {}", listings.len(), self.config.name);
        listings
    }

    fn extract_listings(&self, html: &str, query: &SearchQuery) -> Vec<RawListing> {
        let document = Html::parse_document(html);

        document
            .select(self.extractor.container())
            .take(self.config.max_listings)
            .filter_map(|element| match self.extractor.extract(element, query) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!("Error scraping listing: {}", e);
                    None
                }
            })
            .collect()
    }
}
