//! Traits and configuration for website-agnostic listing scraping

use anyhow::Result;
use async_trait::async_trait;

use crate::models::SearchQuery;

/// Configuration for a listings website
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Display name for the website
    pub name: String,
    /// Search URL pattern with {make}, {model} and {max_price} placeholders
    pub search_url_pattern: String,
    /// Market code stored with every listing
    pub location: String,
    /// Maximum number of listings read from one results page
    pub max_listings: usize,
    /// CSS selectors for extracting data
    pub selectors: SiteSelectors,
}

/// CSS selectors for the parts of a listing card
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Wrapper selector for individual listings
    pub listing_container: String,
    /// Title selector within the wrapper, the year is its first word
    pub title: String,
    /// Price selector within the wrapper
    pub price: String,
    /// Mileage cell selector within the wrapper
    pub mileage: String,
}

impl SiteConfig {
    /// Fill the search URL pattern for a query
    ///
    /// # Arguments
    /// * `query` - The make, model and price ceiling to search for
    ///
    /// # Returns
    /// * `String` - The complete search URL
    pub fn build_search_url(&self, query: &SearchQuery) -> String {
        self.search_url_pattern
            .replace("{make}", &urlencoding::encode(query.make.trim()))
            .replace("{model}", &urlencoding::encode(query.model.trim()))
            .replace("{max_price}", &query.max_price.to_string())
    }
}

/// Something that can load a page and hand back its rendered HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Load `url`, let client-side rendering settle and return the DOM
    ///
    /// # Returns
    /// * `Result<String>` - Serialized document or a page-level failure
    async fn fetch_rendered(&self, url: &str) -> Result<String>;
}
