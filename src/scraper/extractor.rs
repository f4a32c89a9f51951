//! Field extraction for a single rendered listing card

use anyhow::Result;
use scraper::{ElementRef, Selector};
use thiserror::Error;

use crate::models::{RawListing, SearchQuery};
use crate::traits::SiteConfig;

/// Year assumed when the title does not start with one
pub const DEFAULT_YEAR: i64 = 2020;

/// Why a single listing card was skipped
#[derive(Error, Debug, PartialEq)]
pub enum ExtractError {
    #[error("missing {0} element")]
    MissingElement(&'static str),

    #[error("listing title is empty")]
    EmptyTitle,

    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    #[error("invalid mileage: {0:?}")]
    InvalidMileage(String),
}

/// Compiled selectors for one site
pub struct ListingExtractor {
    container: Selector,
    title: Selector,
    price: Selector,
    mileage: Selector,
    location: String,
}

impl ListingExtractor {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let selectors = &config.selectors;

        // Parse selectors with proper error handling
        let container = Selector::parse(&selectors.listing_container)
            .map_err(|e| anyhow::anyhow!("Failed to parse listing selector: {:?}", e))?;
        let title = Selector::parse(&selectors.title)
            .map_err(|e| anyhow::anyhow!("Failed to parse title selector: {:?}", e))?;
        let price = Selector::parse(&selectors.price)
            .map_err(|e| anyhow::anyhow!("Failed to parse price selector: {:?}", e))?;
        let mileage = Selector::parse(&selectors.mileage)
            .map_err(|e| anyhow::anyhow!("Failed to parse mileage selector: {:?}", e))?;

        Ok(Self {
            container,
            title,
            price,
            mileage,
            location: config.location.clone(),
        })
    }

    /// Selector matching every listing wrapper on a results page
    pub fn container(&self) -> &Selector {
        &self.container
    }

    /// Build a raw listing from one wrapper element
    ///
    /// Make and model come from the query, the page only supplies year,
    /// price and mileage.
    pub fn extract(
        &self,
        listing: ElementRef<'_>,
        query: &SearchQuery,
    ) -> Result<RawListing, ExtractError> {
        let title = inner_text(listing, &self.title, "title")?;
        let price = parse_price(&inner_text(listing, &self.price, "price")?)?;
        let mileage = parse_mileage(&inner_text(listing, &self.mileage, "mileage")?)?;
        let year = parse_year(&title)?;

        Ok(RawListing {
            make: query.make.clone(),
            model: query.model.clone(),
            year,
            mileage,
            price,
            location: self.location.clone(),
        })
    }
}

fn inner_text(
    listing: ElementRef<'_>,
    selector: &Selector,
    field: &'static str,
) -> Result<String, ExtractError> {
    listing
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or(ExtractError::MissingElement(field))
}

/// Year from the first word of a title such as "2017 BMW 320d"
pub fn parse_year(title: &str) -> Result<i64, ExtractError> {
    let first = title.split_whitespace().next().ok_or(ExtractError::EmptyTitle)?;

    if first.chars().all(|c| c.is_ascii_digit()) {
        Ok(first.parse().unwrap_or(DEFAULT_YEAR))
    } else {
        Ok(DEFAULT_YEAR)
    }
}

/// Price from text such as "€ 12.500"
pub fn parse_price(text: &str) -> Result<f64, ExtractError> {
    // Pages decoded as latin-1 show the euro sign as "â‚¬"
    let cleaned = text
        .replace("â‚¬", "")
        .replace('€', "")
        .replace('.', "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Ok(0.0);
    }

    cleaned
        .parse()
        .map_err(|_| ExtractError::InvalidPrice(text.trim().to_string()))
}

/// Mileage from text such as "85.000 km"
pub fn parse_mileage(text: &str) -> Result<i64, ExtractError> {
    let cleaned = text.replace(" km", "").replace('.', "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Ok(0);
    }

    cleaned
        .parse()
        .map_err(|_| ExtractError::InvalidMileage(text.trim().to_string()))
}
