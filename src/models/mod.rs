//! Data models for search queries, scraped listings and stored cars

use serde::{Deserialize, Serialize};

/// Search profile posted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub make: String,
    pub model: String,
    pub max_price: f64,
}

/// A car listing as extracted from the results page, before valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub mileage: i64,
    pub price: f64,
    pub location: String,
}

/// A listing augmented with the estimated resale value and margin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedListing {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub mileage: i64,
    pub price: f64,
    pub location: String,
    pub resale_value: f64,
    pub costs: f64,
    pub profit_margin: f64,
}

/// A row of the `cars` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCar {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub mileage: i64,
    pub price: f64,
    pub location: String,
    pub resale_value: f64,
    pub profit_margin: f64,
}
