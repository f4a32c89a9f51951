//! AutoScout24 Belgium site configuration

use crate::traits::{SiteConfig, SiteSelectors};

/// Results page for the Belgian market, cheapest first
const SEARCH_URL_PATTERN: &str =
    "https://www.autoscout24.be/fr/lst/{make}/{model}?price_to={max_price}&sort=price_asc";

pub fn autoscout24_be() -> SiteConfig {
    SiteConfig {
        name: "AutoScout24".to_string(),
        search_url_pattern: SEARCH_URL_PATTERN.to_string(),
        location: "BE".to_string(),
        max_listings: 20,
        selectors: SiteSelectors {
            listing_container: ".ListItem_wrapper__J_a_C".to_string(),
            title: ".ListItem_title__znV2I".to_string(),
            price: ".Price_price__WZayw".to_string(),
            // Second cell of the detail table holds the mileage
            mileage: ".VehicleDetailTable_item__koKmA:nth-child(2)".to_string(),
        },
    }
}
