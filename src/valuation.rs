//! Rule-based resale estimate for scraped listings

use crate::models::{EnrichedListing, RawListing};

/// Markup applied to the asking price to estimate resale
const RESALE_MARKUP: f64 = 1.15;
/// Value lost per 1000 km driven
const MILEAGE_PENALTY_PER_1000_KM: f64 = 10.0;
/// Flat preparation and transfer costs per car
pub const FLAT_COSTS: f64 = 300.0;

pub fn appraise(listing: RawListing) -> EnrichedListing {
    let resale_value = listing.price * RESALE_MARKUP
        - (listing.mileage as f64 / 1000.0) * MILEAGE_PENALTY_PER_1000_KM;
    let profit_margin = resale_value - listing.price - FLAT_COSTS;

    EnrichedListing {
        make: listing.make,
        model: listing.model,
        year: listing.year,
        mileage: listing.mileage,
        price: listing.price,
        location: listing.location,
        resale_value,
        costs: FLAT_COSTS,
        profit_margin,
    }
}

pub fn appraise_batch(listings: Vec<RawListing>) -> Vec<EnrichedListing> {
    listings.into_iter().map(appraise).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: f64, mileage: i64) -> RawListing {
        RawListing {
            make: "bmw".to_string(),
            model: "320".to_string(),
            year: 2018,
            mileage,
            price,
            location: "BE".to_string(),
        }
    }

    #[test]
    fn test_appraise_reference_example() {
        let enriched = appraise(listing(10_000.0, 50_000));

        assert!((enriched.resale_value - 11_000.0).abs() < 1e-9);
        assert!((enriched.profit_margin - 700.0).abs() < 1e-9);
        assert_eq!(enriched.costs, 300.0);
    }

    #[test]
    fn test_appraise_keeps_listing_fields() {
        let enriched = appraise(listing(8_500.0, 120_500));

        assert_eq!(enriched.make, "bmw");
        assert_eq!(enriched.model, "320");
        assert_eq!(enriched.year, 2018);
        assert_eq!(enriched.mileage, 120_500);
        assert_eq!(enriched.price, 8_500.0);
        assert_eq!(enriched.location, "BE");
    }

    #[test]
    fn test_mileage_penalty_is_not_truncated() {
        // 1500 km costs 15, not 10
        let enriched = appraise(listing(0.0, 1_500));
        assert!((enriched.resale_value + 15.0).abs() < 1e-9);
        assert!((enriched.profit_margin + 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_defaults_only_lose_costs() {
        let enriched = appraise(listing(0.0, 0));
        assert_eq!(enriched.resale_value, 0.0);
        assert_eq!(enriched.profit_margin, -FLAT_COSTS);
    }

    #[test]
    fn test_appraise_batch_preserves_order() {
        let batch = appraise_batch(vec![listing(1_000.0, 0), listing(2_000.0, 0)]);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].price, 1_000.0);
        assert_eq!(batch[1].price, 2_000.0);
    }
}
