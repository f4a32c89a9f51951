//! HTTP request handlers.

use axum::{Json, extract::State};

use super::AppState;
use crate::car_finder::FinderError;
use crate::models::{EnrichedListing, SearchQuery, StoredCar};

/// Scrape listings for a search profile, value them and store the batch.
pub async fn scrape_and_analyze(
    State(state): State<AppState>,
    Json(query): Json<SearchQuery>,
) -> Result<Json<Vec<EnrichedListing>>, FinderError> {
    state.finder.scrape_and_analyze(&query).await.map(Json)
}

/// Up to 50 stored cars, unordered.
pub async fn get_cars(State(state): State<AppState>) -> Result<Json<Vec<StoredCar>>, FinderError> {
    state.finder.recent_cars().await.map(Json)
}
