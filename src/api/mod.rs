//! HTTP surface: trigger a scrape and read back stored cars.

mod handlers;

use std::net::SocketAddr;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::car_finder::{CarFinder, FinderError};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub finder: CarFinder,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/scrape-and-analyze", post(handlers::scrape_and_analyze))
        .route("/get-cars", get(handlers::get_cars))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server and run until Ctrl-C.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

impl IntoResponse for FinderError {
    fn into_response(self) -> Response {
        // Storage details stay in the logs
        let (status, detail) = match self {
            FinderError::NoListings => (StatusCode::NOT_FOUND, "No cars found"),
            FinderError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::database::Database;
    use crate::database::tests::{row_count, temp_database};
    use crate::scraper::Scraper;
    use crate::scraper::tests::{FixtureFetcher, listing_card, results_page};
    use crate::scrapers::autoscout24_be;

    async fn setup_test_app(fetcher: FixtureFetcher) -> (Router, Database, TempDir) {
        let (database, dir) = temp_database().await;
        let scraper = Scraper::new(autoscout24_be(), Arc::new(fetcher)).unwrap();
        let state = AppState {
            finder: CarFinder::with_parts(scraper, database.clone()),
        };

        (create_router(state), database, dir)
    }

    fn scrape_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scrape-and-analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_cars_request() -> Request<Body> {
        Request::builder()
            .uri("/get-cars")
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    const QUERY: &str = r#"{"make": "toyota", "model": "yaris", "max_price": 10000}"#;

    #[tokio::test]
    async fn test_scrape_and_analyze_returns_enriched_batch() {
        let page = results_page(&[
            listing_card("2012 Toyota Yaris", "€ 10.000", "50.000 km"),
            listing_card("Toyota Yaris", "€ 8.000", ""),
        ]);
        let (app, database, _dir) = setup_test_app(FixtureFetcher::serving(page)).await;

        let response = app.oneshot(scrape_request(QUERY)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let cars = json.as_array().unwrap();
        assert_eq!(cars.len(), 2);

        assert_eq!(cars[0]["make"], "toyota");
        assert_eq!(cars[0]["model"], "yaris");
        assert_eq!(cars[0]["year"], 2012);
        assert_eq!(cars[0]["mileage"], 50000);
        assert_eq!(cars[0]["location"], "BE");
        assert_eq!(cars[0]["costs"], 300.0);
        assert!((cars[0]["resale_value"].as_f64().unwrap() - 11000.0).abs() < 1e-9);
        assert!((cars[0]["profit_margin"].as_f64().unwrap() - 700.0).abs() < 1e-9);

        assert_eq!(cars[1]["year"], 2020);
        assert_eq!(cars[1]["mileage"], 0);

        assert_eq!(row_count(&database).await, 2);
    }

    #[tokio::test]
    async fn test_empty_scrape_is_not_found_without_writes() {
        let (app, database, _dir) =
            setup_test_app(FixtureFetcher::serving(results_page(&[]))).await;

        let response = app.oneshot(scrape_request(QUERY)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["detail"], "No cars found");
        assert_eq!(row_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_page_failure_is_not_found() {
        let (app, database, _dir) = setup_test_app(FixtureFetcher::failing()).await;

        let response = app.oneshot(scrape_request(QUERY)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(row_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_server_error() {
        let page = results_page(&[listing_card("2012 Toyota Yaris", "€ 5.000", "1 km")]);
        let (app, database, _dir) = setup_test_app(FixtureFetcher::serving(page)).await;
        database.close().await;

        let response = app.oneshot(scrape_request(QUERY)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["detail"], "Database error");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_before_scraping() {
        let fetcher = FixtureFetcher::failing();
        let (app, _database, _dir) = setup_test_app(fetcher).await;

        let response = app
            .oneshot(scrape_request(r#"{"make": "toyota"}"#))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_get_cars_reads_back_stored_rows() {
        let page = results_page(&[listing_card("2018 Toyota Yaris", "€ 9.999", "20.000 km")]);
        let (app, _database, _dir) = setup_test_app(FixtureFetcher::serving(page)).await;

        let response = app.clone().oneshot(scrape_request(QUERY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_cars_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let cars = json.as_array().unwrap();
        assert_eq!(cars.len(), 1);
        assert!(cars[0]["id"].is_i64());
        assert_eq!(cars[0]["year"], 2018);
        assert_eq!(cars[0]["price"], 9999.0);
        assert!(cars[0].get("costs").is_none());
    }

    #[tokio::test]
    async fn test_get_cars_empty_table() {
        let (app, _database, _dir) = setup_test_app(FixtureFetcher::failing()).await;

        let response = app.oneshot(get_cars_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_get_cars_read_failure_is_server_error() {
        let (app, database, _dir) = setup_test_app(FixtureFetcher::failing()).await;
        database.close().await;

        let response = app.oneshot(get_cars_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
