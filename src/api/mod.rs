//! API module for the marketplace
//!
//! REST endpoints over zip search/validation and the photographer listing,
//! plus static serving of the dataset files the search loads.

pub mod handlers;
pub mod service;

pub use service::MarketplaceService;

use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::zip_dataset::DatasetSource;

/// Build the REST router; `data_dir` is served under `/data` when given.
pub fn create_router<S: DatasetSource + 'static>(
    service: Arc<MarketplaceService<S>>,
    data_dir: Option<&Path>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/v1/health", get(handlers::health::<S>))
        // Zip codes
        .route("/api/v1/zips/search", get(handlers::search_zips::<S>))
        .route("/api/v1/zips/:zip", get(handlers::validate_zip::<S>))
        // Photographers
        .route("/api/v1/photographers", get(handlers::list_photographers::<S>))
        .route("/api/v1/photographers/:id", get(handlers::get_photographer::<S>))
        .with_state(service);

    if let Some(dir) = data_dir {
        router = router.nest_service("/data", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::mock_profiles::mock_profiles;
    use crate::models::ZipRecord;
    use crate::zip_dataset::{HttpSource, MemorySource};
    use crate::zip_search::ZipSearch;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn record(zip: &str, city: &str, state: &str, population: u64) -> ZipRecord {
        ZipRecord {
            zip: zip.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            population,
        }
    }

    async fn app(data_dir: Option<&Path>) -> Router {
        let source = MemorySource {
            quick: vec![record("90001", "Los Angeles", "CA", 50000)],
            full: vec![
                record("90001", "Los Angeles", "CA", 50000),
                record("90002", "Los Angeles", "CA", 30000),
                record("78701", "Austin", "TX", 12000),
            ],
        };
        let zips = ZipSearch::init(source, SearchConfig::default()).await;
        let service = Arc::new(MarketplaceService::new(zips, mock_profiles(40, 42)));
        create_router(service, data_dir)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(None).await, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quick_ready"], true);
        assert_eq!(body["full_loaded"], false);
        assert_eq!(body["profiles"], 40);
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (status, body) = get(app(None).await, "/api/v1/zips/search?q=los%20ang").await;
        assert_eq!(status, StatusCode::OK);
        let hits = body.as_array().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["kind"], "city");
        assert_eq!(hits[0]["allZips"], serde_json::json!(["90001", "90002"]));

        let (_, body) = get(app(None).await, "/api/v1/zips/search?q=%20").await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let (status, body) = get(app(None).await, "/api/v1/zips/78701").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Austin");

        let (status, _) = get(app(None).await, "/api/v1/zips/1234").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(app(None).await, "/api/v1/zips/99999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_photographer_filtering() {
        let (status, body) = get(app(None).await, "/api/v1/photographers?price=500%2B&rating=0").await;
        assert_eq!(status, StatusCode::OK);
        for profile in body.as_array().unwrap() {
            assert!(profile["hourlyRate"].as_f64().unwrap() >= 500.0);
        }

        let (status, body) = get(app(None).await, "/api/v1/photographers?price=all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 40);

        let (status, body) = get(app(None).await, "/api/v1/photographers?price=All&rating=ALL").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 40);

        let (status, body) = get(app(None).await, "/api/v1/photographers?price=cheap").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("cheap"));
    }

    #[tokio::test]
    async fn test_photographer_by_id() {
        let (status, body) = get(app(None).await, "/api/v1/photographers/pg-0001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "pg-0001");

        let (status, _) = get(app(None).await, "/api/v1/photographers/nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dataset_files_served() {
        let dir = tempfile::tempdir().unwrap();
        let quick = vec![record("10001", "New York", "NY", 21000)];
        std::fs::write(dir.path().join("quick.json"), serde_json::to_vec(&quick).unwrap()).unwrap();

        let (status, body) = get(app(Some(dir.path())).await, "/data/quick.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["zip"], "10001");
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_search_over_http_datasets() {
        let quick: Vec<ZipRecord> = (0..12)
            .map(|i| record(&format!("1{:04}", i), &format!("San Quick {}", i), "CA", 1000 + i))
            .collect();
        let mut full = quick.clone();
        full.extend(
            (0..20).map(|i| record(&format!("2{:04}", i), &format!("San Carlos {}", i), "CA", 500 + i)),
        );

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quick.json"), serde_json::to_vec(&quick).unwrap()).unwrap();
        std::fs::write(dir.path().join("full.json"), serde_json::to_vec(&full).unwrap()).unwrap();
        let base = serve(app(Some(dir.path())).await).await;

        let search = ZipSearch::init(HttpSource::new(&base), SearchConfig::default()).await;
        assert!(search.dataset().is_quick_ready());

        let hits = search.search("san").await;
        assert_eq!(hits.len(), 10);
        assert!(hits.iter().all(|h| h.label().starts_with("San Quick")));
        assert!(!search.dataset().is_full_loaded());

        let hits = search.search("san c").await;
        assert_eq!(hits.len(), 15);
        assert!(hits.iter().all(|h| h.label().starts_with("San Carlos")));
        assert!(search.dataset().is_full_loaded());
        assert!(search.dataset().last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_http_dataset_failures_yield_empty_results() {
        // No data dir mounted: /data/*.json answers 404
        let base = serve(app(None).await).await;
        let search = ZipSearch::init(HttpSource::new(&base), SearchConfig::default()).await;
        assert!(!search.dataset().is_quick_ready());
        assert!(search.search("san").await.is_empty());
        let error = search.dataset().last_error().await.unwrap();
        assert!(error.contains("/data/quick.json"));
        assert!(error.contains("/data/full.json"));

        let search = ZipSearch::init(HttpSource::new("http://127.0.0.1:1"), SearchConfig::default()).await;
        assert!(search.search("san").await.is_empty());
        assert!(search.validate("10001").await.is_none());
        let error = search.dataset().last_error().await.unwrap();
        assert!(error.contains("quick dataset: request to http://127.0.0.1:1/data/quick.json"));
    }
}
