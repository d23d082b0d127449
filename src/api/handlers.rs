//! REST API handlers for the marketplace
//!
//! These handlers use the shared MarketplaceService.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::service::MarketplaceService;
use crate::filters::{FilterParams, ProfileFilter};
use crate::models::{is_valid_zip, ProfileRecord, SearchHit, ZipRecord};
use crate::zip_dataset::DatasetSource;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub quick_ready: bool,
    pub full_loaded: bool,
    pub dataset_error: Option<String>,
    pub profiles: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState<S> = Arc<MarketplaceService<S>>;

/// GET /api/v1/health
pub async fn health<S: DatasetSource>(State(service): State<AppState<S>>) -> impl IntoResponse {
    let dataset = service.zips().dataset();
    Json(HealthResponse {
        status: "ok",
        quick_ready: dataset.is_quick_ready(),
        full_loaded: dataset.is_full_loaded(),
        dataset_error: dataset.last_error().await,
        profiles: service.profile_count(),
    })
}

/// GET /api/v1/zips/search?q=
pub async fn search_zips<S: DatasetSource>(
    State(service): State<AppState<S>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<SearchHit>> {
    Json(service.search_zips(&params.q).await)
}

/// GET /api/v1/zips/:zip
pub async fn validate_zip<S: DatasetSource>(
    State(service): State<AppState<S>>,
    Path(zip): Path<String>,
) -> Result<Json<ZipRecord>, ApiError> {
    if !is_valid_zip(&zip) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("'{}' is not a 5-digit zip code", zip),
        ));
    }
    match service.validate_zip(&zip).await {
        Some(record) => Ok(Json(record)),
        None => Err(error(StatusCode::NOT_FOUND, format!("Zip code not found: {}", zip))),
    }
}

/// GET /api/v1/photographers
pub async fn list_photographers<S: DatasetSource>(
    State(service): State<AppState<S>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<ProfileRecord>>, ApiError> {
    let filter = ProfileFilter::try_from(params)
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let matches: Vec<ProfileRecord> = service
        .find_photographers(&filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(matches))
}

/// GET /api/v1/photographers/:id
pub async fn get_photographer<S: DatasetSource>(
    State(service): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<ProfileRecord>, ApiError> {
    service
        .photographer(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("Photographer not found: {}", id)))
}
