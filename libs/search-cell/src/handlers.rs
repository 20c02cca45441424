use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{GeoPoint, RankableEntity, RankingQuery, SearchError, SortKey};
use crate::services::RankingService;

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    pub entities: Vec<RankableEntity>,
    pub origin: Option<GeoPoint>,
    pub sort_by: Option<String>,
    pub available_day: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRequest {
    pub entities: Vec<RankableEntity>,
    pub origin: Option<GeoPoint>,
    pub radius_km: Option<f64>,
}

#[axum::debug_handler]
pub async fn rank_entities(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RankRequest>,
) -> Result<Json<Value>, AppError> {
    let ranking_service = RankingService::new(&state);
    let sort_key = SortKey::parse_selection(request.sort_by.as_deref())?;
    let query = RankingQuery::new(request.origin, sort_key);

    let results = ranking_service.rank(&request.entities, &query, request.available_day.as_deref());

    Ok(Json(json!({
        "results": results,
        "total": results.len()
    })))
}

#[axum::debug_handler]
pub async fn find_nearby(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<NearbyRequest>,
) -> Result<Json<Value>, AppError> {
    let ranking_service = RankingService::new(&state);

    let results = ranking_service.nearby(&request.entities, request.origin, request.radius_km)?;

    Ok(Json(json!({
        "success": true,
        "results": results,
        "count": results.len()
    })))
}
