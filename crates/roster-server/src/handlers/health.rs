use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Backend serving the cache, e.g. `redis` or `memory`.
    pub cache: String,
    /// `connected` or `fallback`.
    pub cache_state: String,
    /// Share of cacheable GETs served from the cache since startup.
    pub cache_hit_rate: f64,
    pub repository: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.cache();
    Json(HealthResponse {
        status: "UP".to_string(),
        cache: cache.backend().to_string(),
        cache_state: cache.state().to_string(),
        cache_hit_rate: state.cache_metrics().hit_rate(),
        repository: state.repository().name().to_string(),
    })
}
