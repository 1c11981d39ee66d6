use std::sync::Arc;

use axum::{extract::State, routing::get};

use crate::service::app_state::{AppState, StateRouter, create_state_router};
use crate::service::cache::metrics::CacheMetricsSnapshot;
use crate::utils::HttpResult;

async fn get_cache_metrics(
    State(app_state): State<Arc<AppState>>,
) -> HttpResult<CacheMetricsSnapshot> {
    HttpResult::new(app_state.cache_metrics())
}

pub fn create_cache_router() -> StateRouter {
    create_state_router().route("/cache/metrics", get(get_cache_metrics))
}
