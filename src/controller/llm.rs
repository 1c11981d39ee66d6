use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::Deserialize;

use crate::controller::BaseError;
use crate::database::llm_benchmark::LlmBenchmark;
use crate::database::{PageRequest, PageResult};
use crate::service::app_state::{AppState, StateRouter, create_state_router};
use crate::service::ranking::{
    BenchmarkType, LeaderboardEntry, ModelDetail, ModelFilter, ModelSort, ModelSummary,
};
use crate::utils::HttpResult;

const DEFAULT_MODEL_PAGE_SIZE: i64 = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListQuery {
    pub provider: Option<String>,
    pub creator_slug: Option<String>,
    pub license: Option<String>,
    pub max_price: Option<f64>,
    pub min_context_window: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl ModelListQuery {
    fn filter(&self) -> ModelFilter {
        ModelFilter {
            provider: self.provider.clone(),
            creator_slug: self.creator_slug.clone(),
            license: self.license.clone(),
            max_price: self.max_price,
            min_context_window: self.min_context_window,
        }
    }
}

fn parse_benchmark_type(raw: &str) -> Result<BenchmarkType, BaseError> {
    BenchmarkType::from_str(raw)
        .map_err(|_| BaseError::ParamInvalid(Some(format!("invalid benchmark type '{}'", raw))))
}

async fn list_models(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<ModelListQuery>, QueryRejection>,
) -> Result<HttpResult<Arc<PageResult<ModelSummary>>>, BaseError> {
    let Query(query) = query?;
    let filter = query.filter();
    filter.validate()?;
    let sort = match query.sort.as_deref() {
        Some(raw) => ModelSort::from_str(raw)?,
        None => ModelSort::default(),
    };
    let request = PageRequest::new(query.page, query.size, DEFAULT_MODEL_PAGE_SIZE)?;
    let page = app_state.list_models(filter, sort, request).await?;
    Ok(HttpResult::new(page))
}

async fn get_model(
    State(app_state): State<Arc<AppState>>,
    Path(model_id): Path<String>,
) -> Result<HttpResult<Arc<ModelDetail>>, BaseError> {
    let detail = app_state.get_model_detail(&model_id).await?;
    Ok(HttpResult::new(detail))
}

async fn get_leaderboard(
    State(app_state): State<Arc<AppState>>,
    Path(benchmark_type): Path<String>,
    query: Result<Query<ModelFilter>, QueryRejection>,
) -> Result<HttpResult<Arc<Vec<LeaderboardEntry>>>, BaseError> {
    let benchmark = parse_benchmark_type(&benchmark_type)?;
    let Query(filter) = query?;
    filter.validate()?;
    let entries = app_state.get_leaderboard(benchmark, filter).await?;
    Ok(HttpResult::new(entries))
}

async fn list_benchmarks(
    State(app_state): State<Arc<AppState>>,
) -> Result<HttpResult<Arc<Vec<LlmBenchmark>>>, BaseError> {
    let benchmarks = app_state.list_benchmarks(None).await?;
    Ok(HttpResult::new(benchmarks))
}

async fn list_benchmarks_by_group(
    State(app_state): State<Arc<AppState>>,
    Path(category_group): Path<String>,
) -> Result<HttpResult<Arc<Vec<LlmBenchmark>>>, BaseError> {
    let benchmarks = app_state.list_benchmarks(Some(category_group)).await?;
    Ok(HttpResult::new(benchmarks))
}

async fn get_benchmark(
    State(app_state): State<Arc<AppState>>,
    Path(benchmark_type): Path<String>,
) -> Result<HttpResult<Arc<LlmBenchmark>>, BaseError> {
    let benchmark = parse_benchmark_type(&benchmark_type)?;
    let entry = app_state.get_benchmark(benchmark).await?;
    Ok(HttpResult::new(entry))
}

pub fn create_llm_router() -> StateRouter {
    create_state_router().nest(
        "/llm",
        create_state_router()
            .route("/models", get(list_models))
            .route("/models/{model_id}", get(get_model))
            .route("/leaderboard/{benchmark_type}", get(get_leaderboard))
            .route("/benchmarks", get(list_benchmarks))
            .route("/benchmarks/{category_group}", get(list_benchmarks_by_group))
            .route("/benchmarks/type/{benchmark_type}", get(get_benchmark)),
    )
}
