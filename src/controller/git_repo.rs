use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::Deserialize;

use super::article::{CategoryPageQuery, LimitQuery, parse_category};
use crate::controller::BaseError;
use crate::database::git_repo::GitRepo;
use crate::database::{PageRequest, PageResult, clamp_limit};
use crate::service::app_state::{AppState, StateRouter, create_state_router};
use crate::utils::HttpResult;

const DEFAULT_REPO_PAGE_SIZE: i64 = 10;
const DEFAULT_LANGUAGE_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

async fn list_git_repos(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<CategoryPageQuery>, QueryRejection>,
) -> Result<HttpResult<Arc<PageResult<GitRepo>>>, BaseError> {
    let Query(query) = query?;
    let category = parse_category(query.category.as_deref())?;
    let request = PageRequest::new(query.page, query.size, DEFAULT_REPO_PAGE_SIZE)?;
    let page = app_state.list_git_repos(category, request).await?;
    Ok(HttpResult::new(page))
}

async fn trending_git_repos(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<HttpResult<Arc<PageResult<GitRepo>>>, BaseError> {
    let Query(query) = query?;
    let request = PageRequest::new(query.page, query.size, DEFAULT_REPO_PAGE_SIZE)?;
    let page = app_state.trending_git_repos(request).await?;
    Ok(HttpResult::new(page))
}

async fn git_repos_by_language(
    State(app_state): State<Arc<AppState>>,
    Path(language): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<HttpResult<Arc<Vec<GitRepo>>>, BaseError> {
    let Query(query) = query?;
    let limit = clamp_limit(query.limit, DEFAULT_LANGUAGE_LIMIT);
    let repos = app_state.git_repos_by_language(&language, limit).await?;
    Ok(HttpResult::new(repos))
}

pub fn create_git_repo_router() -> StateRouter {
    create_state_router().nest(
        "/git-repos",
        create_state_router()
            .route("/", get(list_git_repos))
            .route("/trending", get(trending_git_repos))
            .route("/language/{language}", get(git_repos_by_language)),
    )
}
