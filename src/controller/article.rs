use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::Deserialize;

use crate::controller::BaseError;
use crate::database::article::{ArticleView, TickerItem};
use crate::database::{PageRequest, PageResult, clamp_limit};
use crate::schema::enum_def::Category;
use crate::service::app_state::{AppState, StateRouter, create_state_router};
use crate::utils::HttpResult;

const DEFAULT_ARTICLE_PAGE_SIZE: i64 = 9;
const DEFAULT_GITHUB_TRENDING_LIMIT: i64 = 10;
const DEFAULT_TICKER_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct CategoryPageQuery {
    pub category: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Parses an optional `category` parameter; absent or empty means all.
pub fn parse_category(raw: Option<&str>) -> Result<Option<Category>, BaseError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => Category::from_str(value)
            .map(Some)
            .map_err(|_| BaseError::ParamInvalid(Some(format!("invalid category '{}'", value)))),
    }
}

async fn list_articles(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<CategoryPageQuery>, QueryRejection>,
) -> Result<HttpResult<Arc<PageResult<ArticleView>>>, BaseError> {
    let Query(query) = query?;
    let category = parse_category(query.category.as_deref())?;
    let request = PageRequest::new(query.page, query.size, DEFAULT_ARTICLE_PAGE_SIZE)?;
    let page = app_state.list_articles(category, request).await?;
    Ok(HttpResult::new(page))
}

async fn github_trending(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<HttpResult<Arc<Vec<ArticleView>>>, BaseError> {
    let Query(query) = query?;
    let limit = clamp_limit(query.limit, DEFAULT_GITHUB_TRENDING_LIMIT);
    let articles = app_state.github_trending_articles(limit).await?;
    Ok(HttpResult::new(articles))
}

async fn trending_ticker(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<HttpResult<Arc<Vec<TickerItem>>>, BaseError> {
    let Query(query) = query?;
    let limit = clamp_limit(query.limit, DEFAULT_TICKER_LIMIT);
    let ticker = app_state.trending_ticker(limit).await?;
    Ok(HttpResult::new(ticker))
}

pub fn create_article_router() -> StateRouter {
    create_state_router().nest(
        "/articles",
        create_state_router()
            .route("/", get(list_articles))
            .route("/github-trending", get(github_trending))
            .route("/trending-ticker", get(trending_ticker)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(None).unwrap(), None);
        assert_eq!(parse_category(Some("")).unwrap(), None);
        assert_eq!(parse_category(Some("AI_LLM")).unwrap(), Some(Category::AiLlm));
        assert!(matches!(
            parse_category(Some("ai")),
            Err(BaseError::ParamInvalid(_))
        ));
    }
}
