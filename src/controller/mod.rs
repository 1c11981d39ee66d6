use std::sync::Arc;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
};
use cyder_tools::log::warn;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::service::app_state::{AppState, StateRouter, create_state_router};
use article::create_article_router;
use cache::create_cache_router;
use git_repo::create_git_repo_router;
use llm::create_llm_router;

mod article;
mod cache;
mod error;
mod git_repo;
mod llm;

pub use error::BaseError;

pub fn create_router() -> StateRouter {
    create_state_router()
        .merge(create_llm_router())
        .merge(create_article_router())
        .merge(create_git_repo_router())
        .merge(create_cache_router())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// The whole application: API routes under `base_path`, a JSON 404 for
/// everything else, and CORS.
pub fn create_app(base_path: &str, allowed_origins: &[String], app_state: Arc<AppState>) -> Router {
    let api = if base_path.is_empty() || base_path == "/" {
        create_router()
    } else {
        create_state_router().nest(base_path, create_router())
    };
    api.fallback(handle_404)
        .layer(cors_layer(allowed_origins))
        .with_state(app_state)
}

pub async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": 1002, "msg": "not found" })),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::database::DbPool;
    use crate::database::article::test_support::{article, insert_article};
    use crate::database::git_repo::test_support::{insert_repo, repo};
    use crate::database::llm_model::test_support::{creator, insert_creator, insert_model, model};
    use crate::schema::enum_def::Category;
    use crate::service::app_state::test_support::memory_state;

    async fn app() -> (Router, DbPool) {
        let (state, pool) = memory_state().await;
        (create_app("/api", &[], state), pool)
    }

    async fn call(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn seed_models(pool: &DbPool) {
        insert_creator(pool, &creator(1, "openai", "OpenAI"));
        insert_creator(pool, &creator(2, "meta", "Meta"));

        let mut a = model(1, "gpt-a");
        a.model_creator_id = Some(1);
        a.provider = Some("OpenAI".to_string());
        a.score_gpqa_diamond = Some(90.0);
        a.score_aa_intelligence_index = Some(70.0);
        a.price_blended = Some(3.0);
        a.license = Some("Proprietary".to_string());

        let mut b = model(2, "llama-b");
        b.model_creator_id = Some(2);
        b.score_gpqa_diamond = Some(90.0);
        b.score_aa_intelligence_index = Some(60.0);
        b.license = Some("Llama".to_string());
        b.context_window = Some(128_000);

        let mut c = model(3, "gpt-c");
        c.model_creator_id = Some(1);
        c.provider = Some("OpenAI".to_string());
        c.score_gpqa_diamond = Some(70.0);
        c.price_blended = Some(10.0);

        let mut d = model(4, "unscored");
        d.score_aa_intelligence_index = Some(80.0);

        for m in [&a, &b, &c, &d] {
            insert_model(pool, m);
        }
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_with_plateau() {
        let (app, pool) = app().await;
        seed_models(&pool);

        let (status, body) = call(&app, "/api/llm/leaderboard/GPQA_DIAMOND").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
        let entries = body["data"].as_array().unwrap();
        let ranks: Vec<i64> = entries.iter().map(|e| e["rank"].as_i64().unwrap()).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
        assert_eq!(entries[0]["modelId"], "gpt-a");
        assert_eq!(entries[1]["provider"], "Meta");
        assert!(entries.iter().all(|e| e["modelId"] != "unscored"));
    }

    #[tokio::test]
    async fn test_leaderboard_max_price_excludes_unpriced() {
        let (app, pool) = app().await;
        seed_models(&pool);

        let (status, body) = call(&app, "/api/llm/leaderboard/GPQA_DIAMOND?maxPrice=5").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["modelId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["gpt-a"]);
    }

    #[tokio::test]
    async fn test_leaderboard_rejects_bad_input() {
        let (app, _pool) = app().await;

        let (status, body) = call(&app, "/api/llm/leaderboard/INVALID_TYPE").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1001);

        let (status, body) = call(&app, "/api/llm/leaderboard/MMLU_PRO?maxPrice=cheap").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 1001);
    }

    #[tokio::test]
    async fn test_model_listing_defaults_and_sort() {
        let (app, pool) = app().await;
        seed_models(&pool);

        let (status, body) = call(&app, "/api/llm/models").await;
        assert_eq!(status, StatusCode::OK);
        let page = &body["data"];
        assert_eq!(page["totalElements"], 4);
        assert_eq!(page["totalPages"], 1);
        assert_eq!(page["currentPage"], 0);
        assert_eq!(page["hasMore"], false);
        let ids: Vec<&str> = page["content"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["modelId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["unscored", "gpt-a", "llama-b", "gpt-c"]);
        assert!(page["content"][0].get("rank").is_none());

        let uri = "/api/llm/models?sort=GPQA_DIAMOND,asc&size=2&creatorSlug=openai";
        let (_, body) = call(&app, uri).await;
        let page = &body["data"];
        assert_eq!(page["totalElements"], 2);
        assert_eq!(page["content"][0]["modelId"], "gpt-c");
        assert_eq!(page["content"][0]["modelCreator"]["slug"], "openai");
    }

    #[tokio::test]
    async fn test_model_listing_rejects_bad_paging() {
        let (app, _pool) = app().await;
        for uri in [
            "/api/llm/models?page=-1",
            "/api/llm/models?size=0",
            "/api/llm/models?sort=FOO,desc",
            "/api/llm/models?sort=MMLU_PRO,sideways",
        ] {
            let (status, body) = call(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["code"], 1001);
        }
    }

    #[tokio::test]
    async fn test_largest_page_index_returns_empty_page() {
        let (app, pool) = app().await;
        seed_models(&pool);

        for uri in [
            "/api/llm/models?page=9223372036854775807",
            "/api/articles?page=9223372036854775807",
            "/api/git-repos?page=9223372036854775807",
            "/api/git-repos/trending?page=9223372036854775807",
        ] {
            let (status, body) = call(&app, uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(body["data"]["content"].as_array().unwrap().is_empty(), "{}", uri);
            assert_eq!(body["data"]["hasMore"], false, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_model_detail() {
        let (app, pool) = app().await;
        seed_models(&pool);

        let (status, body) = call(&app, "/api/llm/models/llama-b").await;
        assert_eq!(status, StatusCode::OK);
        let detail = &body["data"];
        assert_eq!(detail["scoreGpqaDiamond"], 90.0);
        assert!(detail["scoreAime2025"].is_null());
        assert_eq!(detail["modelCreator"]["name"], "Meta");
        assert_eq!(detail["contextWindow"], 128_000);

        let (status, body) = call(&app, "/api/llm/models/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 1002);
    }

    #[tokio::test]
    async fn test_benchmark_catalog_routes() {
        let (app, _pool) = app().await;

        let (_, body) = call(&app, "/api/llm/benchmarks").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 15);
        assert_eq!(body["data"][0]["benchmarkType"], "TERMINAL_BENCH_HARD");

        let (_, body) = call(&app, "/api/llm/benchmarks/Reasoning").await;
        let types: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["benchmarkType"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["AA_LCR", "HUMANITYS_LAST_EXAM", "MMLU_PRO", "GPQA_DIAMOND"]);

        let (status, body) = call(&app, "/api/llm/benchmarks/Unknown").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());

        let (status, body) = call(&app, "/api/llm/benchmarks/type/MATH_500").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["displayName"], "MATH-500");

        let (status, _) = call(&app, "/api/llm/benchmarks/type/math_500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_feed_routes() {
        let (app, pool) = app().await;
        let mut ai = article(1, "github", 50, 10);
        ai.category = Category::AiLlm;
        insert_article(&pool, &ai);
        insert_article(&pool, &article(2, "hackernews", 70, 20));

        let mut r = repo(1, "rust-lang/rust", 5);
        r.language = Some("Rust".to_string());
        r.stars_this_week = Some(300);
        insert_repo(&pool, &r);

        let (_, body) = call(&app, "/api/articles?category=AI_LLM").await;
        assert_eq!(body["data"]["totalElements"], 1);
        assert_eq!(body["data"]["content"][0]["tags"][0], "rust");

        let (status, _) = call(&app, "/api/articles?category=nope").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = call(&app, "/api/articles/github-trending").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = call(&app, "/api/articles/trending-ticker?limit=1").await;
        assert_eq!(body["data"][0]["id"], 2);
        assert!(body["data"][0].get("titleEn").is_none());

        let (_, body) = call(&app, "/api/git-repos/trending").await;
        assert_eq!(body["data"]["content"][0]["fullName"], "rust-lang/rust");

        let (_, body) = call(&app, "/api/git-repos/language/Rust?limit=500").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = call(&app, "/api/git-repos?page=0&size=5").await;
        assert_eq!(body["data"]["totalPages"], 1);
    }

    #[tokio::test]
    async fn test_cache_metrics_route() {
        let (app, _pool) = app().await;
        call(&app, "/api/llm/benchmarks").await;
        call(&app, "/api/llm/benchmarks").await;

        let (status, body) = call(&app, "/api/cache/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["hits"], 1);
        assert_eq!(body["data"]["misses"], 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (app, _pool) = app().await;
        let (status, body) = call(&app, "/api/nothing/here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "code": 1002, "msg": "not found" }));
    }
}
