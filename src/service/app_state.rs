use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use cyder_tools::log::{debug, info, warn};
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::cache::memory::MemoryCacheBackend;
use super::cache::metrics::{CacheMetrics, CacheMetricsSnapshot};
use super::cache::redis::RedisCacheBackend;
use super::cache::repository::CacheRepository;
use super::cache::types::CacheEntry;
use super::cache::CacheError;
use super::ranking::{
    BenchmarkType, LeaderboardEntry, ModelDetail, ModelFilter, ModelSort, ModelSummary,
    build_leaderboard, list_models,
};
use super::redis::{self, RedisPool};
use crate::config::{CONFIG, CacheBackendType, CacheConfig, RedisConfig};
use crate::controller::BaseError;
use crate::database::article::{Article, ArticleView, TickerItem};
use crate::database::git_repo::GitRepo;
use crate::database::llm_benchmark::LlmBenchmark;
use crate::database::llm_model::LlmModel;
use crate::database::{DbPool, DbResult, PageRequest, PageResult};
use crate::schema::enum_def::Category;

/// Keys longer than this are replaced by a digest of the arguments.
const MAX_KEY_LEN: usize = 200;

/// Builds `"<function>:<urlencoded args>"` cache keys. Arguments are
/// appended in call order, and unset optional fields are skipped.
struct CacheKey {
    function: &'static str,
    args: Vec<String>,
}

impl CacheKey {
    fn new(function: &'static str) -> Self {
        CacheKey {
            function,
            args: Vec::new(),
        }
    }

    fn arg<V: Serialize>(self, name: &str, value: V) -> Result<Self, CacheError> {
        self.args(&[(name, value)])
    }

    fn args<A: Serialize + ?Sized>(mut self, args: &A) -> Result<Self, CacheError> {
        let encoded = serde_urlencoded::to_string(args)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;
        if !encoded.is_empty() {
            self.args.push(encoded);
        }
        Ok(self)
    }

    fn page(self, request: PageRequest) -> Result<Self, CacheError> {
        self.args(&request)
    }

    fn build(self) -> String {
        let args = self.args.join("&");
        if self.function.len() + 1 + args.len() <= MAX_KEY_LEN {
            return format!("{}:{}", self.function, args);
        }
        let mut hasher = Sha256::new();
        hasher.update(args.as_bytes());
        format!("{}:sha256={:x}", self.function, hasher.finalize())
    }
}

#[derive(Clone)]
enum AnyCacheRepo<T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static> {
    Memory(CacheRepository<T, MemoryCacheBackend<T>>),
    Redis(CacheRepository<T, RedisCacheBackend<T>>),
}

impl<T> AnyCacheRepo<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
{
    async fn get_entry(&self, key: &str) -> Result<Option<Arc<CacheEntry<T>>>, CacheError> {
        match self {
            AnyCacheRepo::Memory(repo) => repo.get_entry(key).await,
            AnyCacheRepo::Redis(repo) => repo.get_entry(key).await,
        }
    }

    async fn set_positive(&self, key: &str, value: Arc<T>) -> Result<(), CacheError> {
        match self {
            AnyCacheRepo::Memory(repo) => repo.set_positive(key, value).await,
            AnyCacheRepo::Redis(repo) => repo.set_positive(key, value).await,
        }
    }

    async fn set_negative(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        match self {
            AnyCacheRepo::Memory(repo) => repo.set_negative(key, ttl).await,
            AnyCacheRepo::Redis(repo) => repo.set_negative(key, ttl).await,
        }
    }

    async fn clear(&self) -> Result<(), CacheError> {
        match self {
            AnyCacheRepo::Memory(repo) => repo.clear().await,
            AnyCacheRepo::Redis(repo) => repo.clear().await,
        }
    }
}

type CacheRepo<T> = AnyCacheRepo<T>;

struct RepoFactory<'a> {
    ttl: Option<Duration>,
    redis: Option<(&'a RedisPool, String)>,
    metrics: &'a Arc<CacheMetrics>,
}

impl RepoFactory<'_> {
    fn create<T>(&self) -> CacheRepo<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
    {
        match &self.redis {
            Some((pool, key_prefix)) => {
                let backend = RedisCacheBackend::new(
                    (*pool).clone(),
                    key_prefix.clone(),
                    self.metrics.clone(),
                );
                AnyCacheRepo::Redis(CacheRepository::new(backend, self.ttl))
            }
            None => AnyCacheRepo::Memory(CacheRepository::new(
                MemoryCacheBackend::new(self.metrics.clone()),
                self.ttl,
            )),
        }
    }
}

/// Shared request state: the connection pool plus a result cache in front
/// of every read query.
#[derive(Clone)]
pub struct AppState {
    db: DbPool,

    leaderboard_cache: CacheRepo<Vec<LeaderboardEntry>>,
    model_page_cache: CacheRepo<PageResult<ModelSummary>>,
    model_detail_cache: CacheRepo<ModelDetail>,
    benchmark_cache: CacheRepo<Vec<LlmBenchmark>>,
    benchmark_entry_cache: CacheRepo<LlmBenchmark>,
    article_page_cache: CacheRepo<PageResult<ArticleView>>,
    article_list_cache: CacheRepo<Vec<ArticleView>>,
    ticker_cache: CacheRepo<Vec<TickerItem>>,
    repo_page_cache: CacheRepo<PageResult<GitRepo>>,
    repo_list_cache: CacheRepo<Vec<GitRepo>>,

    metrics: Arc<CacheMetrics>,
    negative_cache_ttl: Duration,
}

impl AppState {
    pub async fn new(db: DbPool, cache: &CacheConfig, redis_config: Option<&RedisConfig>) -> Self {
        let redis_pool = match (&cache.backend, redis_config) {
            (CacheBackendType::Redis, Some(config)) => redis::connect(config).await,
            _ => None,
        };

        match (&cache.backend, &redis_pool) {
            (CacheBackendType::Redis, Some(_)) => info!("Using Redis cache backend."),
            (CacheBackendType::Redis, None) => {
                warn!("Redis cache requested but unavailable. Falling back to in-memory cache.")
            }
            (CacheBackendType::Memory, _) => info!("Using in-memory cache backend."),
        }

        let metrics = Arc::new(CacheMetrics::new());
        let factory = RepoFactory {
            ttl: Some(cache.ttl()),
            redis: redis_pool.as_ref().map(|pool| {
                let base = redis_config.map(|c| c.key_prefix.as_str()).unwrap_or_default();
                (pool, format!("{}{}", base, cache.redis.key_prefix))
            }),
            metrics: &metrics,
        };

        Self {
            db,
            leaderboard_cache: factory.create(),
            model_page_cache: factory.create(),
            model_detail_cache: factory.create(),
            benchmark_cache: factory.create(),
            benchmark_entry_cache: factory.create(),
            article_page_cache: factory.create(),
            article_list_cache: factory.create(),
            ticker_cache: factory.create(),
            repo_page_cache: factory.create(),
            repo_list_cache: factory.create(),
            metrics: metrics.clone(),
            negative_cache_ttl: cache.negative_ttl(),
        }
    }

    /// Drops every cached result in every repository.
    pub async fn clear_cache(&self) {
        let results = [
            self.leaderboard_cache.clear().await,
            self.model_page_cache.clear().await,
            self.model_detail_cache.clear().await,
            self.benchmark_cache.clear().await,
            self.benchmark_entry_cache.clear().await,
            self.article_page_cache.clear().await,
            self.article_list_cache.clear().await,
            self.ticker_cache.clear().await,
            self.repo_page_cache.clear().await,
            self.repo_list_cache.clear().await,
        ];
        for e in results.into_iter().filter_map(Result::err) {
            warn!("Failed to clear result cache: {}", e);
        }
        info!("Result cache cleared.");
    }

    pub fn cache_metrics(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn record_cache_error(&self, key: &str, e: CacheError) {
        self.metrics.record_error();
        warn!("cache error on {}: {}", key, e);
    }

    async fn with_db<T, F>(&self, query: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&DbPool) -> DbResult<T> + Send + 'static,
    {
        let pool = self.db.clone();
        tokio::task::spawn_blocking(move || query(&pool))
            .await
            .map_err(|e| {
                BaseError::InternalServerError(Some(format!("database task failed: {}", e)))
            })?
    }

    /// Serves `key` from `repo`, running `query` on a miss. A query that
    /// ends in `NotFound` is remembered as a negative entry and yields `None`.
    /// Cache failures are logged and the query runs against the store.
    async fn cached_lookup<T, F>(
        &self,
        repo: &CacheRepo<T>,
        key: Result<CacheKey, CacheError>,
        query: F,
    ) -> DbResult<Option<Arc<T>>>
    where
        T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
        F: FnOnce(&DbPool) -> DbResult<T> + Send + 'static,
    {
        let key = match key {
            Ok(key) => Some(key.build()),
            Err(e) => {
                self.record_cache_error("<key>", e);
                None
            }
        };

        if let Some(key) = &key {
            match repo.get_entry(key).await {
                Ok(Some(entry)) => {
                    return Ok(match &*entry {
                        CacheEntry::Positive(value) => {
                            debug!("cache hit (positive): {}", key);
                            Some(value.clone())
                        }
                        CacheEntry::Negative => {
                            debug!("cache hit (negative): {}", key);
                            None
                        }
                    });
                }
                Ok(None) => debug!("cache miss: {}", key),
                Err(e) => self.record_cache_error(key, e),
            }
        }

        match self.with_db(query).await {
            Ok(value) => {
                let value = Arc::new(value);
                if let Some(key) = &key {
                    if let Err(e) = repo.set_positive(key, value.clone()).await {
                        self.record_cache_error(key, e);
                    }
                }
                Ok(Some(value))
            }
            Err(BaseError::NotFound(msg)) => {
                debug!("not found: {}", msg.as_deref().unwrap_or_default());
                if let Some(key) = &key {
                    if let Err(e) = repo.set_negative(key, self.negative_cache_ttl).await {
                        self.record_cache_error(key, e);
                    }
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn cached<T, F>(
        &self,
        repo: &CacheRepo<T>,
        key: Result<CacheKey, CacheError>,
        query: F,
    ) -> DbResult<Arc<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
        F: FnOnce(&DbPool) -> DbResult<T> + Send + 'static,
    {
        self.cached_lookup(repo, key, query)
            .await?
            .ok_or(BaseError::NotFound(None))
    }

    // ============================================================================================
    // LLM models and benchmarks
    // ============================================================================================

    pub async fn get_leaderboard(
        &self,
        benchmark: BenchmarkType,
        filter: ModelFilter,
    ) -> DbResult<Arc<Vec<LeaderboardEntry>>> {
        let key = CacheKey::new("leaderboard")
            .arg("benchmarkType", benchmark.to_string())
            .and_then(|k| k.args(&filter));
        self.cached(&self.leaderboard_cache, key, move |pool| {
            let rows = LlmModel::list_with_creators(pool)?;
            Ok(build_leaderboard(benchmark, &filter, &rows))
        })
        .await
    }

    pub async fn list_models(
        &self,
        filter: ModelFilter,
        sort: ModelSort,
        request: PageRequest,
    ) -> DbResult<Arc<PageResult<ModelSummary>>> {
        let key = CacheKey::new("list_models")
            .args(&filter)
            .and_then(|k| k.arg("sort", sort.to_string()))
            .and_then(|k| k.page(request));
        self.cached(&self.model_page_cache, key, move |pool| {
            let rows = LlmModel::list_with_creators(pool)?;
            Ok(list_models(&rows, &filter, sort, request))
        })
        .await
    }

    pub async fn get_model_detail(&self, model_id: &str) -> DbResult<Arc<ModelDetail>> {
        let key = CacheKey::new("model_detail").arg("modelId", model_id);
        let owned_id = model_id.to_string();
        self.cached_lookup(&self.model_detail_cache, key, move |pool| {
            LlmModel::get_with_creator(pool, &owned_id).map(ModelDetail::from)
        })
        .await?
        .ok_or_else(|| BaseError::NotFound(Some(format!("model '{}' not found", model_id))))
    }

    /// The catalog, optionally narrowed to one category group.
    pub async fn list_benchmarks(&self, group: Option<String>) -> DbResult<Arc<Vec<LlmBenchmark>>> {
        let key = match &group {
            Some(g) => CacheKey::new("list_benchmarks").arg("categoryGroup", g),
            None => Ok(CacheKey::new("list_benchmarks")),
        };
        self.cached(&self.benchmark_cache, key, move |pool| match &group {
            Some(g) => LlmBenchmark::list_by_group(pool, g),
            None => LlmBenchmark::list_all(pool),
        })
        .await
    }

    pub async fn get_benchmark(&self, benchmark: BenchmarkType) -> DbResult<Arc<LlmBenchmark>> {
        let key = CacheKey::new("get_benchmark").arg("benchmarkType", benchmark.to_string());
        self.cached_lookup(&self.benchmark_entry_cache, key, move |pool| {
            LlmBenchmark::get_by_type(pool, &benchmark.to_string())
        })
        .await?
        .ok_or_else(|| BaseError::NotFound(Some(format!("benchmark '{}' not found", benchmark))))
    }

    // ============================================================================================
    // Articles
    // ============================================================================================

    pub async fn list_articles(
        &self,
        category: Option<Category>,
        request: PageRequest,
    ) -> DbResult<Arc<PageResult<ArticleView>>> {
        let key = category_key("list_articles", category).and_then(|k| k.page(request));
        self.cached(&self.article_page_cache, key, move |pool| {
            Ok(Article::list_page(pool, category, request)?.map(ArticleView::from))
        })
        .await
    }

    pub async fn github_trending_articles(&self, limit: i64) -> DbResult<Arc<Vec<ArticleView>>> {
        let key = CacheKey::new("github_trending_articles").arg("limit", limit);
        self.cached(&self.article_list_cache, key, move |pool| {
            Ok(Article::list_github_trending(pool, limit)?
                .into_iter()
                .map(ArticleView::from)
                .collect())
        })
        .await
    }

    pub async fn trending_ticker(&self, limit: i64) -> DbResult<Arc<Vec<TickerItem>>> {
        let key = CacheKey::new("trending_ticker").arg("limit", limit);
        self.cached(&self.ticker_cache, key, move |pool| {
            Article::list_trending_ticker(pool, limit)
        })
        .await
    }

    // ============================================================================================
    // Git repositories
    // ============================================================================================

    pub async fn list_git_repos(
        &self,
        category: Option<Category>,
        request: PageRequest,
    ) -> DbResult<Arc<PageResult<GitRepo>>> {
        let key = category_key("list_git_repos", category).and_then(|k| k.page(request));
        self.cached(&self.repo_page_cache, key, move |pool| {
            GitRepo::list_page(pool, category, request)
        })
        .await
    }

    pub async fn trending_git_repos(
        &self,
        request: PageRequest,
    ) -> DbResult<Arc<PageResult<GitRepo>>> {
        let key = CacheKey::new("trending_git_repos").page(request);
        self.cached(&self.repo_page_cache, key, move |pool| {
            GitRepo::list_trending(pool, request)
        })
        .await
    }

    pub async fn git_repos_by_language(
        &self,
        language: &str,
        limit: i64,
    ) -> DbResult<Arc<Vec<GitRepo>>> {
        let key = CacheKey::new("git_repos_by_language")
            .arg("language", language)
            .and_then(|k| k.arg("limit", limit));
        let language = language.to_string();
        self.cached(&self.repo_list_cache, key, move |pool| {
            GitRepo::list_by_language(pool, &language, limit)
        })
        .await
    }
}

fn category_key(
    function: &'static str,
    category: Option<Category>,
) -> Result<CacheKey, CacheError> {
    match category {
        Some(c) => CacheKey::new(function).arg("category", c.to_string()),
        None => Ok(CacheKey::new(function)),
    }
}

#[derive(Debug, Error)]
pub enum AppStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<CacheError> for AppStoreError {
    fn from(e: CacheError) -> Self {
        AppStoreError::CacheError(e.to_string())
    }
}

pub async fn create_app_state() -> Result<Arc<AppState>, AppStoreError> {
    let db = DbPool::establish(&CONFIG.db_url, CONFIG.db_pool_size, CONFIG.db_timeout())
        .map_err(|e| AppStoreError::DatabaseError(format!("{:?}", e)))?;
    let app_state = Arc::new(AppState::new(db, &CONFIG.cache, CONFIG.redis.as_ref()).await);
    app_state.clear_cache().await;
    Ok(app_state)
}

pub type StateRouter = Router<Arc<AppState>>;

pub fn create_state_router() -> StateRouter {
    Router::<Arc<AppState>>::new()
}
