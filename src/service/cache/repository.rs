use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use super::{CacheBackend, CacheError, types::CacheEntry};

/// Typed view over a backend. Keys are built by the caller.
pub struct CacheRepository<T, B>
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
    B: CacheBackend<T>,
{
    backend: B,
    default_ttl: Option<Duration>,
    _phantom: PhantomData<T>,
}

impl<T, B> CacheRepository<T, B>
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
    B: CacheBackend<T>,
{
    pub fn new(backend: B, default_ttl: Option<Duration>) -> Self {
        Self {
            backend,
            default_ttl,
            _phantom: PhantomData,
        }
    }

    pub async fn get_entry(
        &self,
        cache_key: &str,
    ) -> Result<Option<Arc<CacheEntry<T>>>, CacheError> {
        self.backend
            .get(cache_key)
            .await
            .map_err(|e| CacheError::BackendError(e.to_string()))
    }

    pub async fn set_positive(&self, cache_key: &str, value: Arc<T>) -> Result<(), CacheError> {
        let entry = Arc::new(CacheEntry::Positive(value));
        self.backend
            .set(cache_key, entry, self.default_ttl)
            .await
            .map_err(|e| CacheError::BackendError(e.to_string()))
    }

    pub async fn set_negative(&self, cache_key: &str, ttl: Duration) -> Result<(), CacheError> {
        self.backend
            .set(cache_key, Arc::new(CacheEntry::Negative), Some(ttl))
            .await
            .map_err(|e| CacheError::BackendError(e.to_string()))
    }

    pub async fn clear(&self) -> Result<(), CacheError> {
        self.backend
            .clear()
            .await
            .map_err(|e| CacheError::BackendError(e.to_string()))
    }
}

impl<T, B> Clone for CacheRepository<T, B>
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
    B: CacheBackend<T>,
{
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            default_ttl: self.default_ttl,
            _phantom: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::cache::memory::MemoryCacheBackend;
    use crate::service::cache::metrics::CacheMetrics;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Board {
        benchmark: String,
        ids: Vec<i64>,
    }

    fn repo() -> CacheRepository<Board, MemoryCacheBackend<Board>> {
        CacheRepository::new(MemoryCacheBackend::new(Arc::new(CacheMetrics::new())), None)
    }

    #[tokio::test]
    async fn test_positive_round_trip() {
        let repo = repo();
        let board = Arc::new(Board {
            benchmark: "MMLU_PRO".to_string(),
            ids: vec![3, 1],
        });
        repo.set_positive("leaderboard:MMLU_PRO", board.clone()).await.unwrap();

        let entry = repo.get_entry("leaderboard:MMLU_PRO").await.unwrap().unwrap();
        match &*entry {
            CacheEntry::Positive(value) => assert_eq!(value, &board),
            CacheEntry::Negative => panic!("expected a positive entry"),
        }
    }

    #[tokio::test]
    async fn test_negative_entry_expires() {
        let repo = repo();
        repo.set_negative("model_detail:x", Duration::from_millis(30)).await.unwrap();
        let entry = repo.get_entry("model_detail:x").await.unwrap();
        assert!(matches!(entry.as_deref(), Some(CacheEntry::Negative)));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(repo.get_entry("model_detail:x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let repo = repo();
        repo.set_negative("a", Duration::from_secs(60)).await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.get_entry("a").await.unwrap().is_none());
    }
}
