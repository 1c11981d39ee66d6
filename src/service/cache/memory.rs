use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use thiserror::Error;

use cyder_tools::log::debug;

use super::{CacheBackend, metrics::CacheMetrics, types::CacheEntry};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
#[error("Memory cache error: {0}")]
pub struct MemoryCacheError(String);

struct Slot<T: Clone + Serialize + DeserializeOwned> {
    entry: Arc<CacheEntry<T>>,
    expires_at: Option<Instant>,
}

impl<T: Clone + Serialize + DeserializeOwned> Slot<T> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

type Slots<T> = DashMap<String, Slot<T>>;

#[derive(Clone)]
pub struct MemoryCacheBackend<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
{
    data: Arc<Slots<T>>,
    metrics: Arc<CacheMetrics>,
}

impl<T> MemoryCacheBackend<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
{
    /// Must be called inside a tokio runtime: it spawns the expiry sweeper.
    pub fn new(metrics: Arc<CacheMetrics>) -> Self {
        let data = Arc::new(DashMap::new());
        Self::spawn_cleanup_task(Arc::downgrade(&data));
        Self { data, metrics }
    }

    fn spawn_cleanup_task(data: Weak<Slots<T>>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                // the backend is gone once every clone is dropped
                let Some(data) = data.upgrade() else {
                    break;
                };
                let now = Instant::now();
                let before = data.len();
                data.retain(|_, slot| !slot.is_expired(now));
                let removed = before.saturating_sub(data.len());
                if removed > 0 {
                    debug!("Cleaned up {} expired cache entries", removed);
                }
            }
        });
    }
}

#[async_trait]
impl<T> CacheBackend<T> for MemoryCacheBackend<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
{
    type Error = MemoryCacheError;

    async fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry<T>>>, Self::Error> {
        let now = Instant::now();
        let found = self.data.get(key).map(|slot| {
            if slot.is_expired(now) {
                None
            } else {
                Some(slot.entry.clone())
            }
        });

        match found {
            Some(Some(entry)) => {
                self.metrics.record_hit();
                Ok(Some(entry))
            }
            Some(None) => {
                self.data.remove_if(key, |_, slot| slot.is_expired(now));
                self.metrics.record_miss();
                Ok(None)
            }
            None => {
                self.metrics.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(
        &self,
        key: &str,
        value: Arc<CacheEntry<T>>,
        ttl: Option<Duration>,
    ) -> Result<(), Self::Error> {
        let slot = Slot {
            entry: value,
            expires_at: ttl.map(|d| Instant::now() + d),
        };
        self.data.insert(key.to_string(), slot);
        self.metrics.record_set();
        Ok(())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.data.clear();
        debug!("In-memory cache cleared.");
        Ok(())
    }
}
