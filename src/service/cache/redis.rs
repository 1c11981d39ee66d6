use async_trait::async_trait;
use bb8_redis::bb8;
use bb8_redis::redis::{self, AsyncCommands, RedisError, cmd};
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use cyder_tools::log::info;

use super::{CacheBackend, metrics::CacheMetrics, types::CacheEntry};
use crate::service::redis::RedisPool;

const SCAN_BATCH: usize = 100;

#[derive(Debug, Error)]
pub enum RedisCacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Pool error: {0}")]
    Pool(#[from] bb8::RunError<RedisError>),
}

/// Stores entries as JSON strings under `key_prefix`.
#[derive(Clone)]
pub struct RedisCacheBackend<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static + Clone,
{
    pool: RedisPool,
    metrics: Arc<CacheMetrics>,
    key_prefix: String,
    _phantom: PhantomData<T>,
}

impl<T> RedisCacheBackend<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static + Clone,
{
    pub fn new(pool: RedisPool, key_prefix: String, metrics: Arc<CacheMetrics>) -> Self {
        Self {
            pool,
            metrics,
            key_prefix,
            _phantom: PhantomData,
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl<T> CacheBackend<T> for RedisCacheBackend<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static + Clone,
{
    type Error = RedisCacheError;

    async fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry<T>>>, Self::Error> {
        let mut conn = self.pool.get().await?;
        let payload: Option<String> = conn.get(self.full_key(key)).await?;

        match payload {
            Some(text) => {
                let entry: CacheEntry<T> = serde_json::from_str(&text)?;
                self.metrics.record_hit();
                Ok(Some(Arc::new(entry)))
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
        let payload = serde_json::to_string(&*value)?;
        let mut conn = self.pool.get().await?;
        let full_key = self.full_key(key);

        match ttl {
            // SETEX rejects a zero expiry
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(full_key, payload, ttl.as_secs().max(1))
                    .await?
            }
            None => conn.set::<_, _, ()>(full_key, payload).await?,
        }
        self.metrics.record_set();
        Ok(())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        let mut conn = self.pool.get().await?;
        let pattern = format!("{}*", self.key_prefix);

        let mut stale: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await?;
            stale.extend(keys);
            if next_cursor == 0 {
                break;
            }
            cursor = next_cursor;
        }

        for chunk in stale.chunks(SCAN_BATCH) {
            let mut pipe = redis::pipe();
            for key in chunk {
                pipe.del(key);
            }
            pipe.query_async::<()>(&mut *conn).await?;
        }
        if !stale.is_empty() {
            info!(
                "Cleared {} keys from Redis cache with prefix '{}'",
                stale.len(),
                self.key_prefix
            );
        }
        Ok(())
    }
}
