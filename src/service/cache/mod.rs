use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use self::types::CacheEntry;

pub mod memory;
pub mod metrics;
pub mod redis;
pub mod repository;
pub mod types;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::SerializationError(e.to_string())
    }
}

/// Key/value store holding result entries with an optional TTL.
#[async_trait]
pub trait CacheBackend<T>: Send + Sync + Clone + 'static
where
    T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static,
{
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry<T>>>, Self::Error>;
    async fn set(
        &self,
        key: &str,
        value: Arc<CacheEntry<T>>,
        ttl: Option<Duration>,
    ) -> Result<(), Self::Error>;
    /// Drops every entry owned by this backend.
    async fn clear(&self) -> Result<(), Self::Error>;
}
