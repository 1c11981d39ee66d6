use serde::{Deserialize, Serialize, de};
use serde_with::serde_as;
use std::sync::Arc;

/// A cached query result, or a marker that the query found nothing.
#[serde_as]
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum CacheEntry<T: Clone + Serialize + de::DeserializeOwned> {
    Positive(#[serde_as(as = "Arc<serde_with::Same>")] Arc<T>),
    Negative,
}
