//! Record store abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// A record kept in a [`RecordStore`], addressed by a unique key.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Patch: Send + Sync;

    fn key(&self) -> &str;

    fn apply(&mut self, patch: &Self::Patch);
}

/// Keyed persistence for one entity type. Records come back in insertion order.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>>;

    /// Fails if a record with the same key exists.
    async fn create(&self, record: T) -> Result<T>;

    /// Applies `patch` to the record stored under `key` and returns the result.
    /// A patch may change the key itself.
    async fn update(&self, key: &str, patch: &T::Patch) -> Result<T>;

    async fn delete(&self, key: &str) -> Result<()>;
}
