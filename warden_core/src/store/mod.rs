mod redis_store;

#[cfg(any(test, feature = "testing"))]
mod memory;

use async_trait::async_trait;

use crate::error::StoreError;

pub use self::redis_store::RedisStore;

#[cfg(any(test, feature = "testing"))]
pub use self::memory::MemoryStore;

/// String key-value store. Multi-key writes and deletes are all-or-nothing.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_all(&self, entries: &[(String, String)]) -> Result<(), StoreError>;

    async fn delete_all(&self, keys: &[String]) -> Result<(), StoreError>;
}
