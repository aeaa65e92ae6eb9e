//! Cache store trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;
use crate::keys::KeyPattern;

/// Key/value operations shared by every cache backend.
///
/// Values are strings (serialized response payloads). A missing key is
/// `Ok(None)`, never an error; errors mean the backend itself failed.
///
/// # Implementors
///
/// - `RedisStore` - networked store, shared across instances
/// - `MemoryStore` - in-process fallback when the network store is unreachable
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores a value. With a TTL the entry stops being readable once the
    /// TTL has elapsed since this write.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Removes a key and returns how many entries were removed (0 or 1).
    async fn delete(&self, key: &str) -> Result<u64, CacheError>;

    /// Returns every key the pattern matches in full.
    async fn list_keys(&self, pattern: &KeyPattern) -> Result<Vec<String>, CacheError>;

    /// Returns the name of this backend, for logging and health reporting.
    fn name(&self) -> &str;
}
