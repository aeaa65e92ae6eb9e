//! In-process fallback store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::error::CacheError;
use crate::keys::KeyPattern;
use crate::store::CacheStore;

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, String>,
    /// Keys with a deferred removal already scheduled.
    expiring: HashSet<String>,
}

/// Cache store kept in a process-local map.
///
/// Used when the networked store cannot be reached at startup. Entries are
/// not shared with other instances.
///
/// A TTL is enforced by a deferred removal task. Only the first TTL'd write
/// of a key schedules one: overwriting the key before it fires, with or
/// without a new TTL, leaves the original removal in place, and it removes
/// whatever value is stored at that moment.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().values.is_empty()
    }

    fn schedule_removal(&self, key: String, ttl: Duration) {
        let entries: Weak<RwLock<Entries>> = Arc::downgrade(&self.entries);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(entries) = entries.upgrade() {
                let mut entries = entries.write();
                entries.values.remove(&key);
                entries.expiring.remove(&key);
                trace!(key = %key, "Expired entry removed");
            }
        });
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let schedule = {
            let mut entries = self.entries.write();
            entries.values.insert(key.to_string(), value.to_string());
            match ttl {
                Some(ttl) if entries.expiring.insert(key.to_string()) => Some(ttl),
                _ => None,
            }
        };

        if let Some(ttl) = schedule {
            self.schedule_removal(key.to_string(), ttl);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        let removed = self.entries.write().values.remove(key);
        Ok(u64::from(removed.is_some()))
    }

    async fn list_keys(&self, pattern: &KeyPattern) -> Result<Vec<String>, CacheError> {
        Ok(self
            .entries
            .read()
            .values
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
