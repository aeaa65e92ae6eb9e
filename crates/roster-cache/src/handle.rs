//! Process-wide cache handle and backend selection.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::CacheError;
use crate::keys::KeyPattern;
use crate::memory::MemoryStore;
use crate::remote::{RedisStore, RemoteConfig};
use crate::store::CacheStore;

/// Which backend the process ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The networked store answered at startup.
    Connected,
    /// The networked store was unreachable; the in-memory store is active.
    Fallback,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to the active cache store.
///
/// Created once at startup and cloned into every component that needs the
/// cache. The state never changes after creation: there is no reconnection
/// from fallback to the networked store.
#[derive(Clone)]
pub struct CacheHandle {
    store: Arc<dyn CacheStore>,
    state: ConnectionState,
}

impl CacheHandle {
    /// Wraps an arbitrary store.
    pub fn new(store: Arc<dyn CacheStore>, state: ConnectionState) -> Self {
        Self { store, state }
    }

    /// Handle over the in-memory store, in fallback state.
    pub fn fallback() -> Self {
        Self::new(Arc::new(MemoryStore::new()), ConnectionState::Fallback)
    }

    /// Connects to the networked store, or falls back to the in-memory one.
    ///
    /// This is the only place the connection state is decided. A failure is
    /// logged once and never surfaces to the caller.
    pub async fn establish(config: &RemoteConfig) -> Self {
        match RedisStore::connect(config).await {
            Ok(store) => {
                info!(backend = store.name(), "Cache backend selected");
                Self::new(Arc::new(store), ConnectionState::Connected)
            },
            Err(error) => {
                warn!(
                    error = %error,
                    "Cache backend unreachable, using in-memory fallback store"
                );
                Self::fallback()
            },
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_fallback(&self) -> bool {
        self.state == ConnectionState::Fallback
    }

    /// Name of the active backend.
    pub fn backend(&self) -> &str {
        self.store.name()
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.store.get(key).await
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.store.set(key, value, ttl).await
    }

    pub async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        self.store.delete(key).await
    }

    pub async fn list_keys(&self, pattern: &KeyPattern) -> Result<Vec<String>, CacheError> {
        self.store.list_keys(pattern).await
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("backend", &self.backend())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_establish_falls_back_on_invalid_url() {
        let handle = CacheHandle::establish(&RemoteConfig::new("not a url")).await;

        assert_eq!(handle.state(), ConnectionState::Fallback);
        assert_eq!(handle.backend(), "memory");
        assert!(handle.is_fallback());
    }

    #[tokio::test]
    async fn test_fallback_handle_round_trip() {
        let handle = CacheHandle::fallback();

        handle.set("students:/x", "{}", None).await.unwrap();

        assert_eq!(handle.get("students:/x").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(handle.delete("students:/x").await.unwrap(), 1);
    }

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
        assert_eq!(ConnectionState::Fallback.to_string(), "fallback");
    }
}
