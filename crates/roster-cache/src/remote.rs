//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{debug, info};

use crate::error::CacheError;
use crate::keys::KeyPattern;
use crate::store::CacheStore;

/// Connection settings for the networked store.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Redis URL (default: `redis://127.0.0.1:6379`)
    pub url: String,
    /// Upper bound for establishing the connection at startup (default: 5s)
    pub connect_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Cache store speaking the Redis protocol (`GET`, `SET EX`, `DEL`, `KEYS`).
///
/// The connection manager is cheap to clone and reconnects on its own after
/// the initial connection; commands that fail in the meantime return errors.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Opens a connection and verifies it with `PING`.
    ///
    /// # Errors
    ///
    /// - `CacheError::Backend` if the URL is invalid or the server refuses
    /// - `CacheError::Timeout` if no connection is made within `connect_timeout`
    pub async fn connect(config: &RemoteConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.url.as_str())?;

        let timeout = config.connect_timeout;
        let mut conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout { timeout })??;

        redis::cmd("PING").query_async::<String>(&mut conn).await?;

        info!(url = %redact(&config.url), "Connected to cache backend");
        Ok(Self { conn })
    }
}

/// Strips credentials from a Redis URL before it is logged.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &url[..scheme], &url[at..])
        },
        _ => url.to_string(),
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => {
                // EX takes whole seconds and rejects 0.
                let seconds = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds).await?;
            },
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.del::<_, u64>(key).await?)
    }

    async fn list_keys(&self, pattern: &KeyPattern) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn.clone();
        let keys = conn.keys::<_, Vec<String>>(pattern.as_str()).await?;
        debug!(pattern = %pattern, count = keys.len(), "Listed cache keys");
        Ok(keys)
    }

    fn name(&self) -> &str {
        "redis"
    }
}
