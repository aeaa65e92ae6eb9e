//! # Roster Cache
//!
//! Cache stores for the Roster read-through layer.
//!
//! The [`CacheStore`] trait is the contract (`get`, `set` with TTL, `delete`,
//! `list_keys` by pattern). Two backends implement it:
//!
//! - [`RedisStore`] - networked, shared between instances
//! - [`MemoryStore`] - in-process fallback used when Redis is unreachable at startup
//!
//! [`CacheHandle::establish`] picks one of them once, at startup.
//!
//! ## Example
//!
//! ```no_run
//! use roster_cache::{CacheHandle, Namespace, RemoteConfig};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), roster_cache::CacheError> {
//! let cache = CacheHandle::establish(&RemoteConfig::new("redis://127.0.0.1:6379")).await;
//! let ns = Namespace::new("students")?;
//!
//! let key = ns.key("/api/students?grade=5");
//! cache.set(key.as_str(), "[]", Some(Duration::from_secs(60))).await?;
//!
//! let pattern = ns.prefix_pattern("/api/students")?;
//! for key in cache.list_keys(&pattern).await? {
//!     cache.delete(&key).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handle;
pub mod keys;
pub mod memory;
pub mod remote;
pub mod store;

// Re-exports
pub use error::CacheError;
pub use handle::{CacheHandle, ConnectionState};
pub use keys::{CacheKey, KeyPattern, Namespace};
pub use memory::MemoryStore;
pub use remote::{RedisStore, RemoteConfig};
pub use store::CacheStore;
