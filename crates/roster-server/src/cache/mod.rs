//! HTTP response caching.
//!
//! - [`ReadThroughLayer`]: serves cached GET responses and writes back misses
//! - [`Invalidator`]: purges stale entries after mutations
//! - [`CachePolicy`]: per-route TTLs

mod invalidation;
mod policy;
mod read_through;

pub use invalidation::{InvalidationResult, Invalidator, Mutation};
pub use policy::CachePolicy;
pub use read_through::{ReadThroughLayer, ReadThroughMiddleware};
