//! Per-route TTLs for the read-through cache.

use std::collections::HashMap;
use std::time::Duration;

/// Maps route templates (as matched by the router) to a cache TTL.
///
/// Routes that are not listed are never cached. A zero TTL disables caching
/// for that route.
#[derive(Debug, Clone, Default)]
pub struct CachePolicy {
    routes: HashMap<String, Duration>,
}

impl CachePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches GET responses of `route` for `ttl`.
    pub fn route(mut self, route: impl Into<String>, ttl: Duration) -> Self {
        let route = route.into();
        if ttl.is_zero() {
            self.routes.remove(&route);
        } else {
            self.routes.insert(route, ttl);
        }
        self
    }

    /// TTL for a matched route template, if it is cached.
    pub fn ttl_for(&self, route: &str) -> Option<Duration> {
        self.routes.get(route).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
