//! Cache invalidation after student mutations.

use futures::future::join_all;
use roster_cache::{CacheHandle, KeyPattern, Namespace};
use tracing::{debug, info, warn};

use crate::metrics::CacheMetrics;

/// A successful write to the student collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated { id: String },
    Deleted { id: String },
}

impl Mutation {
    /// Id of the affected student, for updates and deletes.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Created => None,
            Self::Updated { id } | Self::Deleted { id } => Some(id),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated { .. } => "updated",
            Self::Deleted { .. } => "deleted",
        }
    }
}

/// Outcome of an invalidation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Number of keys removed.
    pub count: usize,
    /// Patterns that were applied.
    pub patterns: Vec<String>,
}

/// Purges cached responses made stale by a mutation.
///
/// Every mutation purges `<namespace>:<collection>*`, which covers list
/// responses under any query string. Updates and deletes also purge
/// `<namespace>:<collection>/<id>*`. Cache errors are logged and counted,
/// they never fail the mutation.
#[derive(Debug, Clone)]
pub struct Invalidator {
    cache: CacheHandle,
    namespace: Namespace,
    collection_path: String,
    metrics: CacheMetrics,
}

impl Invalidator {
    pub fn new(
        cache: CacheHandle,
        namespace: Namespace,
        collection_path: impl Into<String>,
        metrics: CacheMetrics,
    ) -> Self {
        Self {
            cache,
            namespace,
            collection_path: collection_path.into(),
            metrics,
        }
    }

    /// Patterns purged for `mutation`, collection first.
    pub fn patterns(&self, mutation: &Mutation) -> Vec<KeyPattern> {
        let mut prefixes = vec![self.collection_path.clone()];
        if let Some(id) = mutation.id() {
            prefixes.push(format!("{}/{}", self.collection_path, id));
        }

        prefixes
            .iter()
            .filter_map(|prefix| match self.namespace.prefix_pattern(prefix) {
                Ok(pattern) => Some(pattern),
                Err(error) => {
                    warn!(prefix = %prefix, error = %error, "Skipping invalid invalidation pattern");
                    None
                },
            })
            .collect()
    }

    /// Applies every pattern for `mutation` and reports what was removed.
    pub async fn invalidate(&self, mutation: &Mutation) -> InvalidationResult {
        let patterns = self.patterns(mutation);

        let mut count = 0;
        for pattern in &patterns {
            count += self.invalidate_pattern(pattern).await;
        }

        self.metrics.record_invalidated(count);
        info!(
            mutation = mutation.kind(),
            id = mutation.id().unwrap_or("-"),
            count,
            "Cache invalidated"
        );

        InvalidationResult {
            count,
            patterns: patterns.iter().map(ToString::to_string).collect(),
        }
    }

    /// Deletes every key matching `pattern`, concurrently.
    pub async fn invalidate_pattern(&self, pattern: &KeyPattern) -> usize {
        let keys = match self.cache.list_keys(pattern).await {
            Ok(keys) => keys,
            Err(error) => {
                self.metrics.record_error("list_keys");
                warn!(pattern = %pattern, error = %error, "Failed to list keys for invalidation");
                return 0;
            },
        };

        if keys.is_empty() {
            debug!(pattern = %pattern, "No cached entries to invalidate");
            return 0;
        }

        let results = join_all(keys.iter().map(|key| self.cache.delete(key))).await;

        results
            .into_iter()
            .zip(&keys)
            .map(|(result, key)| match result {
                Ok(removed) => removed as usize,
                Err(error) => {
                    self.metrics.record_error("delete");
                    warn!(key = %key, error = %error, "Failed to delete cached entry");
                    0
                },
            })
            .sum()
    }
}
