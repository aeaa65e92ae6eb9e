//! Application state.

use std::sync::Arc;

use roster_cache::{CacheError, CacheHandle};
use roster_core::StudentRepository;
use tracing::warn;

use crate::cache::{CachePolicy, Invalidator, ReadThroughLayer};
use crate::metrics::CacheMetrics;
use crate::server::{STUDENT_PATH, STUDENTS_PATH};
use crate::settings::CacheSettings;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn StudentRepository>,
    cache: CacheHandle,
    invalidator: Invalidator,
    read_through: ReadThroughLayer,
    metrics: CacheMetrics,
}

impl AppState {
    /// Wires the cache components for the student routes.
    ///
    /// # Errors
    ///
    /// Fails with `CacheError::InvalidNamespace` when the configured namespace
    /// cannot prefix keys and patterns.
    pub fn new(
        repository: Arc<dyn StudentRepository>,
        cache: CacheHandle,
        settings: &CacheSettings,
    ) -> Result<Self, CacheError> {
        let namespace = settings.namespace()?;
        let metrics = CacheMetrics::new();

        let policy = CachePolicy::new()
            .route(STUDENTS_PATH, settings.list_ttl())
            .route(STUDENT_PATH, settings.item_ttl());
        if policy.is_empty() {
            warn!("All cache TTLs are zero, GET responses will not be cached");
        }

        let read_through =
            ReadThroughLayer::new(cache.clone(), namespace.clone(), policy, metrics.clone());
        let invalidator =
            Invalidator::new(cache.clone(), namespace, STUDENTS_PATH, metrics.clone());

        Ok(Self {
            repository,
            cache,
            invalidator,
            read_through,
            metrics,
        })
    }

    pub fn repository(&self) -> &dyn StudentRepository {
        self.repository.as_ref()
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    pub fn invalidator(&self) -> &Invalidator {
        &self.invalidator
    }

    /// Layer to install on the cacheable routes.
    pub fn read_through_layer(&self) -> ReadThroughLayer {
        self.read_through.clone()
    }

    pub fn cache_metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}
