//! Test doubles for the repository and cache store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use roster_cache::{CacheError, CacheStore, KeyPattern};
use roster_core::{
    InMemoryStudentRepository, NewStudent, Result, Student, StudentFilter, StudentPatch,
    StudentRepository,
};

/// Repository that counts reads, to tell cache hits from misses.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryStudentRepository,
    reads: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find` and `find_by_id` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StudentRepository for CountingRepository {
    async fn create(&self, student: NewStudent) -> Result<Student> {
        self.inner.create(student).await
    }

    async fn find(&self, filter: &StudentFilter) -> Result<Vec<Student>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find(filter).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Student> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn update(&self, id: &str, patch: StudentPatch) -> Result<Student> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Cache store whose every operation fails.
#[derive(Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> std::result::Result<T, CacheError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::unavailable("connection reset"))
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> std::result::Result<Option<String>, CacheError> {
        self.fail()
    }

    async fn set(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Option<Duration>,
    ) -> std::result::Result<(), CacheError> {
        self.fail()
    }

    async fn delete(&self, _key: &str) -> std::result::Result<u64, CacheError> {
        self.fail()
    }

    async fn list_keys(
        &self,
        _pattern: &KeyPattern,
    ) -> std::result::Result<Vec<String>, CacheError> {
        self.fail()
    }

    fn name(&self) -> &str {
        "failing"
    }
}
