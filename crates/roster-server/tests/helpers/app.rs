//! Builds a fully wired router for integration tests.

use std::sync::Arc;

use roster_cache::CacheHandle;
use roster_core::NewStudent;
use roster_server::{AppState, create_router_with_state, metrics::detached_handle, settings::CacheSettings};

use super::client::TestClient;
use super::doubles::CountingRepository;

pub struct TestApp {
    pub client: TestClient,
    pub state: AppState,
    pub repository: Arc<CountingRepository>,
    pub cache: CacheHandle,
}

/// App backed by the in-memory cache with default settings.
pub fn spawn_app() -> TestApp {
    spawn_app_with_cache(CacheHandle::fallback())
}

pub fn spawn_app_with_cache(cache: CacheHandle) -> TestApp {
    spawn_app_with(cache, &CacheSettings::default())
}

pub fn spawn_app_with(cache: CacheHandle, settings: &CacheSettings) -> TestApp {
    let repository = Arc::new(CountingRepository::new());
    let state = AppState::new(repository.clone(), cache.clone(), settings)
        .expect("test cache settings should be valid");
    let client = TestClient::new(create_router_with_state(state.clone(), detached_handle()));

    TestApp {
        client,
        state,
        repository,
        cache,
    }
}

/// Valid create payload; the email is derived from the name.
pub fn new_student(name: &str, grade: &str, age: u32) -> NewStudent {
    NewStudent::new(
        name,
        format!("{}@school.test", name.to_lowercase()),
        grade,
        age,
    )
}
