//! Roster Server - student records over HTTP with a read-through cache.
//!
//! GET responses for `/api/students` and `/api/students/{id}` are served
//! from a Redis-backed cache (or the in-memory fallback when Redis is down
//! at startup). Creates, updates and deletes purge the affected entries.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use roster_cache::CacheHandle;
//! use roster_core::InMemoryStudentRepository;
//! use roster_server::{AppState, Settings, create_router_with_state, metrics};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let settings = Settings::load()?;
//! let cache = CacheHandle::establish(&settings.cache.remote()).await;
//! let state = AppState::new(
//!     Arc::new(InMemoryStudentRepository::new()),
//!     cache,
//!     &settings.cache,
//! )?;
//! let app = create_router_with_state(state, metrics::init_metrics()?);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{STUDENT_PATH, STUDENTS_PATH, create_router_with_state, run_server_with_state};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
