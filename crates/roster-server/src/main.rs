//! Roster Server binary.

use std::sync::Arc;

use anyhow::Context;
use roster_cache::CacheHandle;
use roster_core::{InMemoryStudentRepository, StudentRepository};
use roster_server::{AppState, Settings, metrics::init_metrics, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Roster Server v{}", env!("CARGO_PKG_VERSION"));

    let addr = settings.listen_addr()?;
    let prometheus_handle = init_metrics().context("failed to install metrics recorder")?;

    let cache = CacheHandle::establish(&settings.cache.remote()).await;
    tracing::info!(
        backend = cache.backend(),
        state = %cache.state(),
        namespace = %settings.cache.namespace,
        "Cache ready"
    );
    if cache.is_fallback() {
        tracing::warn!("Cache backend unreachable, entries are local to this process");
    }

    let repository: Arc<dyn StudentRepository> = Arc::new(InMemoryStudentRepository::new());
    tracing::info!(repository = repository.name(), "Student repository ready");

    let state = AppState::new(repository, cache, &settings.cache)?;

    run_server_with_state(addr, state, prometheus_handle, settings.server.cors).await?;

    Ok(())
}
