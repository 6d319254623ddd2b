//! Tour analytics server - Binary Entry Point

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use tour_analytics::analytics::{RecomputeJob, StatsCache, StatsService};
use tour_analytics::api::{self, AppState};
use tour_analytics::catalog::TourCatalog;
use tour_analytics::config::Cli;
use tour_analytics::event_store::{
    EventStore, FileEventStore, FileEventStoreConfig, MemoryEventStore,
};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_env_filter(filter)
        .init();
}

async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown requested");
    token.cancel();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.analytics_config()?;

    let (catalog, store): (Arc<TourCatalog>, Arc<dyn EventStore>) = match &cli.data_dir {
        Some(dir) => {
            let catalog = Arc::new(TourCatalog::open(dir.join("tours.jsonl"))?);
            let store: Arc<dyn EventStore> = Arc::new(FileEventStore::open(
                FileEventStoreConfig::new(dir),
                catalog.clone(),
            )?);
            (catalog, store)
        }
        None => {
            tracing::warn!(
                "No data directory configured; tours and events are kept in memory only"
            );
            let catalog = Arc::new(TourCatalog::in_memory());
            let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new(catalog.clone()));
            (catalog, store)
        }
    };

    let stats = Arc::new(StatsService::new(catalog, store, config));
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let cache = Arc::new(StatsCache::new());
    if let Some(interval) = cli.recompute_interval() {
        let job = RecomputeJob::new(stats.clone(), cache.clone());
        tracing::info!(interval_secs = interval.as_secs(), "Starting stats recompute job");
        tokio::spawn(job.run_every(interval, shutdown.clone()));
    }

    let state = AppState::new(stats).with_cache(cache);
    api::serve(Arc::new(state), cli.socket_addr(), shutdown).await?;
    Ok(())
}
