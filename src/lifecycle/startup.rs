//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the observation store and provision its schema
//! - Build the validator, prober and scheduler from config
//! - Run until shutdown, then release the pool

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::MonitorConfig;
use crate::health::Prober;
use crate::lifecycle::signals::spawn_signal_listener;
use crate::lifecycle::Shutdown;
use crate::scheduler::Scheduler;
use crate::security::UrlValidator;
use crate::storage::{ObservationStore, PgObservationStore, StoreError};

/// Errors that stop the process before monitoring begins.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] StoreError),
    #[error("failed to create table: {0}")]
    Schema(#[source] StoreError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connect to PostgreSQL and monitor until SIGINT/SIGTERM.
pub async fn run(config: MonitorConfig) -> Result<(), StartupError> {
    let store = PgObservationStore::connect(&config.database)
        .await
        .map_err(StartupError::Connect)?;

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    let listener = spawn_signal_listener(shutdown);

    let result = run_with_store(&config, Arc::new(store.clone()), shutdown_rx).await;

    listener.abort();
    store.close().await;
    result
}

/// Provision `store`, then schedule probes until `shutdown` fires.
pub async fn run_with_store(
    config: &MonitorConfig,
    store: Arc<dyn ObservationStore>,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    store.ensure_schema().await.map_err(StartupError::Schema)?;

    let validator = Arc::new(UrlValidator::from_config(config.security.allow_list.as_deref()));
    if validator.is_restricted() {
        tracing::info!("Allow-list mode enabled");
    }

    let prober = Arc::new(Prober::new(&config.monitor, validator.clone())?);
    let scheduler = Scheduler::new(&config.monitor.targets, &validator, prober, store, &config.monitor);

    scheduler.run(shutdown).await;
    tracing::info!("Monitor stopped");
    Ok(())
}
