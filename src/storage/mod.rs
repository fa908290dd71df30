//! Observation storage subsystem.
//!
//! # Data Flow
//! ```text
//! Probe task completes
//!     → ObservationStore::persist (stamp checked_at, append one row)
//!     → postgres.rs (uptime_logs table) or memory.rs (tests, dry runs)
//! ```
//!
//! # Design Decisions
//! - Append-only: the monitor never updates or deletes rows
//! - No retries or buffering on insert failure; the caller logs and drops
//! - Implementations must tolerate concurrent `persist` calls

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::health::Observation;

pub use memory::MemoryStore;
pub use postgres::PgObservationStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Rejected malformed observation for {0:?}")]
    InvalidObservation(String),
}

/// Durable append-only sink for observations.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Provision whatever structure observations need. Idempotent.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Append one observation, stamping `checked_at` if unset.
    async fn persist(&self, observation: Observation) -> Result<(), StoreError>;
}

fn check_well_formed(observation: &Observation) -> Result<(), StoreError> {
    if observation.is_well_formed() {
        Ok(())
    } else {
        Err(StoreError::InvalidObservation(observation.url.clone()))
    }
}
