//! Uptime monitoring library.
//!
//! Probes a fixed set of HTTP(S) targets on a fixed interval and appends one
//! observation per probe to an observation store.

pub mod config;
pub mod security;
pub mod health;
pub mod storage;
pub mod scheduler;
pub mod lifecycle;
pub mod observability;

pub use config::MonitorConfig;
pub use health::{Observation, Prober};
pub use scheduler::Scheduler;
pub use security::{UrlValidator, ValidatedUrl};
pub use storage::ObservationStore;
pub use lifecycle::Shutdown;
