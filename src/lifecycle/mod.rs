//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Connect store → Ensure schema → Validate targets → Run scheduler
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop ticking → Abort in-flight probes → Close pool
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: connection and schema errors at startup are fatal
//! - Steady-state errors never reach this layer; they are logged per target

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, run_with_store, StartupError};
