//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (url, status_code, ...)
//!     → tick spans carrying a tick_id for correlation
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Logs are the only user-visible surface; there is no metrics endpoint
//! - One line per completed probe, per rejected target, per failed insert

pub mod logging;

pub use logging::init_logging;
