//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! ValidatedUrl (from security::url_validator)
//!     → prober.rs (timed GET with timeout)
//!     → observation.rs (status + latency record)
//!     → handed to the observation store
//! ```
//!
//! # Design Decisions
//! - Status 0 is the "no response" sentinel, never a real status
//! - Probes keep no history; observations are dropped once persisted

pub mod observation;
pub mod prober;

pub use observation::{Observation, RESPONSE_STATUS_RANGE, STATUS_UNREACHABLE};
pub use prober::Prober;
