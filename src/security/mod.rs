//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Configured target string:
//!     → url_validator.rs (parse, scheme check, allow-list)
//!     → ValidatedUrl handed to the prober
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in configured input; every fetch goes through the validator

pub mod url_validator;

pub use url_validator::{UrlValidationError, UrlValidator, ValidatedUrl};
