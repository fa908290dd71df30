//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval, timeout and concurrency > 0)
//! - Require enough database settings to build a connection
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Target URLs are NOT checked here; the URL validator owns that and
//!   rejects bad targets individually at scheduler construction

use thiserror::Error;

use crate::config::schema::MonitorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("monitor.targets must contain at least one URL")]
    NoTargets,
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("security.allow_list is set but contains no hosts")]
    EmptyAllowList,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.monitor.targets.is_empty() {
        errors.push(ValidationError::NoTargets);
    }
    if config.monitor.interval_secs == 0 {
        errors.push(ValidationError::ZeroValue("monitor.interval_secs"));
    }
    if config.monitor.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("monitor.timeout_secs"));
    }
    if config.monitor.max_in_flight == 0 {
        errors.push(ValidationError::ZeroValue("monitor.max_in_flight"));
    }
    if matches!(&config.security.allow_list, Some(hosts) if hosts.is_empty()) {
        errors.push(ValidationError::EmptyAllowList);
    }

    let db = &config.database;
    if db.host.trim().is_empty() {
        errors.push(ValidationError::Empty("database.host"));
    }
    if db.name.trim().is_empty() {
        errors.push(ValidationError::Empty("database.name"));
    }
    if db.port == 0 {
        errors.push(ValidationError::ZeroValue("database.port"));
    }
    if db.max_connections == 0 {
        errors.push(ValidationError::ZeroValue("database.max_connections"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
