//! Probe results.

use std::ops::RangeInclusive;
use chrono::{DateTime, Utc};

/// Status recorded when no HTTP response was obtained.
pub const STATUS_UNREACHABLE: u16 = 0;

/// Every status an HTTP response can carry on the wire.
///
/// Wider than the registered 100..=599 range: some servers answer with
/// codes like 999, and those responses are still recorded as-is.
pub const RESPONSE_STATUS_RANGE: RangeInclusive<u16> = 100..=999;

/// One recorded outcome of probing a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// The exact validated string that was probed.
    pub url: String,
    /// HTTP status, or [`STATUS_UNREACHABLE`].
    pub status_code: u16,
    /// Wall-clock time from request start to response or failure.
    pub response_time_ms: u64,
    /// Assigned by the store when left unset.
    pub checked_at: Option<DateTime<Utc>>,
}

impl Observation {
    pub fn new(url: impl Into<String>, status_code: u16, response_time_ms: u64) -> Self {
        Self {
            url: url.into(),
            status_code,
            response_time_ms,
            checked_at: None,
        }
    }

    /// Observation for a request that failed before any response.
    pub fn unreachable(url: impl Into<String>, response_time_ms: u64) -> Self {
        Self::new(url, STATUS_UNREACHABLE, response_time_ms)
    }

    pub fn is_reachable(&self) -> bool {
        self.status_code != STATUS_UNREACHABLE
    }

    /// Reachable, but outside the registered 100..=599 range.
    pub fn has_nonstandard_status(&self) -> bool {
        self.is_reachable() && !(100..=599).contains(&self.status_code)
    }

    /// Check the record invariants: non-empty url, real status or sentinel.
    pub fn is_well_formed(&self) -> bool {
        !self.url.is_empty()
            && (self.status_code == STATUS_UNREACHABLE || RESPONSE_STATUS_RANGE.contains(&self.status_code))
    }

    /// Return the observation stamped with `now` unless already stamped.
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        self.checked_at.get_or_insert(now);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        let obs = Observation::unreachable("https://down.test", 12);
        assert_eq!(obs.status_code, 0);
        assert!(!obs.is_reachable());
        assert!(obs.is_well_formed());
    }

    #[test]
    fn test_well_formed() {
        assert!(Observation::new("https://a.test", 204, 3).is_well_formed());
        assert!(!Observation::new("", 200, 3).is_well_formed());
        assert!(!Observation::new("https://a.test", 42, 3).is_well_formed());
        assert!(!Observation::new("https://a.test", 1000, 3).is_well_formed());
    }

    #[test]
    fn test_nonstandard_status_is_kept() {
        let obs = Observation::new("https://a.test", 999, 3);
        assert!(obs.is_well_formed());
        assert!(obs.has_nonstandard_status());
        assert!(!Observation::new("https://a.test", 503, 3).has_nonstandard_status());
        assert!(!Observation::unreachable("https://a.test", 3).has_nonstandard_status());
    }

    #[test]
    fn test_stamped_keeps_existing_timestamp() {
        let earlier = Utc::now() - chrono::Duration::seconds(60);
        let obs = Observation::new("https://a.test", 200, 1).stamped(earlier);
        assert_eq!(obs.checked_at, Some(earlier));

        let restamped = obs.stamped(Utc::now());
        assert_eq!(restamped.checked_at, Some(earlier));
    }
}
