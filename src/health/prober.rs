//! HTTP probing.
//!
//! # Responsibilities
//! - Issue one bounded GET against a validated target
//! - Time the request whatever its outcome
//! - Turn transport failures into the unreachable sentinel
//!
//! # Design Decisions
//! - Never returns an error: a failed probe is a monitoring result
//! - No retries; the next tick is the retry
//! - Redirects are followed only to targets the validator would accept

use std::sync::Arc;
use std::time::Duration;
use reqwest::{redirect, Client};
use tokio::time::{self, Instant};

use crate::config::ProbeConfig;
use crate::health::observation::Observation;
use crate::security::{UrlValidator, ValidatedUrl};

const MAX_REDIRECTS: usize = 10;

pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    /// Build a prober with its own connection pool.
    pub fn new(config: &ProbeConfig, validator: Arc<UrlValidator>) -> Result<Self, reqwest::Error> {
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if validator.validate(attempt.url().as_str()).is_ok() {
                attempt.follow()
            } else {
                // Record the 3xx itself rather than leave the validated set
                attempt.stop()
            }
        });

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(policy)
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe with the configured timeout.
    pub async fn probe(&self, target: &ValidatedUrl) -> Observation {
        self.probe_with_timeout(target, self.timeout).await
    }

    pub async fn probe_with_timeout(&self, target: &ValidatedUrl, timeout: Duration) -> Observation {
        let start = Instant::now();
        let response_future = self.client.get(target.url().clone()).send();

        let status_code = match time::timeout(timeout, response_future).await {
            Ok(Ok(response)) => {
                let status = response.status().as_u16();
                // Body is never read; dropping releases the connection
                drop(response);
                Some(status)
            }
            Ok(Err(e)) => {
                tracing::debug!(url = %target, error = %e, "Probe failed: transport error");
                None
            }
            Err(_) => {
                tracing::debug!(url = %target, timeout_ms = timeout.as_millis() as u64, "Probe failed: timeout");
                None
            }
        };

        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let observation = match status_code {
            Some(status) => Observation::new(target.as_str(), status, elapsed),
            None => Observation::unreachable(target.as_str(), elapsed),
        };
        if observation.has_nonstandard_status() {
            tracing::warn!(url = %target, status_code = observation.status_code, "Non-standard status code");
        }
        observation
    }
}
