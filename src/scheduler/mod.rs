//! Probe scheduling.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     configured targets → UrlValidator → accepted / rejected (logged once)
//!
//! Every tick (fixed period, measured from tick start):
//!     for each accepted target
//!         → previous probe still running? skip this tick
//!         → no free permit? skip this tick
//!         → spawn task: probe → log → persist
//! ```
//!
//! # State
//! A single WAITING state. Each tick dispatches instantly and returns to
//! waiting; it never waits for the probes it spawned.
//!
//! # Design Decisions
//! - Rejected targets are skipped for the whole process lifetime
//! - At most one probe per target and `max_in_flight` probes overall; both
//!   are checked without waiting, so nothing queues behind a slow tick
//! - Every task lives in a JoinSet: reaped each tick, aborted on shutdown
//! - Per-target failures stay inside their task

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ProbeConfig;
use crate::health::Prober;
use crate::security::{UrlValidationError, UrlValidator, ValidatedUrl};
use crate::storage::ObservationStore;

/// An accepted target and whether a probe for it is running.
struct Target {
    url: Arc<ValidatedUrl>,
    busy: Arc<AtomicBool>,
}

/// Clears a target's busy flag when its task finishes or is aborted.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Scheduler {
    targets: Vec<Target>,
    rejected: Vec<UrlValidationError>,
    prober: Arc<Prober>,
    store: Arc<dyn ObservationStore>,
    interval: Duration,
    max_in_flight: usize,
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
}

impl Scheduler {
    /// Validate every target once and prepare the dispatch set.
    ///
    /// Duplicate target strings are probed once per tick.
    pub fn new(
        targets: &[String],
        validator: &UrlValidator,
        prober: Arc<Prober>,
        store: Arc<dyn ObservationStore>,
        config: &ProbeConfig,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for raw in targets {
            if !seen.insert(raw.as_str()) {
                tracing::warn!(url = %raw, "Duplicate target ignored");
                continue;
            }
            match validator.validate(raw) {
                Ok(target) => accepted.push(Target {
                    url: Arc::new(target),
                    busy: Arc::new(AtomicBool::new(false)),
                }),
                Err(e) => {
                    tracing::warn!(url = %raw, error = %e, "Target rejected, it will not be probed");
                    rejected.push(e);
                }
            }
        }

        let max_in_flight = config.max_in_flight.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            targets: accepted,
            rejected,
            prober,
            store,
            interval: config.interval(),
            max_in_flight,
            permits: Arc::new(Semaphore::new(max_in_flight)),
            tasks: JoinSet::new(),
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &ValidatedUrl> {
        self.targets.iter().map(|t| t.url.as_ref())
    }

    /// Validation failures found at construction.
    pub fn rejected(&self) -> &[UrlValidationError] {
        &self.rejected
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tasks spawned and not yet reaped.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Dispatch one probe task per idle accepted target and return immediately.
    ///
    /// A target whose previous probe is still running, or that finds every
    /// permit taken, is skipped for this tick. Returns the number of tasks
    /// spawned.
    pub fn tick(&mut self) -> usize {
        self.reap();

        let span = tracing::info_span!("tick", tick_id = %Uuid::new_v4());
        let _enter = span.enter();
        tracing::debug!(targets = self.targets.len(), in_flight = self.tasks.len(), "Dispatching probes");

        let mut spawned = 0;
        for target in &self.targets {
            if target.busy.swap(true, Ordering::SeqCst) {
                tracing::warn!(url = %target.url, "Previous probe still running, skipping target this tick");
                continue;
            }
            let guard = BusyGuard(target.busy.clone());

            let Ok(permit) = self.permits.clone().try_acquire_owned() else {
                tracing::warn!(
                    url = %target.url,
                    max_in_flight = self.max_in_flight,
                    "Probe capacity exhausted, skipping target this tick"
                );
                continue;
            };

            let work = probe_and_persist(
                target.url.clone(),
                self.prober.clone(),
                self.store.clone(),
                permit,
                guard,
            );
            self.tasks.spawn(work.in_current_span());
            spawned += 1;
        }
        spawned
    }

    /// Wait for every outstanding task to finish.
    pub async fn drain(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            log_task_result(result);
        }
    }

    /// Run until a shutdown signal arrives, then abort in-flight probes.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        if self.targets.is_empty() {
            tracing::warn!(rejected = self.rejected.len(), "No valid targets to monitor");
        }

        tracing::info!(
            targets = self.targets.len(),
            interval_secs = self.interval.as_secs(),
            "Scheduler starting"
        );

        let mut ticker = time::interval(self.interval);
        // Catch up on ticks missed while the runtime was stalled; busy targets
        // are skipped, so catch-up never stacks probes
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = shutdown.recv() => {
                    tracing::info!(in_flight = self.tasks.len(), "Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        self.tasks.abort_all();
        self.drain().await;
    }

    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_task_result(result);
        }
    }
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => {}
        Err(e) => tracing::error!(error = %e, "Probe task panicked"),
    }
}

/// One unit of work: probe a target and append the result.
async fn probe_and_persist(
    target: Arc<ValidatedUrl>,
    prober: Arc<Prober>,
    store: Arc<dyn ObservationStore>,
    _permit: OwnedSemaphorePermit,
    _busy: BusyGuard,
) {
    let observation = prober.probe(&target).await;
    tracing::info!(
        url = %observation.url,
        status_code = observation.status_code,
        response_time_ms = observation.response_time_ms,
        "Probe completed"
    );

    if let Err(e) = store.persist(observation).await {
        tracing::error!(url = %target, error = %e, "Failed to persist observation");
    }
}
