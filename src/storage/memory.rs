//! In-memory observation store.
//!
//! Used by tests and dry runs. Can be switched into an unavailable state to
//! exercise insert-failure handling.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::health::Observation;
use crate::storage::{check_well_formed, ObservationStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    rows: DashMap<String, Vec<Observation>>,
    schema_provisions: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail as if the database went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Rows for one url, in insertion order.
    pub fn observations_for(&self, url: &str) -> Vec<Observation> {
        self.rows.get(url).map(|r| r.value().clone()).unwrap_or_default()
    }

    /// Total row count.
    pub fn len(&self) -> usize {
        self.rows.iter().map(|r| r.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn schema_provisions(&self) -> usize {
        self.schema_provisions.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check_available()?;
        self.schema_provisions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn persist(&self, observation: Observation) -> Result<(), StoreError> {
        self.check_available()?;
        check_well_formed(&observation)?;
        let observation = observation.stamped(Utc::now());
        self.rows
            .entry(observation.url.clone())
            .or_default()
            .push(observation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = MemoryStore::new();
        store.persist(Observation::new("https://a.test", 200, 5)).await.unwrap();

        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();

        assert_eq!(store.schema_provisions(), 2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_persist_appends_distinct_rows() {
        let store = MemoryStore::new();
        for latency in [10, 20, 30] {
            store.persist(Observation::new("https://a.test", 200, latency)).await.unwrap();
        }

        let rows = store.observations_for("https://a.test");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|o| o.response_time_ms).collect::<Vec<_>>(), vec![10, 20, 30]);
        assert!(rows.windows(2).all(|w| w[0].checked_at <= w[1].checked_at));
        assert!(rows.iter().all(|o| o.checked_at.is_some()));
    }

    #[tokio::test]
    async fn test_unavailable_store_rejects_without_storing() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let err = store.persist(Observation::unreachable("https://a.test", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.is_empty());

        store.set_unavailable(false);
        store.persist(Observation::unreachable("https://a.test", 1)).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_malformed_observation() {
        let store = MemoryStore::new();
        let err = store.persist(Observation::new("", 200, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidObservation(_)));
        assert!(store.is_empty());
    }
}
