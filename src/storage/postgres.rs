//! PostgreSQL-backed observation store.

use std::str::FromStr;
use std::time::Duration;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::health::Observation;
use crate::storage::{check_well_formed, ObservationStore, StoreError};

pub const TABLE_NAME: &str = "uptime_logs";

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS uptime_logs (
        id SERIAL PRIMARY KEY,
        url TEXT NOT NULL,
        status_code INT,
        response_time_ms INT,
        checked_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS uptime_logs_url_checked_at_idx ON uptime_logs (url, checked_at)";

const INSERT: &str =
    "INSERT INTO uptime_logs (url, status_code, response_time_ms, checked_at) VALUES ($1, $2, $3, $4)";

/// Store writing to the `uptime_logs` table through a shared pool.
#[derive(Clone)]
pub struct PgObservationStore {
    pool: PgPool,
}

impl PgObservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and verify connectivity with one connection.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let ssl_mode = PgSslMode::from_str(&config.ssl_mode)?;
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(ssl_mode);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected to PostgreSQL"
        );
        Ok(Self::new(pool))
    }

    /// Connect from a `postgres://` URL.
    pub async fn connect_url(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ObservationStore for PgObservationStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        tracing::info!(table = TABLE_NAME, "Schema ready");
        Ok(())
    }

    async fn persist(&self, observation: Observation) -> Result<(), StoreError> {
        check_well_formed(&observation)?;
        let observation = observation.stamped(Utc::now());
        let checked_at = observation.checked_at.map(|t| t.naive_utc());

        sqlx::query(INSERT)
            .bind(&observation.url)
            .bind(i32::from(observation.status_code))
            .bind(i32::try_from(observation.response_time_ms).unwrap_or(i32::MAX))
            .bind(checked_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
