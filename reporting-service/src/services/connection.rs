//! One-shot pool bootstrap over an ordered list of candidate databases.

use crate::config::{DatabaseCandidate, DatabaseConfig};
use crate::services::metrics::CONNECTION_ATTEMPTS_TOTAL;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// Owns the process-wide pool.
///
/// The first caller of [`ConnectionManager::pool`] tries each candidate in
/// order and keeps the first that connects. Callers arriving while that is in
/// flight wait on the same attempt. A failed bootstrap leaves the cell empty.
pub struct ConnectionManager {
    candidates: Vec<DatabaseCandidate>,
    max_connections: u32,
    min_connections: u32,
    acquire_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl ConnectionManager {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            candidates: config.candidates.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
            pool: OnceCell::new(),
        }
    }

    pub async fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .get_or_try_init(|| self.connect_first_available())
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    async fn connect_first_available(&self) -> Result<PgPool, AppError> {
        if self.candidates.is_empty() {
            return Err(AppError::ConnectionError(anyhow::anyhow!(
                "no database candidates configured"
            )));
        }

        for (position, candidate) in self.candidates.iter().enumerate() {
            info!(
                attempt = position + 1,
                candidate = %candidate.name,
                max_connections = self.max_connections,
                "Connecting to PostgreSQL"
            );

            let result = PgPoolOptions::new()
                .max_connections(self.max_connections)
                .min_connections(self.min_connections)
                .acquire_timeout(self.acquire_timeout)
                .idle_timeout(Duration::from_secs(600))
                .connect(&candidate.url)
                .await;

            match result {
                Ok(pool) => {
                    CONNECTION_ATTEMPTS_TOTAL
                        .with_label_values(&[&candidate.name, "success"])
                        .inc();
                    info!(candidate = %candidate.name, "PostgreSQL connection pool established");
                    return Ok(pool);
                }
                Err(e) => {
                    CONNECTION_ATTEMPTS_TOTAL
                        .with_label_values(&[&candidate.name, "failure"])
                        .inc();
                    warn!(candidate = %candidate.name, error = %e, "Database candidate failed");
                }
            }
        }

        error!(
            tried = self.candidates.len(),
            "All database candidates failed"
        );
        Err(AppError::ConnectionError(anyhow::anyhow!(
            "no database candidate reachable ({} tried)",
            self.candidates.len()
        )))
    }
}
