pub mod entities;
pub mod migrator;
pub mod repositories;

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Deserialize;
use tracing::{info, warn};

use crate::shared::errors::{DomainError, DomainResult};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./parking.db?mode=rwc";

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./parking.db?mode=rwc")
    pub url: String,
    /// Upper bound on any single store call, in milliseconds
    pub query_timeout_ms: u64,
    pub pool: PoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            query_timeout_ms: 5_000,
            pool: PoolConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Default::default()
        }
    }

    /// In-memory SQLite with a single pooled connection, so every query
    /// sees the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool: PoolConfig {
                max_connections: 1,
                min_connections: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 300,
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!(url = %config.url, "Connecting to database");

    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.pool.idle_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Connection handle shared by every repository.
///
/// All store calls go through [`Store::run`], which bounds them by the
/// configured query timeout.
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
    query_timeout: Duration,
}

impl Store {
    pub fn new(db: DatabaseConnection, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Run one store operation under the query timeout.
    ///
    /// `op` names the call in logs and in [`DomainError::Timeout`].
    pub async fn run<T, F>(&self, op: &'static str, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    op,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(DomainError::Timeout(op))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::new(DatabaseConnection::Disconnected, Duration::from_millis(20))
    }

    #[tokio::test]
    async fn slow_call_becomes_timeout() {
        let result: DomainResult<()> = store()
            .run("slots.find_all", async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DomainError::Timeout("slots.find_all"))));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let result = store().run("noop", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn config_defaults() {
        let cfg = DatabaseConfig::default();
        assert_eq!(cfg.url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.query_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.pool.max_connections, 10);
    }
}
