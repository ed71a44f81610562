use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Explicitly constructed store handle. Built once at startup and injected
/// through axum state; handlers never reach for ambient globals.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Build the pool from DATABASE_URL and the configured limits. Connections
    /// are established lazily, so startup succeeds before the store is up;
    /// `/health` reports the difference.
    pub async fn connect() -> Result<Self, StoreError> {
        let url = Self::database_url()?;
        let cfg = &config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(Duration::from_secs(cfg.connection_timeout))
            .connect_lazy(&url)?;

        info!("Created database pool ({} max connections)", cfg.max_connections);

        let db = Self { pool };
        if cfg.run_migrations {
            // Development convenience; production applies migrations explicitly
            if let Err(e) = db.migrate().await {
                tracing::warn!("skipping migrations, database unreachable: {}", e);
            }
        }
        Ok(db)
    }

    /// Wrap an existing pool (tests).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn database_url() -> Result<String, StoreError> {
        let base = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            tracing::warn!("DATABASE_URL not set, using local default");
            "postgres://localhost:5432/aviary".to_string()
        });

        // Parse up-front so a malformed URL fails at startup, not per request
        let url = url::Url::parse(&base).map_err(|_| StoreError::InvalidDatabaseUrl)?;
        Ok(url.into())
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction. The credential-update + token-delete pair in the
    /// recovery flow is the only multi-statement unit of work in the core.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        Ok(self.pool.begin().await?)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
