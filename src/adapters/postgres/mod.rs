//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresResourceRepository` - resources with their members and requests
//! - `session_store` - `tower-sessions` records in Postgres

mod resource_repository;

pub use resource_repository::PostgresResourceRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::DatabaseConfig;

/// Open the shared connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(&config.url)
        .await
}

/// Apply the embedded SQL migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[derive(Debug, Error)]
pub enum SessionStoreSetupError {
    #[error("Invalid session table name: {0}")]
    InvalidTable(String),

    #[error("Session table migration failed: {0}")]
    Migration(#[from] sqlx::Error),
}

/// Session store keeping records in `table`, created when missing.
pub async fn session_store(
    pool: PgPool,
    table: &str,
) -> Result<PostgresStore, SessionStoreSetupError> {
    let store = PostgresStore::new(pool)
        .with_table_name(table)
        .map_err(SessionStoreSetupError::InvalidTable)?;
    store.migrate().await?;
    Ok(store)
}
