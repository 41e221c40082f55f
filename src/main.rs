use std::sync::Arc;

use devex_server::adapters::http::middleware::spawn_expired_session_sweeper;
use devex_server::adapters::postgres::{self, PostgresResourceRepository};
use devex_server::bootstrap::{build_app, default_modules, Dependencies};
use devex_server::config::AppConfig;
use devex_server::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    observability::init(&config.server);
    config.validate()?;

    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let session_pool = if config.session.share_connection {
        pool.clone()
    } else {
        tracing::info!("Sessions use a dedicated connection pool");
        postgres::connect(&config.database).await?
    };

    let session_store =
        postgres::session_store(session_pool, &config.session.collection).await?;
    let _sweeper =
        spawn_expired_session_sweeper(session_store.clone(), config.session.sweep_interval());
    tracing::info!(
        every_secs = config.session.sweep_interval_secs,
        "Expired session sweep scheduled"
    );

    let deps = Dependencies {
        resources: Arc::new(PostgresResourceRepository::new(pool.clone())),
        session_store: Arc::new(session_store),
        database: Some(pool),
        modules: default_modules(),
    };

    let addr = config.server.socket_addr()?;
    let environment = config.server.environment;
    let app = build_app(config, deps).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, env = environment.as_str(), "Server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
