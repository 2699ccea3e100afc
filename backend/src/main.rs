//! Backend entry-point: loads settings, migrates the database and serves the
//! users API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_directory::inbound::http::health::HealthState;
use user_directory::outbound::persistence::{DbPool, DieselUserRepository, run_pending_migrations};
use user_directory::settings::ServerSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let pool_config = settings.pool_config().map_err(std::io::Error::other)?;

    let applied = run_pending_migrations(pool_config.database_url())
        .await
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("failed to create database pool: {e}")))?;

    let probe = Arc::new(DieselUserRepository::new(pool.clone()));
    let health_state = web::Data::new(HealthState::new().with_storage_probe(probe));

    let bind_addr = ServerConfig::bind_addr_from(&settings)?;
    let server = create_server(health_state, ServerConfig::new(bind_addr, pool))?;
    info!(%bind_addr, "listening");
    server.await
}
