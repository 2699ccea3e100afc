//! Embedded PostgreSQL provisioning for integration tests.
//!
//! Every suite shares one cluster per test binary. A template database is
//! migrated once, then each test clones it into its own temporary database so
//! tests never observe each other's rows.

use std::sync::{Mutex, OnceLock};

use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

use user_directory::outbound::persistence::run_pending_migrations;

const TEMPLATE_DATABASE: &str = "user_directory_template";

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Creates a fresh, migrated database on the shared cluster.
///
/// The database is dropped when the returned handle goes out of scope.
pub fn provision_migrated_database(runtime: &Runtime) -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    ensure_template_database(cluster, runtime)?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(db_name.as_str(), TEMPLATE_DATABASE)
        .map_err(|err| format!("create database from template: {err:?}"))
}

fn ensure_template_database(cluster: &ClusterHandle, runtime: &Runtime) -> Result<(), String> {
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(TEMPLATE_DATABASE)
        .map_err(|err| format!("template check: {err:?}"))?;
    if exists {
        return Ok(());
    }

    cluster
        .create_database(TEMPLATE_DATABASE)
        .map_err(|err| format!("create template: {err:?}"))?;
    let url = cluster.connection().database_url(TEMPLATE_DATABASE);
    runtime
        .block_on(run_pending_migrations(url.as_str()))
        .map(|_| ())
        .map_err(|err| format!("migrate template: {err}"))
}
