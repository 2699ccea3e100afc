//! Server settings loaded via OrthoConfig.
//!
//! Values are layered from defaults, configuration files, `USER_DIRECTORY_*`
//! environment variables and command-line flags.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3001;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database connection string was supplied.
    #[error("database URL is required (set USER_DIRECTORY_DATABASE_URL or --database-url)")]
    MissingDatabaseUrl,
}

/// Configuration values for the HTTP server and its database pool.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_DIRECTORY")]
pub struct ServerSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Address to bind the HTTP listener to.
    pub host: Option<String>,
    /// Port to bind the HTTP listener to.
    ///
    /// Carrying a default keeps the merged layers non-empty, so loading
    /// succeeds even when nothing else is configured.
    #[ortho_config(default = 3001)]
    pub port: u16,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub pool_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Return the database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when none was configured.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Return the bind host, falling back to [`DEFAULT_HOST`].
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the bind port ([`DEFAULT_PORT`] unless overridden).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Build the pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when none was configured.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let mut config = PoolConfig::new(self.database_url()?);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(secs) = self.pool_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "USER_DIRECTORY_DATABASE_URL",
        "USER_DIRECTORY_HOST",
        "USER_DIRECTORY_PORT",
        "USER_DIRECTORY_POOL_MAX_SIZE",
        "USER_DIRECTORY_POOL_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("user-directory")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
        assert!(settings.pool_config().is_err());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "USER_DIRECTORY_DATABASE_URL",
                Some("postgres://localhost/users".to_owned()),
            ),
            ("USER_DIRECTORY_HOST", Some("127.0.0.1".to_owned())),
            ("USER_DIRECTORY_PORT", Some("8080".to_owned())),
            ("USER_DIRECTORY_POOL_MAX_SIZE", Some("4".to_owned())),
            ("USER_DIRECTORY_POOL_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.host(), "127.0.0.1");
        assert_eq!(settings.port(), 8080);
        assert_eq!(settings.database_url(), Ok("postgres://localhost/users"));
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.database_url(), "postgres://localhost/users");
    }

    #[rstest]
    fn database_url_flag_loads_without_other_sources() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = ServerSettings::load_from_iter([
            OsString::from("user-directory"),
            OsString::from("--database-url"),
            OsString::from("postgres://localhost/users"),
        ])
        .expect("config should load");

        assert_eq!(settings.database_url(), Ok("postgres://localhost/users"));
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(settings.host(), DEFAULT_HOST);
    }

    #[rstest]
    fn missing_database_url_is_reported_after_loading() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let err = load_from_empty_args()
            .pool_config()
            .expect_err("no database URL configured");

        assert!(err.to_string().contains("USER_DIRECTORY_DATABASE_URL"));
    }

    #[rstest]
    fn blank_database_url_counts_as_missing() {
        let _guard = lock_env([("USER_DIRECTORY_DATABASE_URL", Some("  ".to_owned()))]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
    }
}
