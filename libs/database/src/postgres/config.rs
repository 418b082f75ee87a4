use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or_default};

/// PostgreSQL connection and pool settings
///
/// Built from discrete parameters rather than a URL so each can be supplied
/// and validated on its own.
///
/// ```ignore
/// let config = PostgresConfig::new("localhost", 5432, "postgres", "secret", "todo");
/// let pool = database::postgres::connect(&config).await?;
/// ```
#[derive(Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: PgSslMode,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// Upper bound for waiting on a pooled connection
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PostgresConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(self.ssl_mode)
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Some(self.idle_timeout))
            .max_lifetime(Some(self.max_lifetime))
    }

    /// `host:port/database` for logs; never includes credentials
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: String::new(),
            database: "todo".to_string(),
            ssl_mode: PgSslMode::Prefer,
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish_non_exhaustive()
    }
}

/// Environment variables:
/// - `DB_HOST` (default: localhost)
/// - `DB_PORT` (default: 5432)
/// - `DB_USER` (default: postgres)
/// - `DB_PASSWORD` (default: empty)
/// - `DB_NAME` (default: todo)
/// - `DB_SSL_MODE` (default: prefer)
/// - `DB_MAX_CONNECTIONS` (default: 10)
/// - `DB_MIN_CONNECTIONS` (default: 1)
/// - `DB_ACQUIRE_TIMEOUT_SECS` (default: 5)
/// - `DB_IDLE_TIMEOUT_SECS` (default: 600)
/// - `DB_MAX_LIFETIME_SECS` (default: 1800)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: env_or_default("DB_HOST", &defaults.host),
            port: env_parse_or_default("DB_PORT", defaults.port)?,
            username: env_or_default("DB_USER", &defaults.username),
            password: env_or_default("DB_PASSWORD", ""),
            database: env_or_default("DB_NAME", &defaults.database),
            ssl_mode: env_parse_or_default("DB_SSL_MODE", defaults.ssl_mode)?,
            max_connections: env_parse_or_default("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse_or_default("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout: Duration::from_secs(env_parse_or_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
            idle_timeout: Duration::from_secs(env_parse_or_default(
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )?),
            max_lifetime: Duration::from_secs(env_parse_or_default(
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime.as_secs(),
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_new() {
        let config = PostgresConfig::new("db.internal", 6432, "app", "s3cret", "tasks");
        assert_eq!(config.display_target(), "db.internal:6432/tasks");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = PostgresConfig::new("localhost", 5432, "app", "s3cret", "todo");
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_connect_options_carry_parameters() {
        let config = PostgresConfig::new("db.internal", 6432, "app", "s3cret", "tasks");
        let options = config.connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("tasks"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_postgres_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("DB_HOST", None::<&str>),
                ("DB_PORT", None),
                ("DB_USER", None),
                ("DB_PASSWORD", None),
                ("DB_NAME", None),
                ("DB_SSL_MODE", None),
                ("DB_MAX_CONNECTIONS", None),
            ],
            || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.display_target(), "localhost:5432/todo");
                assert_eq!(config.username, "postgres");
                assert!(config.password.is_empty());
                assert!(matches!(config.ssl_mode, PgSslMode::Prefer));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_postgres_config_from_env_custom() {
        temp_env::with_vars(
            [
                ("DB_HOST", Some("pg")),
                ("DB_PORT", Some("5433")),
                ("DB_USER", Some("todo")),
                ("DB_PASSWORD", Some("pw")),
                ("DB_NAME", Some("todos")),
                ("DB_SSL_MODE", Some("disable")),
                ("DB_MAX_CONNECTIONS", Some("4")),
            ],
            || {
                let config = PostgresConfig::from_env().unwrap();
                assert_eq!(config.display_target(), "pg:5433/todos");
                assert_eq!(config.username, "todo");
                assert_eq!(config.password, "pw");
                assert_eq!(config.max_connections, 4);
                assert!(matches!(config.ssl_mode, PgSslMode::Disable));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_postgres_config_from_env_invalid_port() {
        temp_env::with_var("DB_PORT", Some("five-four-three-two"), || {
            let err = PostgresConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("DB_PORT"));
        });
    }
}
