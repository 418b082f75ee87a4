use std::time::Duration;

use core_config::{ConfigError, Environment, FromEnv, ListenerConfig, env_parse_or_default};
use database::postgres::PostgresConfig;
use grpc_client::server::ServerConfig;

/// Listener settings for both transports
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub grpc: ServerConfig,
    pub http: ListenerConfig,
    /// How long the gateway drains in-flight requests after shutdown starts
    pub shutdown_timeout: Duration,
}

impl TransportConfig {
    pub fn new(grpc: ServerConfig, http: ListenerConfig) -> Self {
        Self {
            grpc,
            http,
            shutdown_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl FromEnv for TransportConfig {
    /// Reads:
    /// - `GRPC_*` and `REQUEST_TIMEOUT_SECS` (see `ServerConfig`)
    /// - `HTTP_HOST` (default: 0.0.0.0), `HTTP_PORT` (required)
    /// - `SHUTDOWN_TIMEOUT_SECS` (default: 5)
    fn from_env() -> Result<Self, ConfigError> {
        let grpc = ServerConfig::from_env()?;
        let http = ListenerConfig::from_env_with_prefix("HTTP")?;
        let shutdown_timeout = env_parse_or_default("SHUTDOWN_TIMEOUT_SECS", 5u64)?;

        Ok(Self::new(grpc, http).with_shutdown_timeout(Duration::from_secs(shutdown_timeout)))
    }
}

/// Full process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub transport: TransportConfig,
    pub database: PostgresConfig,
    /// Apply embedded migrations at startup (`RUN_MIGRATIONS`, default: true)
    pub run_migrations: bool,
}

impl FromEnv for AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            transport: TransportConfig::from_env()?,
            database: PostgresConfig::from_env()?,
            run_migrations: env_parse_or_default("RUN_MIGRATIONS", true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_from_env() {
        temp_env::with_vars(
            [
                ("GRPC_HOST", Some("127.0.0.1")),
                ("GRPC_PORT", Some("50051")),
                ("HTTP_HOST", None),
                ("HTTP_PORT", Some("8080")),
                ("SHUTDOWN_TIMEOUT_SECS", Some("2")),
            ],
            || {
                let config = TransportConfig::from_env().unwrap();
                assert_eq!(config.grpc.addr_string(), "127.0.0.1:50051");
                assert_eq!(config.http.address(), "0.0.0.0:8080");
                assert_eq!(config.shutdown_timeout, Duration::from_secs(2));
            },
        );
    }

    #[test]
    fn test_missing_ports_fail_fast() {
        temp_env::with_vars(
            [("GRPC_PORT", None::<&str>), ("HTTP_PORT", Some("8080"))],
            || {
                assert!(matches!(
                    TransportConfig::from_env(),
                    Err(ConfigError::MissingEnvVar(_))
                ));
            },
        );
        temp_env::with_vars(
            [("GRPC_PORT", Some("50051")), ("HTTP_PORT", None)],
            || {
                assert!(matches!(
                    TransportConfig::from_env(),
                    Err(ConfigError::MissingEnvVar(_))
                ));
            },
        );
    }

    #[test]
    fn test_app_config_defaults() {
        temp_env::with_vars(
            [
                ("GRPC_PORT", Some("50051")),
                ("HTTP_PORT", Some("8080")),
                ("RUN_MIGRATIONS", None),
                ("SHUTDOWN_TIMEOUT_SECS", None),
                ("DB_NAME", Some("todo")),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert!(config.run_migrations);
                assert_eq!(config.transport.shutdown_timeout, Duration::from_secs(5));
                assert_eq!(config.database.database, "todo");
            },
        );
    }

    #[test]
    fn test_invalid_shutdown_timeout() {
        temp_env::with_vars(
            [
                ("GRPC_PORT", Some("50051")),
                ("HTTP_PORT", Some("8080")),
                ("SHUTDOWN_TIMEOUT_SECS", Some("soon")),
            ],
            || {
                assert!(matches!(
                    TransportConfig::from_env(),
                    Err(ConfigError::ParseError { .. })
                ));
            },
        );
    }
}
