//! PostgreSQL pool setup, migrations and health probing.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{close, connect, connect_from_config_with_retry, run_migrations};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use sqlx::migrate::Migrator;
pub use sqlx::postgres::{PgPool, PgSslMode};
