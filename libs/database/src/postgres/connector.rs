use sqlx::migrate::Migrator;
use sqlx::postgres::PgPool;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Open a pool and establish its first connection
pub async fn connect(config: &PostgresConfig) -> DatabaseResult<PgPool> {
    let pool = config
        .pool_options()
        .connect_with(config.connect_options())
        .await?;

    info!(
        target_db = %config.display_target(),
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );

    Ok(pool)
}

/// Connect with exponential backoff, for databases that start alongside us
///
/// ```ignore
/// let config = PostgresConfig::from_env()?;
/// let pool = connect_from_config_with_retry(&config, Some(RetryConfig::new().with_max_retries(10))).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: &PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<PgPool> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect(config), policy).await,
        None => retry(|| connect(config)).await,
    }
}

/// Apply embedded migrations
///
/// ```ignore
/// run_migrations(&pool, &migration::MIGRATOR, "todo").await?;
/// ```
pub async fn run_migrations(
    pool: &PgPool,
    migrator: &Migrator,
    app_name: &str,
) -> DatabaseResult<()> {
    info!(app = app_name, "Running database migrations");
    migrator.run(pool).await?;
    info!(app = app_name, "Migrations completed");
    Ok(())
}

/// Close the pool, waiting for checked-out connections to come back
pub async fn close(pool: &PgPool) {
    pool.close().await;
    info!("PostgreSQL pool closed");
}
