use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use database::postgres::{self, PostgresConfig};
use eyre::{Result, WrapErr};
use migration::MIGRATOR;
use tracing::info;

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Apply or list the todo schema migrations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations (default)
    Up,
    /// List the migrations embedded in this binary
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    match Cli::parse().command.unwrap_or(Commands::Up) {
        Commands::Up => {
            let config = PostgresConfig::from_env().wrap_err("Failed to load database config")?;
            let pool = postgres::connect_from_config_with_retry(&config, None)
                .await
                .wrap_err("Failed to connect to PostgreSQL")?;

            postgres::run_migrations(&pool, &MIGRATOR, "todo")
                .await
                .wrap_err("Failed to apply migrations")?;
            postgres::close(&pool).await;
        }
        Commands::List => {
            for migration in MIGRATOR.iter() {
                info!(version = migration.version, description = %migration.description, "migration");
            }
        }
    }

    Ok(())
}
