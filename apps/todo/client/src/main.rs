use std::time::Duration;

use clap::Parser;
use core_config::Environment;
use todo_client::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    core_config::tracing::install_color_eyre();
    core_config::tracing::init_tracing(&Environment::from_env());

    let cli = Cli::parse();
    todo_client::run(cli.mode, &cli.server, Duration::from_secs(cli.timeout_secs)).await?;
    Ok(())
}
