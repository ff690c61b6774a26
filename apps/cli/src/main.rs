mod commands;
mod config;
mod main_lib;
mod secrets;

use clap::Parser;
use commands::Cli;
use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config)?;
    tracing::debug!("Using API at {}", config.api_url);

    let result = commands::run(cli.command, &state).await;
    state.session.shutdown();
    result
}
