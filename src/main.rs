use anyhow::Context;
use clap::Parser;

use job_board::{cli::{self, Cli}, config::Config, logging};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;

    logging::init(&config.log_dir)
        .with_context(|| format!("Failed to create log directory {}", config.log_dir.display()))?;

    cli::run(cli, config).await
}
