use anyhow::Result;
use clap::Parser;
use hirelens::app_log;
use hirelens::cli::{self, Cli};
use hirelens::core::ConfigManager;
use hirelens::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging first
    init_logging(cli.json_logs, "info")?;

    let config = ConfigManager::load()?;
    match &config.source {
        Some(path) => app_log!(debug, "Configuration file: {}", path.display()),
        None => app_log!(debug, "Configuration: defaults and environment"),
    }

    cli::run(cli, config).await
}
