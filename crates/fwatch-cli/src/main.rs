//! fwatch - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use fwatch_cli::{App, Cli, Command};
use fwatch_common::{init_logging, LogFormat, LoggingConfig};
use fwatch_config::{Config, ConfigLoader};
use tracing::{info, warn};

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };
    Ok(config)
}

fn logging_config(cli: &Cli, config: &Config) -> LoggingConfig {
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    LoggingConfig {
        // journal lines are the program's output and stay visible at any level
        level: format!("{level},fwatch::journal=info"),
        format: config.logging.format.parse().unwrap_or(LogFormat::Compact),
        file_path: config.logging.file.clone(),
        ..LoggingConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    if let Command::Run(args) = &cli.command {
        args.apply(&mut config);
        config
            .validate_all()
            .context("Invalid monitoring options")?;
    }

    init_logging(logging_config(&cli, &config))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let app = App::new(config).context("Failed to create the API client")?;

    match &cli.command {
        Command::Resolve { uid } => {
            let target = app.resolve(uid).await?;
            println!("{}", target.name);
        }
        Command::Run(_) => {
            info!("Starting fwatch");
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            let outcome = app.run(shutdown).await?;
            if outcome.summary.is_none() {
                info!("Not enough samples were recorded for a summary");
            }
        }
    }

    Ok(())
}
