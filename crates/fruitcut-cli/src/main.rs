//! Fruitcut CLI entry point

use clap::Parser;
use std::time::Duration;
use tracing::{error, info};

use fruitcut_cli::{app::FruitcutApp, cli::Cli, config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_configuration(&cli)?;
    config.apply_overrides(&cli);

    // Initialize logging
    setup_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let duration = cli.duration.map(Duration::from_secs);
    if let Err(e) = FruitcutApp::new(config).run(duration).await {
        error!("Session failed: {}", e);
        std::process::exit(1);
    }

    info!("Fruitcut exited successfully");
    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    match &cli.config {
        Some(config_path) => AppConfig::load_from_file(config_path),
        None => Ok(AppConfig::default()),
    }
}
