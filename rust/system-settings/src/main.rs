// System Settings - Entry point
// Principle: Parse, configure logging, dispatch

use clap::Parser;
use system_settings::cli::config::SettingsConfig;
use system_settings::cli::runner::run;
use system_settings::cli::Cli;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // File configuration first, CLI flags override it
    let config = match &cli.config {
        Some(path) => SettingsConfig::load(path)?,
        None => SettingsConfig::default(),
    }
    .with_db_path(cli.db.clone())
    .with_log_level(cli.log_level.clone());

    // Initialize logging based on verbosity
    let log_filter = if cli.verbose { "debug" } else { config.log_level.as_str() };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command, &config) {
        error!("{}", e);
        return Err(anyhow::anyhow!("{}", e));
    }

    Ok(())
}
