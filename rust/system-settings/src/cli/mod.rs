// CLI - Command Line Interface for the settings store
// Principle: Simple, clear, composable commands

pub mod config;
pub mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// System Settings - Governed protocol parameters
#[derive(Parser, Debug)]
#[command(name = "system-settings")]
#[command(author = "System Settings Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bounded, cross-checked protocol parameter updates")]
#[command(long_about = r#"
Applies protocol parameter updates to a persistent settings store.

Every value is checked against its fixed policy bound and, where a rule
exists, against the currently stored related parameters. Refused updates
never reach the store.

Apply an update plan:
  system-settings apply plan.toml

Read one value:
  system-settings get exchangeFeeRate --currency sUSD

Show the catalogue:
  system-settings list
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "SYSTEM_SETTINGS_LOG")]
    pub log_level: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database directory
    #[arg(short = 'd', long, global = true, env = "SYSTEM_SETTINGS_DB")]
    pub db: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply an update plan
    Apply {
        /// Plan file (TOML)
        plan: PathBuf,

        /// Print change records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the stored value of a setting
    Get {
        /// Setting storage name (e.g. issuanceRatio)
        setting: String,

        /// Currency key for per-currency settings
        #[arg(long, conflicts_with = "address")]
        currency: Option<String>,

        /// Address for per-wrapper / per-collateral settings
        #[arg(long)]
        address: Option<String>,
    },

    /// List every governed setting
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get_with_currency() {
        let cli = Cli::parse_from(["system-settings", "get", "exchangeFeeRate", "--currency", "sUSD"]);
        match cli.command {
            Commands::Get { setting, currency, address } => {
                assert_eq!(setting, "exchangeFeeRate");
                assert_eq!(currency.as_deref(), Some("sUSD"));
                assert!(address.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_currency_and_address_conflict() {
        let result = Cli::try_parse_from([
            "system-settings",
            "get",
            "exchangeFeeRate",
            "--currency",
            "sUSD",
            "--address",
            "0x01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["system-settings", "apply", "plan.toml", "--json", "-v", "-d", "/tmp/db"]);
        assert!(cli.verbose);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/db")));
        assert!(matches!(cli.command, Commands::Apply { json: true, .. }));
    }
}
