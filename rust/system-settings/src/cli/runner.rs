// Runner - Command execution against the persistent store
// Principle: Orchestrate store opening, plan application and reporting

use crate::cli::config::{parse_differentiator, ConfigError, SettingsConfig, UpdatePlan};
use crate::cli::Commands;
use crate::settings::{ChangeRecord, SettingId, SettingsError, SystemSettings};
use crate::storage::{Database, DatabaseError, FlexibleStorage, RocksStorage};
use crate::types::DifferentiatorKind;
use tracing::{error, info};

/// Run one command with the given configuration
pub fn run(command: Commands, config: &SettingsConfig) -> Result<(), RunnerError> {
    match command {
        Commands::Apply { plan, json } => {
            let plan = UpdatePlan::load(&plan)?;
            let mut settings = open_settings(config)?;

            let result = apply_plan(&mut settings, &plan);
            // Committed records are reported even when the plan stopped early
            let records = settings.drain_events();
            println!("{}", format_records(&records, json)?);

            match result {
                Ok(()) => {
                    info!("Applied {} update(s)", records.len());
                    Ok(())
                }
                Err(e) => {
                    error!("Plan stopped after {} committed update(s): {}", records.len(), e);
                    Err(e.into())
                }
            }
        }

        Commands::Get { setting, currency, address } => {
            let setting = setting.parse::<SettingId>().map_err(|_| ConfigError::UnknownSetting(setting))?;
            let differentiator = parse_differentiator(currency.as_deref(), address.as_deref())?;
            let settings = open_settings(config)?;

            let value = settings.get(setting, differentiator.as_ref())?;
            println!("{}", value);
            Ok(())
        }

        Commands::List => {
            for line in catalogue_lines() {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

/// Open the RocksDB store named by the configuration
pub fn open_settings(config: &SettingsConfig) -> Result<SystemSettings<RocksStorage>, RunnerError> {
    std::fs::create_dir_all(&config.db_path)
        .map_err(|e| RunnerError::Io(format!("Failed to create data dir: {}", e)))?;
    info!("Data path: {}", config.db_path.display());

    let db = Database::open(&config.db_path)?;
    Ok(SystemSettings::with_module(RocksStorage::new(db), config.module.clone()))
}

/// Apply a plan: the listed updates in order, then the exchange fee batch.
///
/// The plan is fully parsed before the first write. Application stops at the
/// first refused update; updates before it stay committed.
pub fn apply_plan<S: FlexibleStorage>(settings: &mut SystemSettings<S>, plan: &UpdatePlan) -> Result<(), PlanError> {
    let updates = plan.to_updates()?;
    let fee_batch = plan.exchange_fee_rates.as_ref().map(|b| b.parse()).transpose()?;

    settings.apply_all(updates)?;
    if let Some((currencies, rates)) = fee_batch {
        settings.set_exchange_fee_rates(&currencies, &rates)?;
    }
    Ok(())
}

/// Render change records as text lines or a JSON array
pub fn format_records(records: &[ChangeRecord], json: bool) -> Result<String, RunnerError> {
    if json {
        return serde_json::to_string_pretty(records).map_err(|e| RunnerError::Output(e.to_string()));
    }
    Ok(records
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// One line per catalogue entry: name, kind, differentiator, bound
pub fn catalogue_lines() -> Vec<String> {
    SettingId::ALL
        .iter()
        .map(|id| {
            let spec = id.spec();
            let per = match spec.differentiator {
                DifferentiatorKind::None => String::new(),
                kind => format!(" per {}", kind),
            };
            format!("{:<40} {:<8}{:<13} {}", spec.name, spec.kind.to_string(), per, spec.bound)
        })
        .collect()
}

/// Errors of a plan application
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid plan: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Runner errors
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Output error: {0}")]
    Output(String),
}
