use clap::Parser;
use fieldops_core::FieldOpsConfig;
use fieldops_maintenance::MaintenanceManager;
use tracing::info;

mod cli;
mod commands;
mod format;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // load config: --config > FIELDOPS_CONFIG env > ~/.fieldops/fieldops.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("FIELDOPS_CONFIG").ok());
    let config_result = FieldOpsConfig::load(config_path.as_deref());
    let config = config_result.as_ref().cloned().unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = &config_result {
        tracing::warn!(code = e.code(), "Config load failed ({}), using defaults", e);
    }

    // the clock is read once here and passed down explicitly
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    if let cli::Command::NextDue { date, frequency } = &cli.command {
        return commands::next_due(*date, frequency, cli.json);
    }

    let db_path = cli.db.clone().unwrap_or(config.database.path);
    ensure_parent_dir(&db_path);
    let conn = fieldops_maintenance::db::open(&db_path)?;
    let manager = MaintenanceManager::new(conn);
    info!(path = %db_path, %today, "database ready");

    commands::run(&manager, cli.command, today, cli.json)
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), "could not create database directory: {e}");
            }
        }
    }
}
