use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_LOG_FILTER: &str = "fieldops_cli=info,fieldops_maintenance=info";

/// Top-level config (fieldops.toml + FIELDOPS_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldOpsConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset.
    /// Override with env var: FIELDOPS_LOGGING_FILTER=debug
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_db_path() -> String {
    format!("{}/fieldops.db", data_dir())
}

fn data_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.fieldops", home)
}

impl FieldOpsConfig {
    /// Load config from a TOML file with FIELDOPS_* env var overrides.
    ///
    /// Uses the explicit path when given, otherwise `~/.fieldops/fieldops.toml`.
    /// A missing file is not an error: every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        debug!(%path, "loading config");

        let config: FieldOpsConfig = Figment::from(Serialized::defaults(FieldOpsConfig::default()))
            .merge(Toml::file(&path))
            .merge(Env::prefixed("FIELDOPS_").split("_"))
            .extract()
            .map_err(|e| crate::error::FieldOpsError::Config(e.to_string()))?;

        Ok(config)
    }
}

pub fn default_config_path() -> String {
    format!("{}/fieldops.toml", data_dir())
}
