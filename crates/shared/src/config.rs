//! Application configuration management.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Report configuration.
    #[serde(default)]
    pub reports: ReportsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the dashboard's static files, served at `/`.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Report configuration: template location and query defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Directory containing the `<name>.sql` templates.
    #[serde(default = "default_sql_dir")]
    pub sql_dir: PathBuf,
    /// Rows returned by the detail query when no limit is given.
    #[serde(default = "default_detail_limit")]
    pub detail_limit: u64,
    /// Upper bound for a caller-supplied detail limit.
    #[serde(default = "default_max_detail_limit")]
    pub max_detail_limit: u64,
    /// Entries returned by the unit ranking when no limit is given.
    #[serde(default = "default_ranking_limit")]
    pub ranking_limit: usize,
    /// First account code of the cash and cash-equivalent range.
    #[serde(default = "default_cash_account_start")]
    pub cash_account_start: String,
    /// Last account code of the cash and cash-equivalent range.
    #[serde(default = "default_cash_account_end")]
    pub cash_account_end: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            sql_dir: default_sql_dir(),
            detail_limit: default_detail_limit(),
            max_detail_limit: default_max_detail_limit(),
            ranking_limit: default_ranking_limit(),
            cash_account_start: default_cash_account_start(),
            cash_account_end: default_cash_account_end(),
        }
    }
}

impl ReportsConfig {
    /// Parameters bound into every SQL template.
    #[must_use]
    pub fn fixed_parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("conta_inicio".to_string(), self.cash_account_start.clone()),
            ("conta_fim".to_string(), self.cash_account_end.clone()),
        ])
    }
}

fn default_sql_dir() -> PathBuf {
    PathBuf::from("sql")
}

fn default_detail_limit() -> u64 {
    100
}

fn default_max_detail_limit() -> u64 {
    1000
}

fn default_ranking_limit() -> usize {
    10
}

fn default_cash_account_start() -> String {
    "111000000".to_string()
}

fn default_cash_account_end() -> String {
    "111999999".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CAIXA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
