use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::core::RankOptions;
use crate::models::WeightConfig;
use crate::services::{DocumentStoreConfig, MatchDefaults};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub database: Option<DatabaseSettings>,
    pub document_store: Option<DocumentStoreSettings>,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which storage collaborator supplies profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Postgres,
    DocumentStore,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentStoreSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    pub collection: String,
    pub page_size: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl DocumentStoreSettings {
    pub fn to_client_config(&self) -> DocumentStoreConfig {
        DocumentStoreConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            project_id: self.project_id.clone(),
            database_id: self.database_id.clone(),
            collection: self.collection.clone(),
            page_size: self.page_size.unwrap_or(100),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(30)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,
    /// Candidate count at which scoring moves onto the rayon pool (0 disables)
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Optional per-invocation scoring budget
    pub time_budget_ms: Option<u64>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            parallel_threshold: default_parallel_threshold(),
            time_budget_ms: None,
        }
    }
}

fn default_top_n() -> usize { 10 }
fn default_max_top_n() -> usize { 100 }
fn default_parallel_threshold() -> usize { 2_000 }

impl MatchingSettings {
    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            parallel_threshold: (self.parallel_threshold > 0).then_some(self.parallel_threshold),
            time_budget: self.time_budget_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with COFOUNDER_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., COFOUNDER__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("COFOUNDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("COFOUNDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize::<Self>()?.validated()
    }

    /// Reject settings that would break scoring invariants
    fn validated(self) -> Result<Self, ConfigError> {
        self.scoring
            .weights
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid scoring.weights: {}", e)))?;
        Ok(self)
    }

    pub fn match_defaults(&self) -> MatchDefaults {
        MatchDefaults {
            weights: self.scoring.weights,
            top_n: self.matching.default_top_n,
            max_top_n: self.matching.max_top_n,
        }
    }
}

/// Apply well-known credential variables on top of the layered config
///
/// `DATABASE_URL` and `DOCUMENT_STORE_API_KEY` are honored so secrets never
/// need to live in config files.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_key) = env::var("DOCUMENT_STORE_API_KEY") {
        builder = builder.set_override("document_store.api_key", api_key)?;
    }

    builder.build()
}
