use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use pantry_matching::{DEFAULT_MATCH_THRESHOLD, EngineConfig};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// 0 uses one scoring thread per core.
    #[serde(default)]
    pub parallelism: usize,
    #[serde(default = "default_cache_shards")]
    pub cache_shards: usize,
    /// 0 fetches every candidate.
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    /// JSON object of precomputed ingredient embeddings.
    #[serde(default)]
    pub embeddings_path: Option<String>,
    #[serde(default)]
    pub title_dedup_threshold: Option<f64>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            parallelism: 0,
            cache_shards: default_cache_shards(),
            candidate_limit: default_candidate_limit(),
            embeddings_path: None,
            title_dedup_threshold: None,
        }
    }
}

impl MatchingConfig {
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            threshold: self.threshold,
            parallelism: self.parallelism,
            cache_shards: self.cache_shards,
            title_dedup_threshold: self.title_dedup_threshold,
        }
    }

    pub fn candidate_limit(&self) -> Option<usize> {
        (self.candidate_limit > 0).then_some(self.candidate_limit)
    }
}

fn default_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_cache_shards() -> usize {
    16
}

fn default_candidate_limit() -> usize {
    3000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (PANTRY__MATCHING__THRESHOLD, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("database.url", "sqlite:pantry.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("PANTRY")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if !(self.matching.threshold > 0.0 && self.matching.threshold <= 1.0) {
            return Err("Matching threshold must be in (0, 1]".to_string());
        }
        if self.matching.cache_shards == 0 {
            return Err("Matching cache_shards must be at least 1".to_string());
        }
        match self.matching.title_dedup_threshold {
            Some(threshold) if !(0.0..=1.0).contains(&threshold) => {
                Err("Matching title_dedup_threshold must be in [0, 1]".to_string())
            }
            _ => Ok(()),
        }
    }
}
