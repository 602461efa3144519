//! Main application configuration
//!
//! Settings come from an optional TOML file, then environment variables
//! override individual values.

use super::rating::{RatingConfig, RatingPrecision, SeedPolicy};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where ranking tables and history logs live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "weapon-rankings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl FromStr for RatingPrecision {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "integer" | "int" => Ok(RatingPrecision::Integer),
            "one_decimal" | "decimal" => Ok(RatingPrecision::OneDecimal),
            other => Err(anyhow!("Unknown rating precision: {}", other)),
        }
    }
}

impl FromStr for SeedPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quantile" => Ok(SeedPolicy::Quantile),
            "median" => Ok(SeedPolicy::Median),
            other => Err(anyhow!("Unknown seed policy: {}", other)),
        }
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {} value '{}': {}", key, value, e))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load a TOML file, then apply environment overrides on top
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Override fields from a key lookup using the environment variable names
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }

        // Rating settings
        let rating = &mut self.rating;
        if let Some(v) = lookup("RATING_K") {
            rating.k = parse_var("RATING_K", &v)?;
        }
        if let Some(v) = lookup("RATING_BETA") {
            rating.beta = parse_var("RATING_BETA", &v)?;
        }
        if let Some(v) = lookup("RATING_DECAY") {
            rating.decay = parse_var("RATING_DECAY", &v)?;
        }
        if let Some(v) = lookup("RATING_FLOOR") {
            rating.floor = parse_var("RATING_FLOOR", &v)?;
        }
        if let Some(v) = lookup("RATING_BOUNTY_CONSTANT") {
            rating.bounty_constant = parse_var("RATING_BOUNTY_CONSTANT", &v)?;
        }
        if let Some(v) = lookup("RATING_INITIAL") {
            rating.initial_rating = parse_var("RATING_INITIAL", &v)?;
        }
        if let Some(v) = lookup("RATING_PRECISION") {
            rating.precision = parse_var("RATING_PRECISION", &v)?;
        }
        if let Some(v) = lookup("RATING_SEED_POLICY") {
            rating.seed_policy = parse_var("RATING_SEED_POLICY", &v)?;
        }

        // Probation and streaks
        if let Some(v) = lookup("PROBATION_ENABLED") {
            rating.probation.enabled = parse_var("PROBATION_ENABLED", &v)?;
        }
        if let Some(v) = lookup("PROBATION_QUOTA") {
            rating.probation.quota = parse_var("PROBATION_QUOTA", &v)?;
        }
        if let Some(v) = lookup("PROBATION_MULTIPLIER") {
            rating.probation.multiplier = parse_var("PROBATION_MULTIPLIER", &v)?;
        }
        if let Some(v) = lookup("STREAK_ENABLED") {
            rating.streak.enabled = parse_var("STREAK_ENABLED", &v)?;
        }
        if let Some(v) = lookup("STREAK_CLOSENESS") {
            rating.streak.closeness_threshold = parse_var("STREAK_CLOSENESS", &v)?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }
    if config.storage.data_dir.as_os_str().is_empty() {
        return Err(anyhow!("Data directory cannot be empty"));
    }

    config.rating.validate()
}
