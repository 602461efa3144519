//! Configuration management for the weapon rankings engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and the rating presets.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StorageSettings};
pub use rating::{ProbationConfig, RatingConfig, RatingPrecision, SeedPolicy, StreakConfig};
