//! Error types for the rankings engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Typed failures can be recovered with
//! `anyhow::Error::downcast_ref::<RankingError>()`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific duel-resolution scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("Unknown weapon: {weapon}")]
    UnknownWeapon { weapon: String },

    #[error("Unknown level '{level}' (expected beginner, experienced or advanced)")]
    UnknownLevel { level: String },

    #[error("No level classification supplied for new fencer '{name}' in {weapon}")]
    MissingLevelClassification { name: String, weapon: String },

    #[error("A fencer cannot duel themselves: {name}")]
    SelfDuel { name: String },

    #[error("Invalid prior rating {rating} for fencer '{name}'")]
    InvalidPriorRating { name: String, rating: f64 },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}
