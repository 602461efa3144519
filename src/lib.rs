//! Weapon Rankings - Elo-style ratings for club fencing duels
//!
//! This crate keeps one ranking table per weapon and resolves each recorded
//! duel into new ratings, with probation for newcomers, win streaks, an
//! underdog bounty and table-wide decay.

pub mod config;
pub mod error;
pub mod rating;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{DuelResolution, LevelClassifier, RankingStore, RatingEngine};
pub use service::DuelService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
