//! Duel rating engine
//!
//! This module provides the per-duel pipeline (participant resolution,
//! probation, win streaks, Elo update, decay and floor) and the storage
//! interface the surrounding application persists its snapshots through.

pub mod classifier;
pub mod decay;
pub mod elo;
pub mod engine;
pub mod probation;
pub mod resolver;
pub mod storage;
pub mod streak;

// Re-export commonly used types
pub use classifier::{FixedLevel, LevelClassifier, NoClassifier, PresetLevels};
pub use engine::{DuelResolution, RatingEngine};
pub use storage::{InMemoryRankingStore, JsonFileRankingStore, RankingStore};
