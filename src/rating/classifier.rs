//! Level classification for first-time fencers
//!
//! The engine never decides a new fencer's level itself. It asks a
//! [`LevelClassifier`], which may prompt a human, read presets, or decline.

use crate::types::{Level, Weapon};
use std::collections::HashMap;

/// Supplies the self-reported level of a fencer with no ranking row yet
#[cfg_attr(test, mockall::automock)]
pub trait LevelClassifier {
    /// `None` means no level could be obtained for this fencer
    fn classify(&self, name: &str, weapon: Weapon) -> Option<Level>;
}

/// Classifier that never answers; resolving an unranked fencer fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassifier;

impl LevelClassifier for NoClassifier {
    fn classify(&self, _name: &str, _weapon: Weapon) -> Option<Level> {
        None
    }
}

/// Same level for every new fencer
#[derive(Debug, Clone, Copy)]
pub struct FixedLevel(pub Level);

impl LevelClassifier for FixedLevel {
    fn classify(&self, _name: &str, _weapon: Weapon) -> Option<Level> {
        Some(self.0)
    }
}

/// Levels known ahead of time, keyed by fencer name
#[derive(Debug, Clone, Default)]
pub struct PresetLevels {
    levels: HashMap<String, Level>,
}

impl PresetLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, level: Level) -> Self {
        self.levels.insert(name.into(), level);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, level: Level) {
        self.levels.insert(name.into(), level);
    }
}

impl LevelClassifier for PresetLevels {
    fn classify(&self, name: &str, _weapon: Weapon) -> Option<Level> {
        self.levels.get(name).copied()
    }
}
