//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use weapon_rankings::rating::LevelClassifier;
use weapon_rankings::types::{
    DuelOutcome, Level, RankingBook, RankingRow, RankingTable, Weapon,
};

/// Classifier that answers with a fixed level and remembers who it was asked about
#[derive(Debug, Default)]
pub struct RecordingClassifier {
    level: Option<Level>,
    asked: Arc<Mutex<Vec<(String, Weapon)>>>,
}

impl RecordingClassifier {
    pub fn answering(level: Level) -> Self {
        Self {
            level: Some(level),
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    /// Names asked about, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }
}

impl LevelClassifier for RecordingClassifier {
    fn classify(&self, name: &str, weapon: Weapon) -> Option<Level> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push((name.to_string(), weapon));
        }
        self.level
    }
}

/// Graduated, streak-free row
pub fn ranked_row(name: &str, weapon: Weapon, rating: f64) -> RankingRow {
    RankingRow {
        name: name.to_string(),
        weapon,
        original_rating: rating,
        current_rating: rating,
        level: Level::Experienced,
        duel_count: 12,
        provisional_duels_remaining: 0,
        current_streak: 0,
        longest_streak: 0,
    }
}

/// A book with empty tables except `weapon`, which holds `rows`
pub fn book_with(weapon: Weapon, rows: Vec<RankingRow>) -> RankingBook {
    let mut book = RankingBook::with_all_weapons();
    book.insert(RankingTable::with_rows(weapon, rows));
    book
}

/// `count` ranked fencers named `fencer_0..`, spread between 900 and 1100
pub fn spread_table(weapon: Weapon, count: usize) -> Vec<RankingRow> {
    (0..count)
        .map(|i| {
            let rating = 900.0 + 200.0 * i as f64 / count.max(1) as f64;
            ranked_row(&format!("fencer_{}", i), weapon, rating)
        })
        .collect()
}

pub fn duel(winner: &str, loser: &str, weapon: Weapon) -> DuelOutcome {
    DuelOutcome {
        winner: winner.to_string(),
        loser: loser.to_string(),
        weapon,
        date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
    }
}

/// Fresh directory under the system temp dir, removed on drop
pub struct TempDataDir {
    pub path: PathBuf,
}

impl TempDataDir {
    pub fn new() -> Self {
        let path =
            std::env::temp_dir().join(format!("weapon-rankings-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }
}

impl Drop for TempDataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
