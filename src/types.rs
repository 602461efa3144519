//! Common types used throughout the rankings engine

use crate::error::RankingError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Fencer name, unique within one weapon's ranking table
pub type FencerName = String;

/// Weapon category; every weapon has its own ranking table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weapon {
    Foil,
    Epee,
    Sabre,
}

impl Weapon {
    pub const ALL: [Weapon; 3] = [Weapon::Foil, Weapon::Epee, Weapon::Sabre];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weapon::Foil => "foil",
            Weapon::Epee => "epee",
            Weapon::Sabre => "sabre",
        }
    }
}

impl std::fmt::Display for Weapon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weapon {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foil" => Ok(Weapon::Foil),
            "epee" | "épée" => Ok(Weapon::Epee),
            "sabre" | "saber" => Ok(Weapon::Sabre),
            _ => Err(RankingError::UnknownWeapon {
                weapon: s.to_string(),
            }),
        }
    }
}

/// Self-reported experience level, asked only on a fencer's first duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Experienced,
    Advanced,
}

impl Level {
    /// Quantile of the current table used to seed a new fencer of this level
    pub fn seed_quantile(&self) -> f64 {
        match self {
            Level::Beginner => 0.2,
            Level::Experienced => 0.5,
            Level::Advanced => 0.75,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Beginner => write!(f, "beginner"),
            Level::Experienced => write!(f, "experienced"),
            Level::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Level {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "experienced" => Ok(Level::Experienced),
            "advanced" => Ok(Level::Advanced),
            _ => Err(RankingError::UnknownLevel {
                level: s.to_string(),
            }),
        }
    }
}

/// One persisted row of a weapon ranking table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub name: FencerName,
    pub weapon: Weapon,
    pub original_rating: f64,
    pub current_rating: f64,
    pub level: Level,
    pub duel_count: u32,
    pub provisional_duels_remaining: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Ranking table for a single weapon, kept sorted by current rating descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingTable {
    pub weapon: Weapon,
    pub rows: Vec<RankingRow>,
}

impl RankingTable {
    pub fn new(weapon: Weapon) -> Self {
        Self {
            weapon,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(weapon: Weapon, rows: Vec<RankingRow>) -> Self {
        let mut table = Self { weapon, rows };
        table.sort_by_rating();
        table
    }

    pub fn find(&self, name: &str) -> Option<&RankingRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Current ratings in table order
    pub fn ratings(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.current_rating).collect()
    }

    /// Replace the row with the same name, or append a new one
    pub fn upsert(&mut self, row: RankingRow) {
        match self.rows.iter_mut().find(|existing| existing.name == row.name) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Stable sort by current rating, highest first
    pub fn sort_by_rating(&mut self) {
        self.rows
            .sort_by(|a, b| b.current_rating.total_cmp(&a.current_rating));
    }
}

/// Ranking tables for every weapon the caller knows about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingBook {
    tables: BTreeMap<Weapon, RankingTable>,
}

impl RankingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A book with an empty table for every weapon
    pub fn with_all_weapons() -> Self {
        let mut book = Self::new();
        for weapon in Weapon::ALL {
            book.insert(RankingTable::new(weapon));
        }
        book
    }

    pub fn insert(&mut self, table: RankingTable) {
        self.tables.insert(table.weapon, table);
    }

    /// Table for `weapon`, failing when the caller supplied none
    pub fn table(&self, weapon: Weapon) -> crate::error::Result<&RankingTable> {
        self.tables.get(&weapon).ok_or_else(|| {
            RankingError::UnknownWeapon {
                weapon: weapon.to_string(),
            }
            .into()
        })
    }

    pub fn weapons(&self) -> impl Iterator<Item = Weapon> + '_ {
        self.tables.keys().copied()
    }
}

/// Ephemeral input: who beat whom, with which weapon, on which day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub winner: FencerName,
    pub loser: FencerName,
    pub weapon: Weapon,
    pub date: NaiveDate,
}

/// Append-only duel log row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelLogEntry {
    pub winner: FencerName,
    pub loser: FencerName,
    pub weapon: Weapon,
    pub date: NaiveDate,
}

/// Append-only rating history row, one per fencer per duel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingHistoryEntry {
    pub name: FencerName,
    pub opponent: FencerName,
    pub weapon: Weapon,
    pub original_rating: f64,
    pub old_rating: f64,
    pub new_rating: f64,
    pub rating_delta: f64,
    pub date: NaiveDate,
    pub streak: u32,
    pub longest_streak: u32,
}

/// Both append-only logs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    pub duels: Vec<DuelLogEntry>,
    pub ratings: Vec<RatingHistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` has already met `opponent` with `weapon`
    pub fn has_met(&self, name: &str, opponent: &str, weapon: Weapon) -> bool {
        self.ratings
            .iter()
            .any(|entry| entry.weapon == weapon && entry.name == name && entry.opponent == opponent)
    }
}

/// Where a resolved participant came from
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipantOrigin {
    /// Found under their name in the weapon table
    Existing,
    /// First duel with this weapon; rating seeded from the table
    New { seed: f64 },
}

/// Per-duel view of one fencer, built from the table snapshot and never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantState {
    pub name: FencerName,
    pub opponent_name: FencerName,
    pub origin: ParticipantOrigin,
    pub level: Level,
    pub is_provisional: bool,
    pub original_rating: f64,
    pub prior_rating: f64,
    pub new_rating: f64,
    pub prior_duel_count: u32,
    pub new_duel_count: u32,
    pub prior_provisional_duels_remaining: u32,
    pub new_provisional_duels_remaining: u32,
    pub prior_streak: u32,
    pub new_streak: u32,
    pub longest_streak: u32,
}

impl ParticipantState {
    pub fn is_new(&self) -> bool {
        matches!(self.origin, ParticipantOrigin::New { .. })
    }

    /// Table row reflecting this participant after the duel
    pub fn to_row(&self, weapon: Weapon) -> RankingRow {
        RankingRow {
            name: self.name.clone(),
            weapon,
            original_rating: self.original_rating,
            current_rating: self.new_rating,
            level: self.level,
            duel_count: self.new_duel_count,
            provisional_duels_remaining: self.new_provisional_duels_remaining,
            current_streak: self.new_streak,
            longest_streak: self.longest_streak,
        }
    }
}
