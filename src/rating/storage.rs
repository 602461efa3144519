//! Ranking storage interface and implementations
//!
//! This module defines the interface for persisting and retrieving weapon
//! tables and the append-only duel and rating-history logs, with an in-memory
//! implementation and one backed by JSON files in a data directory.

use crate::error::{RankingError, Result};
use crate::types::{
    DuelLogEntry, HistoryLog, RankingBook, RankingRow, RankingTable, RatingHistoryEntry, Weapon,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

pub const DUEL_LOG_FILE: &str = "duel_log.json";
pub const RATING_HISTORY_FILE: &str = "rating_history.json";

/// Trait for ranking storage operations
pub trait RankingStore: Send + Sync {
    /// Get the current table for a weapon; a weapon with no data yields an empty table
    fn load_table(&self, weapon: Weapon) -> Result<RankingTable>;

    /// Replace the stored table for `table.weapon`
    fn save_table(&self, table: &RankingTable) -> Result<()>;

    /// Get both history logs
    fn load_history(&self) -> Result<HistoryLog>;

    /// Append one duel and its rating-history rows
    fn append_history(&self, duel: &DuelLogEntry, ratings: &[RatingHistoryEntry]) -> Result<()>;

    /// Tables for every weapon
    fn load_book(&self) -> Result<RankingBook> {
        let mut book = RankingBook::new();
        for weapon in Weapon::ALL {
            book.insert(self.load_table(weapon)?);
        }
        Ok(book)
    }
}

/// In-memory ranking storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRankingStore {
    book: RwLock<RankingBook>,
    history: RwLock<HistoryLog>,
}

impl InMemoryRankingStore {
    /// Create a new in-memory store with an empty table for every weapon
    pub fn new() -> Self {
        Self {
            book: RwLock::new(RankingBook::with_all_weapons()),
            history: RwLock::new(HistoryLog::new()),
        }
    }

    /// Start from an existing snapshot
    pub fn with_snapshot(book: RankingBook, history: HistoryLog) -> Self {
        Self {
            book: RwLock::new(book),
            history: RwLock::new(history),
        }
    }

    fn lock_error(kind: &str) -> RankingError {
        RankingError::InternalError {
            message: format!("Failed to acquire {} lock", kind),
        }
    }
}

impl RankingStore for InMemoryRankingStore {
    fn load_table(&self, weapon: Weapon) -> Result<RankingTable> {
        let book = self
            .book
            .read()
            .map_err(|_| Self::lock_error("rankings read"))?;

        Ok(book
            .table(weapon)
            .cloned()
            .unwrap_or_else(|_| RankingTable::new(weapon)))
    }

    fn save_table(&self, table: &RankingTable) -> Result<()> {
        let mut book = self
            .book
            .write()
            .map_err(|_| Self::lock_error("rankings write"))?;

        book.insert(table.clone());
        Ok(())
    }

    fn load_history(&self) -> Result<HistoryLog> {
        let history = self
            .history
            .read()
            .map_err(|_| Self::lock_error("history read"))?;

        Ok(history.clone())
    }

    fn append_history(&self, duel: &DuelLogEntry, ratings: &[RatingHistoryEntry]) -> Result<()> {
        let mut history = self
            .history
            .write()
            .map_err(|_| Self::lock_error("history write"))?;

        history.duels.push(duel.clone());
        history.ratings.extend_from_slice(ratings);
        Ok(())
    }
}

/// JSON file storage: one `<weapon>_rankings.json` per weapon plus the two logs
#[derive(Debug, Clone)]
pub struct JsonFileRankingStore {
    data_dir: PathBuf,
}

impl JsonFileRankingStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| RankingError::StorageError {
            message: format!("Cannot create data directory {}: {}", data_dir.display(), e),
        })?;

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn table_path(&self, weapon: Weapon) -> PathBuf {
        self.data_dir.join(format!("{}_rankings.json", weapon))
    }

    fn read_list<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} does not exist yet, starting empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(RankingError::StorageError {
                    message: format!("Cannot read {}: {}", path.display(), e),
                }
                .into())
            }
        };

        let items = serde_json::from_str(&contents).map_err(|e| RankingError::StorageError {
            message: format!("Malformed {}: {}", path.display(), e),
        })?;
        Ok(items)
    }

    /// Write through a sibling temp file so a failed write never truncates data
    fn write_list<T: Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(items).map_err(|e| RankingError::StorageError {
            message: format!("Cannot serialize {}: {}", path.display(), e),
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|e| RankingError::StorageError {
                message: format!("Cannot write {}: {}", path.display(), e),
            })?;

        debug!("Wrote {} entries to {}", items.len(), path.display());
        Ok(())
    }
}

impl RankingStore for JsonFileRankingStore {
    fn load_table(&self, weapon: Weapon) -> Result<RankingTable> {
        let rows: Vec<RankingRow> = self.read_list(&self.table_path(weapon))?;
        if let Some(row) = rows.iter().find(|row| row.weapon != weapon) {
            return Err(RankingError::StorageError {
                message: format!(
                    "Row for '{}' in the {} table is tagged {}",
                    row.name, weapon, row.weapon
                ),
            }
            .into());
        }

        let mut seen = HashSet::new();
        if let Some(row) = rows.iter().find(|row| !seen.insert(row.name.as_str())) {
            return Err(RankingError::StorageError {
                message: format!("'{}' appears more than once in the {} table", row.name, weapon),
            }
            .into());
        }

        Ok(RankingTable::with_rows(weapon, rows))
    }

    fn save_table(&self, table: &RankingTable) -> Result<()> {
        self.write_list(&self.table_path(table.weapon), &table.rows)
    }

    fn load_history(&self) -> Result<HistoryLog> {
        Ok(HistoryLog {
            duels: self.read_list(&self.data_dir.join(DUEL_LOG_FILE))?,
            ratings: self.read_list(&self.data_dir.join(RATING_HISTORY_FILE))?,
        })
    }

    fn append_history(&self, duel: &DuelLogEntry, ratings: &[RatingHistoryEntry]) -> Result<()> {
        let duel_path = self.data_dir.join(DUEL_LOG_FILE);
        let mut duels: Vec<DuelLogEntry> = self.read_list(&duel_path)?;
        duels.push(duel.clone());
        self.write_list(&duel_path, &duels)?;

        let ratings_path = self.data_dir.join(RATING_HISTORY_FILE);
        let mut history: Vec<RatingHistoryEntry> = self.read_list(&ratings_path)?;
        history.extend_from_slice(ratings);
        self.write_list(&ratings_path, &history)
    }
}
