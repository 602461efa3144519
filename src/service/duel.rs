//! Duel recording service
//!
//! Ties the rating engine to a [`RankingStore`]: load a consistent snapshot,
//! resolve the duel, and persist the result only when asked to commit.

use crate::error::Result;
use crate::rating::{DuelResolution, LevelClassifier, RankingStore, RatingEngine};
use crate::types::{DuelOutcome, RankingTable, Weapon};
use std::time::Instant;
use tracing::{error, info};

/// Resolves duels against a store and writes confirmed results back
pub struct DuelService<S: RankingStore> {
    engine: RatingEngine,
    store: S,
}

impl<S: RankingStore> DuelService<S> {
    pub fn new(engine: RatingEngine, store: S) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &RatingEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve `outcome` against the stored snapshot without writing anything
    pub fn preview(
        &self,
        outcome: &DuelOutcome,
        classifier: &dyn LevelClassifier,
    ) -> Result<DuelResolution> {
        let start_time = Instant::now();
        let book = self.store.load_book()?;
        let history = self.store.load_history()?;

        match self.engine.resolve(&book, &history, outcome, classifier) {
            Ok(resolution) => {
                info!(
                    "Previewed {} duel '{}' beat '{}' in {:.2}ms",
                    outcome.weapon,
                    outcome.winner,
                    outcome.loser,
                    start_time.elapsed().as_secs_f64() * 1000.0
                );
                Ok(resolution)
            }
            Err(e) => {
                error!(
                    "Duel '{}' vs '{}' ({}) rejected: {}",
                    outcome.winner, outcome.loser, outcome.weapon, e
                );
                Err(e)
            }
        }
    }

    /// Persist a previously previewed resolution
    pub fn commit(&self, resolution: &DuelResolution) -> Result<()> {
        self.store.save_table(&resolution.table)?;
        self.store
            .append_history(&resolution.duel_entry, &resolution.rating_entries)?;

        info!(
            "Recorded {} duel on {}: '{}' beat '{}'",
            resolution.outcome.weapon,
            resolution.outcome.date,
            resolution.outcome.winner,
            resolution.outcome.loser
        );
        Ok(())
    }

    /// Preview and commit in one step
    pub fn record(
        &self,
        outcome: &DuelOutcome,
        classifier: &dyn LevelClassifier,
    ) -> Result<DuelResolution> {
        let resolution = self.preview(outcome, classifier)?;
        self.commit(&resolution)?;
        Ok(resolution)
    }

    pub fn table(&self, weapon: Weapon) -> Result<RankingTable> {
        self.store.load_table(weapon)
    }
}
