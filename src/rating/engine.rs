//! Duel resolution pipeline
//!
//! [`RatingEngine::resolve`] runs, in order: participant resolution, probation
//! countdown, win-streak update, Elo update, then decay and floor over the
//! whole weapon table. It never mutates its inputs; the caller decides whether
//! to keep the returned [`DuelResolution`].

use crate::config::RatingConfig;
use crate::error::{RankingError, Result};
use crate::rating::classifier::LevelClassifier;
use crate::rating::decay::decay_and_floor;
use crate::rating::elo::{compute_elo_update, EloInput, EloUpdate};
use crate::rating::probation::remaining_after_duel;
use crate::rating::resolver::resolve_participant;
use crate::rating::streak::update_streaks;
use crate::types::{
    DuelLogEntry, DuelOutcome, HistoryLog, ParticipantState, RankingBook, RankingTable,
    RatingHistoryEntry,
};
use tracing::{debug, info};

/// Everything produced by resolving one duel
#[derive(Debug, Clone, PartialEq)]
pub struct DuelResolution {
    pub outcome: DuelOutcome,
    pub winner: ParticipantState,
    pub loser: ParticipantState,
    pub elo: EloUpdate,
    /// Whether the win moved the streak counters
    pub streak_extended: bool,
    /// Complete post-duel table for the outcome's weapon
    pub table: RankingTable,
    pub duel_entry: DuelLogEntry,
    /// Winner first, then loser
    pub rating_entries: [RatingHistoryEntry; 2],
}

impl DuelResolution {
    /// Replace the weapon table and append the history rows
    pub fn apply(&self, book: &mut RankingBook, history: &mut HistoryLog) {
        book.insert(self.table.clone());
        history.duels.push(self.duel_entry.clone());
        history.ratings.extend(self.rating_entries.iter().cloned());
    }
}

/// Configured duel resolver
#[derive(Debug, Clone)]
pub struct RatingEngine {
    config: RatingConfig,
}

impl RatingEngine {
    /// Create a new engine, rejecting invalid configuration
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Resolve `outcome` against a snapshot of the tables and history
    pub fn resolve(
        &self,
        book: &RankingBook,
        history: &HistoryLog,
        outcome: &DuelOutcome,
        classifier: &dyn LevelClassifier,
    ) -> Result<DuelResolution> {
        if outcome.winner == outcome.loser {
            return Err(RankingError::SelfDuel {
                name: outcome.winner.clone(),
            }
            .into());
        }

        let weapon = outcome.weapon;
        let prior_table = book.table(weapon)?;
        let config = &self.config;

        let mut winner =
            resolve_participant(&outcome.winner, &outcome.loser, prior_table, config, classifier)?;
        let mut loser =
            resolve_participant(&outcome.loser, &outcome.winner, prior_table, config, classifier)?;

        for participant in [&winner, &loser] {
            ensure_positive_rating(participant)?;
        }

        if config.probation.enabled {
            winner.new_provisional_duels_remaining = remaining_after_duel(&winner, history, weapon);
            loser.new_provisional_duels_remaining = remaining_after_duel(&loser, history, weapon);
        }

        let streaks = update_streaks(&winner, &loser, &config.streak);
        winner.new_streak = streaks.winner_streak;
        winner.longest_streak = streaks.winner_longest;
        loser.new_streak = streaks.loser_streak;
        loser.longest_streak = streaks.loser_longest;

        let elo = compute_elo_update(
            &EloInput {
                winner_prior: winner.prior_rating,
                loser_prior: loser.prior_rating,
                winner_provisional: winner.is_provisional,
                loser_provisional: loser.is_provisional,
                winner_streak: if config.streak.enabled {
                    winner.new_streak
                } else {
                    0
                },
            },
            config,
        )?;
        winner.new_rating = elo.winner_new;
        loser.new_rating = elo.loser_new;

        debug!(
            "{} duel {} vs {}: expected {:.3}, deltas {:+.3}/{:+.3}, bounties {:.3}/{:.3}",
            weapon,
            winner.name,
            loser.name,
            elo.winner_expected,
            elo.winner_delta,
            elo.loser_delta,
            elo.winner_bounty,
            elo.loser_bounty
        );

        let table = decay_and_floor(
            prior_table,
            &[winner.to_row(weapon), loser.to_row(weapon)],
            config,
        );
        for participant in [&mut winner, &mut loser] {
            if let Some(row) = table.find(&participant.name) {
                participant.new_rating = row.current_rating;
            }
        }

        let duel_entry = DuelLogEntry {
            winner: winner.name.clone(),
            loser: loser.name.clone(),
            weapon,
            date: outcome.date,
        };
        let rating_entries = [
            self.history_entry(&winner, outcome),
            self.history_entry(&loser, outcome),
        ];

        info!(
            "Resolved {} duel: {} {} -> {}, {} {} -> {}",
            weapon,
            winner.name,
            winner.prior_rating,
            winner.new_rating,
            loser.name,
            loser.prior_rating,
            loser.new_rating
        );

        Ok(DuelResolution {
            outcome: outcome.clone(),
            winner,
            loser,
            elo,
            streak_extended: streaks.extended,
            table,
            duel_entry,
            rating_entries,
        })
    }

    fn history_entry(
        &self,
        participant: &ParticipantState,
        outcome: &DuelOutcome,
    ) -> RatingHistoryEntry {
        RatingHistoryEntry {
            name: participant.name.clone(),
            opponent: participant.opponent_name.clone(),
            weapon: outcome.weapon,
            original_rating: participant.original_rating,
            old_rating: participant.prior_rating,
            new_rating: participant.new_rating,
            rating_delta: self
                .config
                .precision
                .round(participant.new_rating - participant.prior_rating),
            date: outcome.date,
            streak: participant.new_streak,
            longest_streak: participant.longest_streak,
        }
    }
}

fn ensure_positive_rating(participant: &ParticipantState) -> Result<()> {
    let rating = participant.prior_rating;
    if rating > 0.0 && rating.is_finite() {
        return Ok(());
    }

    Err(RankingError::InvalidPriorRating {
        name: participant.name.clone(),
        rating,
    }
    .into())
}
