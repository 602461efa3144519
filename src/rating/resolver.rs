//! Participant resolution
//!
//! Turns a fencer name and the current weapon table into a [`ParticipantState`]:
//! either the stored row, or a freshly seeded provisional fencer.

use crate::config::{RatingConfig, SeedPolicy};
use crate::error::{RankingError, Result};
use crate::rating::classifier::LevelClassifier;
use crate::types::{Level, ParticipantOrigin, ParticipantState, RankingRow, RankingTable};
use crate::utils::{median, quantile};
use tracing::debug;

/// Rating a new fencer of `level` starts with, given the current table
pub fn seed_rating(table: &RankingTable, level: Level, config: &RatingConfig) -> f64 {
    let ratings = table.ratings();
    let seed = match config.seed_policy {
        SeedPolicy::Quantile => quantile(&ratings, level.seed_quantile()),
        SeedPolicy::Median => median(&ratings),
    };

    config
        .precision
        .round(seed.unwrap_or(config.initial_rating))
}

/// Provisional duels a new fencer must complete, scaled by table size
pub fn provisional_quota(table: &RankingTable, config: &RatingConfig) -> u32 {
    if !config.probation.enabled {
        return 0;
    }

    (config.probation.quota * table.len() as f64).round_ties_even() as u32
}

/// Resolve `name` against `table` for a duel with `opponent`.
///
/// The `new_*` fields start equal to their `prior_*` counterparts, except
/// `new_duel_count`; later pipeline steps fill them in.
pub fn resolve_participant(
    name: &str,
    opponent: &str,
    table: &RankingTable,
    config: &RatingConfig,
    classifier: &dyn LevelClassifier,
) -> Result<ParticipantState> {
    let state = match table.find(name) {
        Some(row) => from_row(row, opponent),
        None => {
            let level = classifier.classify(name, table.weapon).ok_or_else(|| {
                RankingError::MissingLevelClassification {
                    name: name.to_string(),
                    weapon: table.weapon.to_string(),
                }
            })?;
            let seed = seed_rating(table, level, config);
            let quota = provisional_quota(table, config);

            debug!(
                "Seeding new {} fencer '{}' ({}) at {} with {} provisional duels",
                table.weapon, name, level, seed, quota
            );

            ParticipantState {
                name: name.to_string(),
                opponent_name: opponent.to_string(),
                origin: ParticipantOrigin::New { seed },
                level,
                is_provisional: quota > 0,
                original_rating: seed,
                prior_rating: seed,
                new_rating: seed,
                prior_duel_count: 0,
                new_duel_count: 1,
                prior_provisional_duels_remaining: quota,
                new_provisional_duels_remaining: quota,
                prior_streak: 0,
                new_streak: 0,
                longest_streak: 0,
            }
        }
    };

    Ok(state)
}

fn from_row(row: &RankingRow, opponent: &str) -> ParticipantState {
    ParticipantState {
        name: row.name.clone(),
        opponent_name: opponent.to_string(),
        origin: ParticipantOrigin::Existing,
        level: row.level,
        is_provisional: row.provisional_duels_remaining > 0,
        original_rating: row.original_rating,
        prior_rating: row.current_rating,
        new_rating: row.current_rating,
        prior_duel_count: row.duel_count,
        new_duel_count: row.duel_count + 1,
        prior_provisional_duels_remaining: row.provisional_duels_remaining,
        new_provisional_duels_remaining: row.provisional_duels_remaining,
        prior_streak: row.current_streak,
        new_streak: row.current_streak,
        longest_streak: row.longest_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::classifier::{FixedLevel, MockLevelClassifier, NoClassifier};
    use crate::types::Weapon;

    fn table_of(ratings: &[f64]) -> RankingTable {
        let rows = ratings
            .iter()
            .enumerate()
            .map(|(i, rating)| RankingRow {
                name: format!("fencer{}", i),
                weapon: Weapon::Foil,
                original_rating: *rating,
                current_rating: *rating,
                level: Level::Experienced,
                duel_count: 5,
                provisional_duels_remaining: 0,
                current_streak: 1,
                longest_streak: 2,
            })
            .collect();
        RankingTable::with_rows(Weapon::Foil, rows)
    }

    #[test]
    fn test_existing_fencer_loaded_from_row() {
        let table = table_of(&[1100.0, 1000.0]);
        let state = resolve_participant(
            "fencer0",
            "fencer1",
            &table,
            &RatingConfig::default(),
            &NoClassifier,
        )
        .unwrap();

        assert_eq!(state.origin, ParticipantOrigin::Existing);
        assert_eq!(state.prior_rating, 1100.0);
        assert_eq!(state.prior_duel_count, 5);
        assert_eq!(state.new_duel_count, 6);
        assert_eq!(state.prior_streak, 1);
        assert_eq!(state.longest_streak, 2);
        assert_eq!(state.opponent_name, "fencer1");
        assert!(!state.is_provisional);
    }

    #[test]
    fn test_new_fencer_gets_quota_and_median_seed() {
        let ratings: Vec<f64> = (0..10).map(|i| 1000.0 + 10.0 * i as f64).collect();
        let table = table_of(&ratings);

        let state = resolve_participant(
            "newcomer",
            "fencer0",
            &table,
            &RatingConfig::default(),
            &FixedLevel(Level::Beginner),
        )
        .unwrap();

        assert!(state.is_new());
        assert!(state.is_provisional);
        assert_eq!(state.prior_provisional_duels_remaining, 4);
        assert_eq!(state.prior_rating, 1045.0);
        assert_eq!(state.original_rating, state.prior_rating);
        assert_eq!(state.prior_duel_count, 0);
        assert_eq!(state.new_duel_count, 1);
        assert_eq!(state.level, Level::Beginner);
    }

    #[test]
    fn test_quantile_seed_depends_on_level() {
        let table = table_of(&[900.0, 1000.0, 1100.0, 1200.0, 1300.0]);
        let config = RatingConfig::classic();

        assert_eq!(seed_rating(&table, Level::Beginner, &config), 980.0);
        assert_eq!(seed_rating(&table, Level::Experienced, &config), 1100.0);
        assert_eq!(seed_rating(&table, Level::Advanced, &config), 1200.0);
    }

    #[test]
    fn test_empty_table_seeds_initial_rating() {
        let table = RankingTable::new(Weapon::Foil);
        let config = RatingConfig::default();

        let state =
            resolve_participant("first", "second", &table, &config, &FixedLevel(Level::Advanced))
                .unwrap();

        assert_eq!(state.prior_rating, config.initial_rating);
        assert_eq!(state.prior_provisional_duels_remaining, 0);
        assert!(!state.is_provisional);
    }

    #[test]
    fn test_probation_disabled_means_no_quota() {
        let table = table_of(&[1000.0; 10]);
        let state = resolve_participant(
            "newcomer",
            "fencer0",
            &table,
            &RatingConfig::classic(),
            &FixedLevel(Level::Experienced),
        )
        .unwrap();

        assert_eq!(state.prior_provisional_duels_remaining, 0);
        assert!(!state.is_provisional);
    }

    #[test]
    fn test_missing_level_is_an_error() {
        let table = table_of(&[1000.0]);
        let err = resolve_participant(
            "stranger",
            "fencer0",
            &table,
            &RatingConfig::default(),
            &NoClassifier,
        )
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<RankingError>(),
            Some(&RankingError::MissingLevelClassification {
                name: "stranger".to_string(),
                weapon: "foil".to_string(),
            })
        );
    }

    #[test]
    fn test_classifier_only_asked_for_new_fencers() {
        let table = table_of(&[1000.0, 1100.0]);
        let mut classifier = MockLevelClassifier::new();
        classifier
            .expect_classify()
            .withf(|name, weapon| name.to_string() == "newcomer" && *weapon == Weapon::Foil)
            .times(1)
            .return_const(Some(Level::Experienced));

        let config = RatingConfig::default();
        resolve_participant("fencer0", "newcomer", &table, &config, &classifier).unwrap();
        resolve_participant("newcomer", "fencer0", &table, &config, &classifier).unwrap();
    }
}
