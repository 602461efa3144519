//! Elo update with probation dampening, streak bonus and underdog bounty
//!
//! All arithmetic happens on prior ratings; the result is rounded to the
//! configured precision only once, at the very end.

use crate::config::RatingConfig;
use crate::error::{RankingError, Result};
use crate::utils::sigmoid;
use serde::{Deserialize, Serialize};

/// Everything the calculator needs to know about one duel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EloInput {
    pub winner_prior: f64,
    pub loser_prior: f64,
    pub winner_provisional: bool,
    pub loser_provisional: bool,
    /// Winner's streak after this duel
    pub winner_streak: u32,
}

/// Intermediate and final values of one Elo update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EloUpdate {
    pub winner_expected: f64,
    pub loser_expected: f64,
    /// Winner delta after probation and streak multipliers
    pub winner_delta: f64,
    /// Loser delta after probation multiplier; never positive
    pub loser_delta: f64,
    pub winner_bounty: f64,
    pub loser_bounty: f64,
    pub winner_new: f64,
    pub loser_new: f64,
}

/// Probability that a fencer rated `rating` beats one rated `opponent`
pub fn expected_score(rating: f64, opponent: f64, beta: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / beta))
}

/// Winner-only multiplier in `[1, 1.5)`, growing with the streak
pub fn streak_multiplier(streak: u32, k: f64) -> f64 {
    1.0 + (sigmoid(streak as f64 / k) - 0.5)
}

/// Bounty for a fencer rated `own` who met one rated `opponent`.
///
/// Non-negative for positive ratings and larger the more the opponent
/// outranks `own`; capped below `bounty_constant / 2`.
pub fn underdog_bounty(own: f64, opponent: f64, bounty_constant: f64) -> f64 {
    (sigmoid(opponent / own) - 0.5) * bounty_constant
}

/// Compute both new ratings for a decided duel.
///
/// The loser is clamped to the floor before the bounty is added, so a
/// clamped loser may end slightly above the floor.
///
/// Priors must be positive and finite. `EloInput` carries no names, so an
/// `InvalidPriorRating` from here names the side (`"winner"` or `"loser"`);
/// [`crate::rating::RatingEngine::resolve`] rejects bad priors by fencer name
/// before it gets this far.
pub fn compute_elo_update(input: &EloInput, config: &RatingConfig) -> Result<EloUpdate> {
    for (side, rating) in [("winner", input.winner_prior), ("loser", input.loser_prior)] {
        if !(rating > 0.0) || !rating.is_finite() {
            return Err(RankingError::InvalidPriorRating {
                name: side.to_string(),
                rating,
            }
            .into());
        }
    }

    let winner_expected = expected_score(input.winner_prior, input.loser_prior, config.beta);
    let loser_expected = 1.0 - winner_expected;

    let winner_delta = config.k
        * (1.0 - winner_expected)
        * config.probation_multiplier(input.winner_provisional)
        * streak_multiplier(input.winner_streak, config.k);
    let loser_delta =
        config.k * (0.0 - loser_expected) * config.probation_multiplier(input.loser_provisional);

    let winner_bounty =
        underdog_bounty(input.winner_prior, input.loser_prior, config.bounty_constant);
    let loser_bounty =
        underdog_bounty(input.loser_prior, input.winner_prior, config.bounty_constant);

    let winner_new = config
        .precision
        .round(input.winner_prior + winner_delta + winner_bounty);
    let loser_raw = (input.loser_prior + loser_delta).max(config.floor);
    let loser_new = config.precision.round(loser_raw + loser_bounty);

    Ok(EloUpdate {
        winner_expected,
        loser_expected,
        winner_delta,
        loser_delta,
        winner_bounty,
        loser_bounty,
        winner_new,
        loser_new,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(winner: f64, loser: f64) -> EloInput {
        EloInput {
            winner_prior: winner,
            loser_prior: loser,
            winner_provisional: false,
            loser_provisional: false,
            winner_streak: 0,
        }
    }

    #[test]
    fn test_expected_score_symmetry() {
        let e = expected_score(1200.0, 1000.0, 400.0);
        assert!((e - 0.7597).abs() < 1e-4);
        assert!((e + expected_score(1000.0, 1200.0, 400.0) - 1.0).abs() < 1e-12);
        assert_eq!(expected_score(1500.0, 1500.0, 400.0), 0.5);
    }

    #[test]
    fn test_reference_scenario() {
        let config = RatingConfig::default();
        let update = compute_elo_update(&input(1200.0, 1000.0), &config).unwrap();

        assert!((update.winner_expected - 0.76).abs() < 0.005);
        assert!((update.winner_delta - 4.8).abs() < 0.01);
        assert!((update.loser_delta + 4.8).abs() < 0.01);
        assert!(update.winner_bounty > 0.0);
        assert!(update.loser_bounty > update.winner_bounty);

        // 1200 + 4.806 + 1.971 and 1000 - 4.806 + 2.685
        assert_eq!(update.winner_new, 1206.8);
        assert_eq!(update.loser_new, 997.9);
    }

    #[test]
    fn test_classic_rounds_to_integer() {
        let update = compute_elo_update(&input(1200.0, 1000.0), &RatingConfig::classic()).unwrap();
        assert_eq!(update.winner_new, 1207.0);
        assert_eq!(update.loser_new, 998.0);
    }

    #[test]
    fn test_probation_dampens_each_side_independently() {
        let config = RatingConfig::default();
        let plain = compute_elo_update(&input(1000.0, 1000.0), &config).unwrap();

        let mut provisional = input(1000.0, 1000.0);
        provisional.loser_provisional = true;
        let damped = compute_elo_update(&provisional, &config).unwrap();

        assert_eq!(damped.winner_delta, plain.winner_delta);
        assert!((damped.loser_delta - plain.loser_delta * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_streak_bonus_grows_and_saturates() {
        assert_eq!(streak_multiplier(0, 20.0), 1.0);
        assert!(streak_multiplier(5, 20.0) > 1.0);
        assert!(streak_multiplier(10, 20.0) > streak_multiplier(5, 20.0));
        assert!(streak_multiplier(10_000, 20.0) <= 1.5);

        let config = RatingConfig::default();
        let mut on_streak = input(1000.0, 1000.0);
        on_streak.winner_streak = 6;
        let plain = compute_elo_update(&input(1000.0, 1000.0), &config).unwrap();
        let bonus = compute_elo_update(&on_streak, &config).unwrap();
        assert!(bonus.winner_delta > plain.winner_delta);
        assert_eq!(bonus.loser_delta, plain.loser_delta);
    }

    #[test]
    fn test_bounty_non_negative_and_widens_with_gap() {
        let close = underdog_bounty(1000.0, 1050.0, 10.0);
        let far = underdog_bounty(500.0, 2000.0, 10.0);
        assert!(close > 0.0);
        assert!(far > close);
        assert!(far < 5.0);
        assert!(underdog_bounty(2000.0, 500.0, 10.0) >= 0.0);
    }

    #[test]
    fn test_loser_floor_applied_before_bounty() {
        let mut config = RatingConfig::default();
        config.floor = 10.0;
        config.k = 100.0;

        // 11 - 49.4 drops far below the floor before the bounty
        let update = compute_elo_update(&input(15.0, 11.0), &config).unwrap();
        let expected = config.precision.round(config.floor + update.loser_bounty);
        assert_eq!(update.loser_new, expected);
        assert!(update.loser_new > config.floor);
    }

    #[test]
    fn test_non_positive_prior_rejected() {
        let config = RatingConfig::default();
        for (winner, loser) in [(0.0, 1000.0), (1000.0, -3.0), (f64::NAN, 1000.0)] {
            let err = compute_elo_update(&input(winner, loser), &config).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<RankingError>(),
                Some(RankingError::InvalidPriorRating { .. })
            ));
        }

        let err = compute_elo_update(&input(1000.0, 0.0), &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RankingError>(),
            Some(RankingError::InvalidPriorRating { name, .. }) if name == "loser"
        ));
    }
}
