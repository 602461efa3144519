//! Win-streak bookkeeping

use crate::config::StreakConfig;
use crate::types::ParticipantState;

/// Streak counters of both fencers after a duel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    /// Whether the win was meaningful enough to move the counters
    pub extended: bool,
    pub winner_streak: u32,
    pub winner_longest: u32,
    pub loser_streak: u32,
    pub loser_longest: u32,
}

/// A win counts for the streak when it is an upset, or when the loser's
/// rating is at least `closeness_threshold` times the winner's. Routine wins
/// over much weaker fencers leave both counters untouched.
pub fn update_streaks(
    winner: &ParticipantState,
    loser: &ParticipantState,
    config: &StreakConfig,
) -> StreakUpdate {
    let unchanged = StreakUpdate {
        extended: false,
        winner_streak: winner.prior_streak,
        winner_longest: winner.longest_streak,
        loser_streak: loser.prior_streak,
        loser_longest: loser.longest_streak,
    };

    if !config.enabled {
        return unchanged;
    }

    let upset = winner.prior_rating < loser.prior_rating;
    let ratio = loser.prior_rating / winner.prior_rating;
    if !(upset || ratio >= config.closeness_threshold) {
        return unchanged;
    }

    let winner_streak = winner.prior_streak + 1;
    StreakUpdate {
        extended: true,
        winner_streak,
        winner_longest: winner.longest_streak.max(winner_streak),
        loser_streak: 0,
        loser_longest: loser.longest_streak,
    }
}
