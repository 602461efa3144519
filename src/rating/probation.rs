//! Probation (provisional period) countdown

use crate::types::{HistoryLog, ParticipantState, Weapon};

/// Provisional duels `participant` has left after this duel.
///
/// Graduated fencers stay graduated. A fencer seeded by this very duel keeps
/// the full quota. Otherwise the count drops by one unless the two fencers
/// already met with this weapon: rematches against a training partner do not
/// count towards graduation, whoever won them.
pub fn remaining_after_duel(
    participant: &ParticipantState,
    history: &HistoryLog,
    weapon: Weapon,
) -> u32 {
    let remaining = participant.prior_provisional_duels_remaining;
    if remaining == 0 || participant.is_new() {
        return remaining;
    }

    if history.has_met(&participant.name, &participant.opponent_name, weapon) {
        remaining
    } else {
        remaining - 1
    }
}
