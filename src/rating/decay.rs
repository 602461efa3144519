//! Per-duel decay and rating floor for a whole weapon table

use crate::config::RatingConfig;
use crate::types::{RankingRow, RankingTable};
use tracing::{debug, warn};

/// Subtract the decay from every row and round to the configured precision
pub fn apply_decay(table: &mut RankingTable, config: &RatingConfig) {
    for row in &mut table.rows {
        row.current_rating = config.precision.round(row.current_rating - config.decay);
    }
}

/// Raise every row below `floor` to exactly `floor`; returns how many moved
pub fn apply_floor(table: &mut RankingTable, floor: f64) -> usize {
    let mut clamped = 0;
    for row in &mut table.rows {
        if row.current_rating < floor {
            row.current_rating = floor;
            clamped += 1;
        }
    }
    clamped
}

/// Build the post-duel table: decay and round every prior row, write the
/// duelists' fresh rows over them, clamp everything to the floor, then sort.
///
/// The duelists' rows are written after the decay, so their new ratings are
/// stored as computed.
pub fn decay_and_floor(
    prior: &RankingTable,
    duelists: &[RankingRow],
    config: &RatingConfig,
) -> RankingTable {
    let mut table = prior.clone();
    apply_decay(&mut table, config);

    for row in duelists {
        table.upsert(row.clone());
    }

    let clamped = apply_floor(&mut table, config.floor);
    if clamped > 0 {
        warn!(
            "Decay pushed {} {} rating(s) onto the floor of {}",
            clamped, table.weapon, config.floor
        );
    }

    table.sort_by_rating();
    debug!(
        "Applied decay of {} to {} {} rows",
        config.decay,
        table.len(),
        table.weapon
    );

    table
}
