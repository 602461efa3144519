//! Plain-text rendering of duel resolutions and ranking tables

use crate::rating::DuelResolution;
use crate::types::{ParticipantState, RankingTable};
use std::fmt::Write;

fn status(participant: &ParticipantState) -> &'static str {
    match (participant.is_new(), participant.is_provisional) {
        (true, _) => "new",
        (false, true) => "provisional",
        (false, false) => "ranked",
    }
}

fn write_participant(out: &mut String, role: &str, weapon: &str, p: &ParticipantState) {
    let _ = writeln!(out, "\n{}'s details", role);
    let _ = writeln!(out, "Name: {}", p.name);
    let _ = writeln!(out, "Status: {}", status(p));
    let _ = writeln!(out, "Level: {}", p.level);
    let _ = writeln!(
        out,
        "Rating will be updated from {} to {}",
        p.prior_rating, p.new_rating
    );
    let _ = writeln!(out, "{} duels completed: {}", weapon, p.new_duel_count);
    if p.new_provisional_duels_remaining > 0 {
        let _ = writeln!(
            out,
            "Provisional duels remaining: {}",
            p.new_provisional_duels_remaining
        );
    }
    if p.new_streak > 0 {
        let _ = writeln!(
            out,
            "Win streak: {} (longest {})",
            p.new_streak, p.longest_streak
        );
    }
}

/// Details shown before the user confirms a duel
pub fn format_resolution(resolution: &DuelResolution) -> String {
    let weapon = resolution.outcome.weapon.as_str();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Duel weapon: {} ({})",
        weapon, resolution.outcome.date
    );
    write_participant(&mut out, "Winner", weapon, &resolution.winner);
    write_participant(&mut out, "Loser", weapon, &resolution.loser);

    out
}

/// Ranking table, one fencer per line, highest rating first
pub fn format_table(table: &RankingTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} rankings", table.weapon);

    if table.is_empty() {
        let _ = writeln!(out, "(no duels recorded)");
        return out;
    }

    let width = table
        .rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let _ = writeln!(
        out,
        "{:>4}  {:<width$}  {:>8}  {:<11}  {:>5}  {:>6}",
        "#",
        "Name",
        "Rating",
        "Level",
        "Duels",
        "Streak",
        width = width
    );
    for (position, row) in table.rows.iter().enumerate() {
        let marker = if row.provisional_duels_remaining > 0 { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:>8}  {:<11}  {:>5}  {:>6}{}",
            position + 1,
            row.name,
            row.current_rating,
            row.level.to_string(),
            row.duel_count,
            row.current_streak,
            marker,
            width = width
        );
    }

    out
}

/// Shown once a resolution has been written: the updated weapon table
pub fn format_committed(resolution: &DuelResolution) -> String {
    format!("Rankings updated.\n\n{}", format_table(&resolution.table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingConfig;
    use crate::rating::{FixedLevel, RatingEngine};
    use crate::types::{DuelOutcome, HistoryLog, Level, RankingBook, Weapon};
    use chrono::NaiveDate;

    fn resolve_first_duel() -> DuelResolution {
        let engine = RatingEngine::new(RatingConfig::default()).unwrap();
        let outcome = DuelOutcome {
            winner: "alice".to_string(),
            loser: "bob".to_string(),
            weapon: Weapon::Foil,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };
        engine
            .resolve(
                &RankingBook::with_all_weapons(),
                &HistoryLog::new(),
                &outcome,
                &FixedLevel(Level::Beginner),
            )
            .unwrap()
    }

    #[test]
    fn test_resolution_lists_both_fencers() {
        let text = format_resolution(&resolve_first_duel());

        assert!(text.starts_with("Duel weapon: foil (2024-03-09)"));
        assert!(text.contains("Winner's details\nName: alice\nStatus: new"));
        assert!(text.contains("Loser's details\nName: bob\nStatus: new"));
        assert!(text.contains("Level: beginner"));
        assert!(text.contains("foil duels completed: 1"));
    }

    #[test]
    fn test_table_rows_in_rank_order() {
        let resolution = resolve_first_duel();
        let text = format_table(&resolution.table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "foil rankings");
        assert!(lines[2].contains("alice"));
        assert!(lines[3].contains("bob"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_committed_summary_shows_updated_table() {
        let resolution = resolve_first_duel();
        let text = format_committed(&resolution);

        assert!(text.starts_with("Rankings updated.\n\nfoil rankings\n"));
        assert!(text.ends_with(&format_table(&resolution.table)));
        assert!(text.contains("alice"));
        assert!(text.contains("bob"));
    }

    #[test]
    fn test_empty_table() {
        let text = format_table(&RankingTable::new(Weapon::Epee));
        assert_eq!(text, "epee rankings\n(no duels recorded)\n");
    }
}
