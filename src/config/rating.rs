//! Rating system configuration
//!
//! Every constant the engine uses lives here and is handed to
//! [`crate::rating::RatingEngine`] as one immutable value.

use crate::error::RankingError;
use serde::{Deserialize, Serialize};

/// Rounding applied to every stored rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingPrecision {
    Integer,
    OneDecimal,
}

impl RatingPrecision {
    /// Round half to even, matching how the club's spreadsheets rounded
    pub fn round(&self, value: f64) -> f64 {
        match self {
            RatingPrecision::Integer => value.round_ties_even(),
            RatingPrecision::OneDecimal => (value * 10.0).round_ties_even() / 10.0,
        }
    }
}

/// How a first-time fencer's rating is seeded from the weapon table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Level-dependent quantile of current ratings
    Quantile,
    /// Median of current ratings, whatever the level
    Median,
}

/// Provisional-period settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbationConfig {
    pub enabled: bool,
    /// Fraction of the table size a new fencer must duel before graduating
    pub quota: f64,
    /// Applied to a provisional fencer's rating delta
    pub multiplier: f64,
}

impl Default for ProbationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quota: 0.4,
            multiplier: 0.5,
        }
    }
}

impl ProbationConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            quota: 0.0,
            multiplier: 1.0,
        }
    }
}

/// Win-streak settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    pub enabled: bool,
    /// A win counts when loser / winner rating is at least this
    pub closeness_threshold: f64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            closeness_threshold: 0.9,
        }
    }
}

impl StreakConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Rating engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Base rating delta per duel
    pub k: f64,
    /// Elo spread divisor
    pub beta: f64,
    /// Points subtracted from every rating in the weapon table per duel
    pub decay: f64,
    /// Lowest rating any row may hold
    pub floor: f64,
    /// Scales the underdog bounty; the bounty never exceeds half of it
    pub bounty_constant: f64,
    pub precision: RatingPrecision,
    pub seed_policy: SeedPolicy,
    /// Seed for the very first fencer of a weapon
    pub initial_rating: f64,
    pub probation: ProbationConfig,
    pub streak: StreakConfig,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k: 20.0,
            beta: 400.0,
            decay: 1.0,
            floor: 1.0,
            bounty_constant: 10.0,
            precision: RatingPrecision::OneDecimal,
            seed_policy: SeedPolicy::Median,
            initial_rating: 1000.0,
            probation: ProbationConfig::default(),
            streak: StreakConfig::default(),
        }
    }
}

impl RatingConfig {
    /// Bare Elo with bounty and decay: integer ratings, level quantile seeds,
    /// no probation and no streaks
    pub fn classic() -> Self {
        let mut config = Self::default();
        config.apply_classic_rules();
        config
    }

    /// Switch to the classic rules, keeping K, beta, decay, floor, bounty
    /// and the initial rating as they are
    pub fn apply_classic_rules(&mut self) {
        self.precision = RatingPrecision::Integer;
        self.seed_policy = SeedPolicy::Quantile;
        self.probation = ProbationConfig::disabled();
        self.streak = StreakConfig::disabled();
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        let fail = |message: &str| -> crate::error::Result<()> {
            Err(RankingError::ConfigurationError {
                message: message.to_string(),
            }
            .into())
        };

        if !(self.k > 0.0) {
            return fail("K must be positive");
        }
        if !(self.beta > 0.0) {
            return fail("Beta must be positive");
        }
        if !(self.decay >= 0.0) {
            return fail("Decay must be non-negative");
        }
        if !(self.floor > 0.0) {
            return fail("Rating floor must be positive");
        }
        if !(self.bounty_constant >= 0.0) {
            return fail("Bounty constant must be non-negative");
        }
        if !(self.initial_rating >= self.floor) {
            return fail("Initial rating must not be below the rating floor");
        }
        if !(0.0..=1.0).contains(&self.probation.quota) {
            return fail("Probation quota must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.probation.multiplier) {
            return fail("Probation multiplier must be within [0, 1]");
        }
        let theta = self.streak.closeness_threshold;
        if !(theta > 0.0 && theta < 1.0) {
            return fail("Streak closeness threshold must be within (0, 1)");
        }

        Ok(())
    }

    /// Multiplier applied to a participant's delta for the given status
    pub fn probation_multiplier(&self, is_provisional: bool) -> f64 {
        if self.probation.enabled && is_provisional {
            self.probation.multiplier
        } else {
            1.0
        }
    }
}
