//! Service layer for the weapon rankings engine
//!
//! Coordinates the rating engine with persistent storage and renders results
//! for the command-line front end.

pub mod duel;
pub mod report;

pub use duel::DuelService;
pub use report::{format_committed, format_resolution, format_table};
