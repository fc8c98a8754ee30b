//! Archery knockout engine
//!
//! This crate provides the pieces of a single-elimination archery tournament
//! that carry real decision logic:
//! - Bounded Gaussian arrow scoring and arrow placement on the target
//! - Ranking-round field generation and seed pairing order
//! - Bracket layout with Gold and Bronze medal matches
//! - The set-system match state machine, including shoot-offs and forfeits
//!
//! Progression between rounds and tournament history live in the
//! `tournament` crate.

pub mod bracket;
pub mod error;
pub mod field;
pub mod match_engine;
pub mod sampler;
pub mod seeding;
pub mod target;
pub mod types;

pub use bracket::*;
pub use error::{ArcheryError, Result};
pub use field::*;
pub use match_engine::*;
pub use sampler::*;
pub use seeding::*;
pub use target::{place_arrow, place_set, ring_bounds, score_at};
pub use types::*;

// =============================================================================
// Scoring constants shared by the match engine and progression
// =============================================================================

pub const SET_POINTS_WIN: u8 = 2;
pub const SET_POINTS_DRAW: u8 = 1;
pub const SET_POINTS_LOSS: u8 = 0;
/// Set points that win a match
pub const MATCH_WIN_POINTS: u8 = 6;
/// Sets shot before a tied match goes to a shoot-off
pub const MAX_SETS: usize = 5;
pub const ARROWS_PER_SET: usize = 3;
