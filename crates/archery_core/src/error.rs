//! Error taxonomy for the tournament engine.
//!
//! Every variant is a caller contract violation. Nothing here is transient,
//! so nothing is retried internally.

use thiserror::Error;

/// Errors raised by bracket construction, match scoring and progression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArcheryError {
    /// Field size is not a power of two, or too small for the operation
    #[error("invalid field size {0}: must be a power of two of at least {1}")]
    InvalidFieldSize(usize, usize),
    /// Number of ranked competitors differs from the requested field size
    #[error("field size {expected} does not match {actual} ranked competitors")]
    FieldSizeMismatch { expected: usize, actual: usize },
    /// Bracket construction referenced a seed nobody holds
    #[error("no competitor holds seed {0}")]
    SeedNotFound(u32),
    /// Sets or shoot-off arrows were submitted to a finished match
    #[error("match {0} is already decided")]
    MatchAlreadyDecided(String),
    /// Cursor or decided match does not line up with the bracket
    #[error("mismatched round state: {0}")]
    MismatchedRoundState(String),
    /// Match is tied 5-5 after five sets and needs a shoot-off, not another set
    #[error("match {0} is tied and requires a shoot-off")]
    ShootOffRequired(String),
    /// Shoot-off arrows were submitted to a match that is not tied
    #[error("match {0} has no shoot-off pending")]
    NoShootOffPending(String),
    /// Arrow score outside 0..=10
    #[error("invalid arrow score {0}: must be between 0 and 10")]
    InvalidScore(u8),
    /// Match cannot be played while one of its slots is unresolved
    #[error("match {0} still has a pending slot")]
    SlotPending(String),
    /// The tournament already reached a terminal state
    #[error("tournament is already finished")]
    TournamentFinished,
}

pub type Result<T> = std::result::Result<T, ArcheryError>;
