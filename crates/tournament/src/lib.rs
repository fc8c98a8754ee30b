//! Tournament runner for archery knockout simulations
//!
//! This crate provides infrastructure for:
//! - Moving results through the bracket round by round
//! - Driving the tracked archer's matches set by set
//! - Recording finished tournaments as immutable history
//!
//! # Usage
//!
//! ```bash
//! # Simulate a 32-archer field at 70m with a fixed seed
//! cargo run -p tournament -- run --size 32 --skill 8.7 --seed 42
//!
//! # Print first-round seed pairings for a field of 16
//! cargo run -p tournament -- seeds 16
//! ```

mod config;
mod history;
mod progression;
mod session;

pub use config::*;
pub use history::*;
pub use progression::*;
pub use session::*;

use thiserror::Error;

/// Errors surfaced to callers that set up and run whole tournaments.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Engine(#[from] archery_core::ArcheryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
