//! Bounded Gaussian arrow scoring.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::ARROWS_PER_SET;

/// Spread of match arrows around an archer's skill
pub const MATCH_STD_DEV: f64 = 0.8;

/// Spread of ranking-round arrows around an archer's skill
pub const QUALIFICATION_STD_DEV: f64 = 0.7;

/// Draws arrow scores from a normal distribution centred on a skill value,
/// clamped to the 0..=10 scoring range and rounded to the nearest ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSampler {
    pub std_dev: f64,
}

impl ScoreSampler {
    pub fn new(std_dev: f64) -> Self {
        Self { std_dev }
    }

    /// Sampler used for match sets and shoot-offs.
    pub fn for_matches() -> Self {
        Self::new(MATCH_STD_DEV)
    }

    /// Sampler used for the ranking round.
    pub fn for_qualification() -> Self {
        Self::new(QUALIFICATION_STD_DEV)
    }

    /// Unrounded draw, clamped to the target.
    pub fn draw_raw<R: Rng + ?Sized>(&self, skill: f64, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        (skill + z * self.std_dev).clamp(0.0, 10.0)
    }

    /// Draw one arrow score.
    pub fn draw<R: Rng + ?Sized>(&self, skill: f64, rng: &mut R) -> u8 {
        // NaN skill clamps to NaN and casts to 0
        self.draw_raw(skill, rng).round() as u8
    }

    /// Draw the three arrows of one set, in shooting order.
    pub fn draw_set<R: Rng + ?Sized>(&self, skill: f64, rng: &mut R) -> [u8; ARROWS_PER_SET] {
        let mut scores = [0; ARROWS_PER_SET];
        for score in scores.iter_mut() {
            *score = self.draw(skill, rng);
        }
        scores
    }

    /// Sum of `arrows` draws, used for qualification totals.
    pub fn draw_total<R: Rng + ?Sized>(&self, skill: f64, arrows: u32, rng: &mut R) -> u32 {
        (0..arrows).map(|_| self.draw(skill, rng) as u32).sum()
    }
}

impl Default for ScoreSampler {
    fn default() -> Self {
        Self::for_matches()
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod sampler_tests;
