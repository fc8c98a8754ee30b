//! Target face geometry: where a scored arrow lands.
//!
//! Coordinates live in a 100x100 frame with the centre at (50, 50). Each
//! scoring ring is 4 units wide, so the 10 ring spans radius 0..4 and the
//! 1 ring spans 36..40. Misses land in the 45..50 band outside the face.

use rand::Rng;
use std::f64::consts::TAU;

use crate::types::{ArrowResult, TargetFace};

pub const CENTER: f64 = 50.0;
pub const RING_WIDTH: f64 = 4.0;
const MISS_INNER: f64 = 45.0;
const MISS_OUTER: f64 = 50.0;

/// Inner and outer radius of the ring that scores `score`.
pub fn ring_bounds(score: u8) -> (f64, f64) {
    if score == 0 {
        return (MISS_INNER, MISS_OUTER);
    }
    let score = score.min(10) as f64;
    ((10.0 - score) * RING_WIDTH, (11.0 - score) * RING_WIDTH)
}

/// Score of a point, the inverse of [`ring_bounds`].
pub fn score_at(x: f64, y: f64) -> u8 {
    let r = ((x - CENTER).powi(2) + (y - CENTER).powi(2)).sqrt();
    if r >= 10.0 * RING_WIDTH {
        return 0;
    }
    (10 - (r / RING_WIDTH).floor() as i32).clamp(1, 10) as u8
}

/// Place an arrow with the given score at a random point inside its ring.
///
/// `arrow_index` picks the face on a three-spot target (one arrow per spot).
pub fn place_arrow<R: Rng + ?Sized>(
    score: u8,
    face: TargetFace,
    arrow_index: usize,
    rng: &mut R,
) -> ArrowResult {
    let (inner, outer) = ring_bounds(score);
    let r = inner + rng.gen::<f64>() * (outer - inner);
    let angle = rng.gen::<f64>() * TAU;

    let spot = match face {
        TargetFace::Single => None,
        TargetFace::ThreeSpot => Some((arrow_index % 3) as u8),
    };

    ArrowResult {
        score: score.min(10),
        x: CENTER + angle.cos() * r,
        y: CENTER + angle.sin() * r,
        spot,
    }
}

/// Place every arrow of a set.
pub fn place_set<R: Rng + ?Sized>(scores: &[u8], face: TargetFace, rng: &mut R) -> Vec<ArrowResult> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &s)| place_arrow(s, face, i, rng))
        .collect()
}
