//! Seed pairing order for balanced knockout brackets.

use crate::error::{ArcheryError, Result};

/// Smallest field [`seed_order`] accepts
pub const MIN_SEED_FIELD: usize = 2;

/// Returns seed numbers `1..=n` in first-round pairing order.
///
/// Adjacent entries meet in round one. The order guarantees that seeds 1 and
/// 2 can only meet in the final, seeds 1 and 4 in the semifinal, and so on.
/// For `n = 8` this is `[1, 8, 5, 4, 3, 6, 7, 2]`.
pub fn seed_order(n: usize) -> Result<Vec<u32>> {
    if n < MIN_SEED_FIELD || !n.is_power_of_two() {
        return Err(ArcheryError::InvalidFieldSize(n, MIN_SEED_FIELD));
    }

    let mut seeds: Vec<u32> = vec![1, 2];
    while seeds.len() < n {
        // Seeds of each new pair sum to this value in the doubled field
        let sum = seeds.len() as u32 * 2 + 1;
        seeds = seeds
            .chunks_exact(2)
            .flat_map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                [a, sum - a, sum - b, b]
            })
            .collect();
    }
    Ok(seeds)
}

/// First-round pairings as `(seed, seed)` tuples.
pub fn seed_pairs(n: usize) -> Result<Vec<(u32, u32)>> {
    Ok(seed_order(n)?
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect())
}

#[cfg(test)]
#[path = "seeding_tests.rs"]
mod seeding_tests;
