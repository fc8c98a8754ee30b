//! Field generation and ranking-round seeding.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::sampler::ScoreSampler;
use crate::types::{Competitor, Distance};

/// Id given to the tracked competitor
pub const TRACKED_ID: &str = "user-archer";

/// Default width of the opponent skill band around the tracked archer
pub const DEFAULT_SKILL_SPREAD: f64 = 1.2;

const NAME_SAMPLES: &[&str] = &[
    "Robin Hood",
    "Katniss Everdeen",
    "Legolas Greenleaf",
    "Oliver Queen",
    "Clint Barton",
    "Kim Woo-jin",
    "An San",
    "Brady Ellison",
    "Mauro Nespoli",
    "Mete Gazoz",
    "Takaharu Furukawa",
    "Casey Kaufhold",
    "Lisa Unruh",
    "Kang Chae-young",
    "Wei Chun-heng",
];

/// Inputs for building a field of competitors.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub field_size: usize,
    pub tracked_name: String,
    pub tracked_skill: f64,
    pub distance: Distance,
    /// Skips the simulated ranking round for the tracked archer
    pub manual_qualification_score: Option<u32>,
    pub skill_spread: f64,
    pub sampler: ScoreSampler,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            field_size: 32,
            tracked_name: "Player".to_string(),
            tracked_skill: 8.5,
            distance: Distance::default(),
            manual_qualification_score: None,
            skill_spread: DEFAULT_SKILL_SPREAD,
            sampler: ScoreSampler::for_qualification(),
        }
    }
}

/// Generate `field_size - 1` opponents around the tracked archer's skill, run
/// the ranking round and return everyone ranked with seeds assigned.
pub fn generate_field<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> Vec<Competitor> {
    let arrows = config.distance.qualification_arrows();
    let opponents = config.field_size.saturating_sub(1);
    let mut field = Vec::with_capacity(config.field_size);

    for i in 0..opponents {
        let skill = config.tracked_skill + (rng.gen::<f64>() - 0.5) * config.skill_spread;
        let qualification_score = config.sampler.draw_total(skill, arrows, rng);
        let base = NAME_SAMPLES.choose(rng).copied().unwrap_or("Archer");
        let suffix = (b'A' + (i % 26) as u8) as char;

        field.push(Competitor {
            id: format!("archer-{i}"),
            name: format!("{base} {suffix}"),
            seed: 0,
            skill,
            is_tracked: false,
            qualification_score,
        });
    }

    let tracked_score = match config.manual_qualification_score {
        Some(score) => score,
        None => config.sampler.draw_total(config.tracked_skill, arrows, rng),
    };
    let tracked_name = if config.tracked_name.trim().is_empty() {
        "Player".to_string()
    } else {
        config.tracked_name.clone()
    };

    field.push(Competitor {
        id: TRACKED_ID.to_string(),
        name: tracked_name,
        seed: 0,
        skill: config.tracked_skill,
        is_tracked: true,
        qualification_score: tracked_score,
    });

    tracing::debug!(
        size = field.len(),
        tracked_score,
        "ranking round complete"
    );

    rank_competitors(field)
}

/// Sort by descending qualification score and assign seeds from 1.
///
/// The sort is stable, so equal scores keep their insertion order.
pub fn rank_competitors(mut competitors: Vec<Competitor>) -> Vec<Competitor> {
    competitors.sort_by(|a, b| b.qualification_score.cmp(&a.qualification_score));
    for (idx, c) in competitors.iter_mut().enumerate() {
        c.seed = idx as u32 + 1;
    }
    competitors
}

/// The tracked competitor of a field, if present.
pub fn tracked(competitors: &[Competitor]) -> Option<&Competitor> {
    competitors.iter().find(|c| c.is_tracked)
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod field_tests;
