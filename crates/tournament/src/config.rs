//! Tournament configuration, loadable from TOML.

use archery_core::{
    Distance, FieldConfig, MatchEngine, ScoreSampler, ShootOffTieBreak, MIN_BRACKET_SIZE,
    DEFAULT_SKILL_SPREAD, MATCH_STD_DEV, QUALIFICATION_STD_DEV,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest field the simulator will lay out
pub const MAX_FIELD_SIZE: usize = 128;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one tournament run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Number of archers in the bracket (power of two, 4..=128)
    pub field_size: usize,
    pub tracked_name: String,
    /// Mean arrow score of the tracked archer
    pub tracked_skill: f64,
    pub distance: Distance,
    /// Ranking-round total to use instead of simulating one
    pub manual_qualification_score: Option<u32>,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    pub match_std_dev: f64,
    pub qualification_std_dev: f64,
    /// Width of the band opponents' skills are drawn from
    pub skill_spread: f64,
    pub shoot_off_tie_break: ShootOffTieBreak,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            field_size: 32,
            tracked_name: "Player".to_string(),
            tracked_skill: 8.5,
            distance: Distance::default(),
            manual_qualification_score: None,
            seed: None,
            match_std_dev: MATCH_STD_DEV,
            qualification_std_dev: QUALIFICATION_STD_DEV,
            skill_spread: DEFAULT_SKILL_SPREAD,
            shoot_off_tie_break: ShootOffTieBreak::default(),
        }
    }
}

impl TournamentConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.field_size;
        if !n.is_power_of_two() || !(MIN_BRACKET_SIZE..=MAX_FIELD_SIZE).contains(&n) {
            return Err(ConfigError::Invalid(format!(
                "field_size {n} must be a power of two between {MIN_BRACKET_SIZE} and {MAX_FIELD_SIZE}"
            )));
        }
        if !self.tracked_skill.is_finite() {
            return Err(ConfigError::Invalid("tracked_skill must be finite".to_string()));
        }
        for (name, value) in [
            ("match_std_dev", self.match_std_dev),
            ("qualification_std_dev", self.qualification_std_dev),
            ("skill_spread", self.skill_spread),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number")));
            }
        }
        if let Some(score) = self.manual_qualification_score {
            let max = self.distance.qualification_arrows() * 10;
            if score > max {
                return Err(ConfigError::Invalid(format!(
                    "qualification score {score} exceeds the maximum of {max} at {}",
                    self.distance
                )));
            }
        }
        Ok(())
    }

    pub fn field_config(&self) -> FieldConfig {
        FieldConfig {
            field_size: self.field_size,
            tracked_name: self.tracked_name.clone(),
            tracked_skill: self.tracked_skill,
            distance: self.distance,
            manual_qualification_score: self.manual_qualification_score,
            skill_spread: self.skill_spread,
            sampler: ScoreSampler::new(self.qualification_std_dev),
        }
    }

    pub fn match_engine(&self) -> MatchEngine {
        MatchEngine::new(
            ScoreSampler::new(self.match_std_dev),
            self.shoot_off_tie_break,
            self.distance.face(),
        )
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
