use serde::{Deserialize, Serialize};
use std::fmt;

/// A seeded archer in the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: String,
    pub name: String,
    /// 1 = best qualifier
    pub seed: u32,
    /// Mean arrow score the sampler centres on
    pub skill: f64,
    /// The one competitor whose progress drives the session and history
    pub is_tracked: bool,
    pub qualification_score: u32,
}

/// One side of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// A bracket slot: either a known competitor or one still waiting on an
/// earlier result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    Filled(Competitor),
    Pending,
}

impl Slot {
    pub fn competitor(&self) -> Option<&Competitor> {
        match self {
            Slot::Filled(c) => Some(c),
            Slot::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }

    pub fn holds(&self, id: &str) -> bool {
        self.competitor().is_some_and(|c| c.id == id)
    }

    pub fn is_tracked(&self) -> bool {
        self.competitor().is_some_and(|c| c.is_tracked)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Filled(c) => write!(f, "{} ({})", c.name, c.seed),
            Slot::Pending => write!(f, "TBD"),
        }
    }
}

/// Where a single arrow landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowResult {
    pub score: u8,
    /// Position in a 100x100 frame centred on (50, 50)
    pub x: f64,
    pub y: f64,
    /// Which face of a three-spot target, if any
    pub spot: Option<u8>,
}

/// Scores and set points for one set of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOutcome {
    pub a_scores: [u8; 3],
    pub b_scores: [u8; 3],
    pub a_points: u8,
    pub b_points: u8,
    /// Placed arrows, filled in when the set was simulated
    #[serde(default)]
    pub a_arrows: Vec<ArrowResult>,
    #[serde(default)]
    pub b_arrows: Vec<ArrowResult>,
}

impl SetOutcome {
    pub fn a_total(&self) -> u32 {
        self.a_scores.iter().map(|&s| s as u32).sum()
    }

    pub fn b_total(&self) -> u32 {
        self.b_scores.iter().map(|&s| s as u32).sum()
    }
}

/// Shooting distance, which decides the target face and qualification length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    #[serde(rename = "18m")]
    Indoor18,
    #[serde(rename = "30m")]
    Outdoor30,
    #[serde(rename = "50m")]
    Outdoor50,
    #[default]
    #[serde(rename = "70m")]
    Outdoor70,
}

/// Target face layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetFace {
    #[default]
    Single,
    ThreeSpot,
}

impl Distance {
    /// Arrows shot in the ranking round.
    pub fn qualification_arrows(self) -> u32 {
        match self {
            Distance::Indoor18 => 60,
            _ => 72,
        }
    }

    pub fn face(self) -> TargetFace {
        match self {
            Distance::Indoor18 => TargetFace::ThreeSpot,
            _ => TargetFace::Single,
        }
    }

    pub fn parse(s: &str) -> Option<Distance> {
        match s.trim().to_lowercase().as_str() {
            "18m" | "18" => Some(Distance::Indoor18),
            "30m" | "30" => Some(Distance::Outdoor30),
            "50m" | "50" => Some(Distance::Outdoor50),
            "70m" | "70" => Some(Distance::Outdoor70),
            _ => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Distance::Indoor18 => "18m",
            Distance::Outdoor30 => "30m",
            Distance::Outdoor50 => "50m",
            Distance::Outdoor70 => "70m",
        };
        f.write_str(s)
    }
}
