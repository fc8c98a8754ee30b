//! Set-system match scoring.
//!
//! A match is a sequence of sets of three arrows per side. The higher set
//! total earns 2 set points, a tied set earns 1 each, and the first side to
//! reach 6 points wins. If five sets leave the match at 5-5 a single-arrow
//! shoot-off decides it, and the shoot-off winner is recorded 6-5.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ArcheryError, Result};
use crate::sampler::ScoreSampler;
use crate::target::place_set;
use crate::types::{Competitor, SetOutcome, Side, Slot, TargetFace};
use crate::{ARROWS_PER_SET, MATCH_WIN_POINTS, MAX_SETS, SET_POINTS_DRAW, SET_POINTS_WIN};

/// Points each side holds when a match goes to a shoot-off
pub const SHOOT_OFF_POINTS: u8 = 5;

/// Where a match sits in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
    /// Still accepting sets
    AwaitingSets,
    /// Tied 5-5 after five sets, waiting on shoot-off arrows
    ShootOff,
    /// Won on set points (or by forfeit)
    Decided,
    /// Won in a shoot-off
    Resolved,
}

/// Role of a match in the bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    Elimination,
    Gold,
    Bronze,
}

/// How equal shoot-off arrows are separated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShootOffTieBreak {
    /// Fair 50/50 draw
    #[default]
    CoinFlip,
    /// One side receives a +0.1 margin before truncation; A only on a draw
    /// strictly above one half
    Nudge,
}

impl ShootOffTieBreak {
    pub(crate) fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Side {
        match self {
            ShootOffTieBreak::CoinFlip => {
                if rng.gen_bool(0.5) {
                    Side::A
                } else {
                    Side::B
                }
            }
            // The nudged side always wins once truncated scores compare equal
            ShootOffTieBreak::Nudge => {
                if rng.gen::<f64>() > 0.5 {
                    Side::A
                } else {
                    Side::B
                }
            }
        }
    }
}

/// A single knockout match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub round_label: String,
    pub kind: MatchKind,
    pub a: Slot,
    pub b: Slot,
    pub points_a: u8,
    pub points_b: u8,
    pub completed: bool,
    pub winner: Option<Side>,
    pub set_log: Vec<SetOutcome>,
    pub is_shoot_off: bool,
    /// Shoot-off arrows as `(a, b)`
    pub shoot_off_scores: Option<(u8, u8)>,
    #[serde(default)]
    pub forfeited: bool,
}

impl Match {
    pub fn new(id: impl Into<String>, round_label: impl Into<String>, kind: MatchKind, a: Slot, b: Slot) -> Self {
        Self {
            id: id.into(),
            round_label: round_label.into(),
            kind,
            a,
            b,
            points_a: 0,
            points_b: 0,
            completed: false,
            winner: None,
            set_log: Vec::new(),
            is_shoot_off: false,
            shoot_off_scores: None,
            forfeited: false,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        if self.completed {
            if self.shoot_off_scores.is_some() {
                MatchPhase::Resolved
            } else {
                MatchPhase::Decided
            }
        } else if self.is_shoot_off {
            MatchPhase::ShootOff
        } else {
            MatchPhase::AwaitingSets
        }
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    pub fn competitor(&self, side: Side) -> Option<&Competitor> {
        self.slot(side).competitor()
    }

    pub fn points(&self, side: Side) -> u8 {
        match side {
            Side::A => self.points_a,
            Side::B => self.points_b,
        }
    }

    /// Both slots hold a competitor.
    pub fn is_ready(&self) -> bool {
        !self.a.is_pending() && !self.b.is_pending()
    }

    pub fn side_of(&self, competitor_id: &str) -> Option<Side> {
        if self.a.holds(competitor_id) {
            Some(Side::A)
        } else if self.b.holds(competitor_id) {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn contains(&self, competitor_id: &str) -> bool {
        self.side_of(competitor_id).is_some()
    }

    /// Side of the tracked competitor, if they play in this match.
    pub fn tracked_side(&self) -> Option<Side> {
        if self.a.is_tracked() {
            Some(Side::A)
        } else if self.b.is_tracked() {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn winner_competitor(&self) -> Option<&Competitor> {
        self.winner.and_then(|side| self.competitor(side))
    }

    pub fn loser_competitor(&self) -> Option<&Competitor> {
        self.winner.and_then(|side| self.competitor(side.other()))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.completed {
            return Err(ArcheryError::MatchAlreadyDecided(self.id.clone()));
        }
        if !self.is_ready() {
            return Err(ArcheryError::SlotPending(self.id.clone()));
        }
        Ok(())
    }

    /// Record one set from both sides' arrow scores.
    ///
    /// Decides the match as soon as a side reaches 6 set points, and moves it
    /// into the shoot-off phase when five sets end 5-5.
    pub fn submit_set(&mut self, a_scores: [u8; ARROWS_PER_SET], b_scores: [u8; ARROWS_PER_SET]) -> Result<&SetOutcome> {
        let outcome = score_set(a_scores, b_scores)?;
        self.push_set(outcome)
    }

    fn push_set(&mut self, outcome: SetOutcome) -> Result<&SetOutcome> {
        self.ensure_open()?;
        if self.is_shoot_off {
            return Err(ArcheryError::ShootOffRequired(self.id.clone()));
        }

        self.points_a += outcome.a_points;
        self.points_b += outcome.b_points;
        tracing::debug!(
            match_id = %self.id,
            set = self.set_log.len() + 1,
            a = outcome.a_total(),
            b = outcome.b_total(),
            points_a = self.points_a,
            points_b = self.points_b,
            "set scored"
        );
        self.set_log.push(outcome);

        if self.points_a >= MATCH_WIN_POINTS || self.points_b >= MATCH_WIN_POINTS {
            let winner = if self.points_a >= MATCH_WIN_POINTS { Side::A } else { Side::B };
            self.finish(winner);
        } else if self.set_log.len() >= MAX_SETS {
            // Points always sum to 2 per set, so five open sets means 5-5
            self.is_shoot_off = true;
            tracing::debug!(match_id = %self.id, "tied after {} sets, shoot-off", MAX_SETS);
        }

        Ok(&self.set_log[self.set_log.len() - 1])
    }

    /// Record the shoot-off arrows and settle the match.
    ///
    /// Strictly higher score wins; equal scores fall to `tie_break`. The
    /// winner is recorded with 6 points and the loser with 5.
    pub fn submit_shoot_off<R: Rng + ?Sized>(
        &mut self,
        a_score: u8,
        b_score: u8,
        tie_break: ShootOffTieBreak,
        rng: &mut R,
    ) -> Result<Side> {
        self.ensure_open()?;
        if !self.is_shoot_off {
            return Err(ArcheryError::NoShootOffPending(self.id.clone()));
        }
        for score in [a_score, b_score] {
            if score > 10 {
                return Err(ArcheryError::InvalidScore(score));
            }
        }

        let winner = if a_score > b_score {
            Side::A
        } else if b_score > a_score {
            Side::B
        } else {
            tie_break.pick(rng)
        };

        self.shoot_off_scores = Some((a_score, b_score));
        self.points_a = SHOOT_OFF_POINTS;
        self.points_b = SHOOT_OFF_POINTS;
        match winner {
            Side::A => self.points_a = MATCH_WIN_POINTS,
            Side::B => self.points_b = MATCH_WIN_POINTS,
        }
        tracing::debug!(match_id = %self.id, a_score, b_score, ?winner, "shoot-off settled");
        self.finish(winner);
        Ok(winner)
    }

    /// Concede the match: the opponent wins 6-0 with no sets shot.
    pub fn forfeit(&mut self, loser: Side) -> Result<()> {
        self.ensure_open()?;
        self.set_log.clear();
        self.is_shoot_off = false;
        self.shoot_off_scores = None;
        match loser {
            Side::A => {
                self.points_a = 0;
                self.points_b = MATCH_WIN_POINTS;
            }
            Side::B => {
                self.points_a = MATCH_WIN_POINTS;
                self.points_b = 0;
            }
        }
        self.forfeited = true;
        self.finish(loser.other());
        Ok(())
    }

    fn finish(&mut self, winner: Side) {
        self.completed = true;
        self.winner = Some(winner);
    }
}

/// Compare two three-arrow sets and award set points.
pub fn score_set(a_scores: [u8; ARROWS_PER_SET], b_scores: [u8; ARROWS_PER_SET]) -> Result<SetOutcome> {
    if let Some(&bad) = a_scores.iter().chain(b_scores.iter()).find(|&&s| s > 10) {
        return Err(ArcheryError::InvalidScore(bad));
    }
    let a_sum: u32 = a_scores.iter().map(|&s| s as u32).sum();
    let b_sum: u32 = b_scores.iter().map(|&s| s as u32).sum();

    let (a_points, b_points) = match a_sum.cmp(&b_sum) {
        std::cmp::Ordering::Greater => (SET_POINTS_WIN, 0),
        std::cmp::Ordering::Less => (0, SET_POINTS_WIN),
        std::cmp::Ordering::Equal => (SET_POINTS_DRAW, SET_POINTS_DRAW),
    };

    Ok(SetOutcome {
        a_scores,
        b_scores,
        a_points,
        b_points,
        a_arrows: Vec::new(),
        b_arrows: Vec::new(),
    })
}

/// Plays matches, or parts of matches, from competitors' skill ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchEngine {
    pub sampler: ScoreSampler,
    pub tie_break: ShootOffTieBreak,
    pub face: TargetFace,
}

impl MatchEngine {
    pub fn new(sampler: ScoreSampler, tie_break: ShootOffTieBreak, face: TargetFace) -> Self {
        Self { sampler, tie_break, face }
    }

    fn skills(m: &Match) -> Result<(f64, f64)> {
        match (m.competitor(Side::A), m.competitor(Side::B)) {
            (Some(a), Some(b)) => Ok((a.skill, b.skill)),
            _ => Err(ArcheryError::SlotPending(m.id.clone())),
        }
    }

    /// Draw a full set for both sides: A's arrows, then B's, then placement.
    pub fn simulate_set<R: Rng + ?Sized>(&self, m: &mut Match, rng: &mut R) -> Result<SetOutcome> {
        let (skill_a, skill_b) = Self::skills(m)?;
        let a = self.sampler.draw_set(skill_a, rng);
        let b = self.sampler.draw_set(skill_b, rng);
        self.record_set(m, a, b, rng)
    }

    /// Record a set where one side's arrows were shot for real and the
    /// opponent's are drawn from their skill.
    pub fn play_set<R: Rng + ?Sized>(
        &self,
        m: &mut Match,
        side: Side,
        scores: [u8; ARROWS_PER_SET],
        rng: &mut R,
    ) -> Result<SetOutcome> {
        let opponent = m
            .competitor(side.other())
            .ok_or_else(|| ArcheryError::SlotPending(m.id.clone()))?
            .skill;
        let drawn = self.sampler.draw_set(opponent, rng);
        let (a, b) = match side {
            Side::A => (scores, drawn),
            Side::B => (drawn, scores),
        };
        self.record_set(m, a, b, rng)
    }

    fn record_set<R: Rng + ?Sized>(
        &self,
        m: &mut Match,
        a: [u8; ARROWS_PER_SET],
        b: [u8; ARROWS_PER_SET],
        rng: &mut R,
    ) -> Result<SetOutcome> {
        let mut outcome = score_set(a, b)?;
        outcome.a_arrows = place_set(&a, self.face, rng);
        outcome.b_arrows = place_set(&b, self.face, rng);
        m.push_set(outcome).cloned()
    }

    /// Shoot-off where both arrows are drawn.
    pub fn simulate_shoot_off<R: Rng + ?Sized>(&self, m: &mut Match, rng: &mut R) -> Result<Side> {
        let (skill_a, skill_b) = Self::skills(m)?;
        let a = self.sampler.draw(skill_a, rng);
        let b = self.sampler.draw(skill_b, rng);
        m.submit_shoot_off(a, b, self.tie_break, rng)
    }

    /// Shoot-off where one side's arrow was shot for real.
    pub fn play_shoot_off<R: Rng + ?Sized>(&self, m: &mut Match, side: Side, score: u8, rng: &mut R) -> Result<Side> {
        let opponent = m
            .competitor(side.other())
            .ok_or_else(|| ArcheryError::SlotPending(m.id.clone()))?
            .skill;
        let drawn = self.sampler.draw(opponent, rng);
        let (a, b) = match side {
            Side::A => (score, drawn),
            Side::B => (drawn, score),
        };
        m.submit_shoot_off(a, b, self.tie_break, rng)
    }

    /// Play out whatever remains of a match: sets until a side reaches 6
    /// points or five sets are shot, then a shoot-off if tied.
    pub fn simulate<R: Rng + ?Sized>(&self, m: &mut Match, rng: &mut R) -> Result<Side> {
        m.ensure_open()?;
        while m.phase() == MatchPhase::AwaitingSets {
            self.simulate_set(m, rng)?;
        }
        if m.phase() == MatchPhase::ShootOff {
            self.simulate_shoot_off(m, rng)?;
        }
        m.winner
            .ok_or_else(|| ArcheryError::MismatchedRoundState(format!("match {} did not finish", m.id)))
    }
}

#[cfg(test)]
#[path = "match_engine_tests.rs"]
mod match_engine_tests;
