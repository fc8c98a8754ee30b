//! Knockout bracket construction and lookup.
//!
//! A bracket is an arena of rounds. Matches are addressed by
//! `(round, index)` through [`MatchRef`]; the last round always holds the
//! Gold and Bronze medal matches.

use serde::{Deserialize, Serialize};

use crate::error::{ArcheryError, Result};
use crate::match_engine::{Match, MatchKind};
use crate::seeding::seed_pairs;
use crate::types::{Competitor, Slot};

/// Smallest field that puts every competitor into a first-round match
pub const MIN_BRACKET_SIZE: usize = 4;

pub const GOLD_MATCH_ID: &str = "m-gold";
pub const BRONZE_MATCH_ID: &str = "m-bronze";
pub const GOLD_MATCH_LABEL: &str = "Gold Medal Match";
pub const BRONZE_MATCH_LABEL: &str = "Bronze Medal Match";
pub const TERMINAL_ROUND_LABEL: &str = "Finals";

/// Address of a match inside a bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRef {
    pub round: usize,
    pub index: usize,
}

/// All matches of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub label: String,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(|m| m.completed)
    }

    pub fn position(&self, match_id: &str) -> Option<usize> {
        self.matches.iter().position(|m| m.id == match_id)
    }
}

/// Name of a stage by the number of competitors still in it.
pub fn round_label(stage_size: usize) -> String {
    match stage_size {
        8 => "Quarterfinals".to_string(),
        4 => "Semifinals".to_string(),
        2 => TERMINAL_ROUND_LABEL.to_string(),
        n => format!("Round of {n}"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Round>,
}

impl Bracket {
    /// Lay out every round for a ranked field.
    ///
    /// `ranked` must already carry seeds `1..=field_size`. First-round slots
    /// follow [`seed_pairs`]; all later slots start out pending.
    pub fn build(ranked: &[Competitor], field_size: usize) -> Result<Self> {
        if field_size < MIN_BRACKET_SIZE || !field_size.is_power_of_two() {
            return Err(ArcheryError::InvalidFieldSize(field_size, MIN_BRACKET_SIZE));
        }
        if ranked.len() != field_size {
            return Err(ArcheryError::FieldSizeMismatch {
                expected: field_size,
                actual: ranked.len(),
            });
        }

        let lookup = |seed: u32| -> Result<Slot> {
            ranked
                .iter()
                .find(|c| c.seed == seed)
                .cloned()
                .map(Slot::Filled)
                .ok_or(ArcheryError::SeedNotFound(seed))
        };

        let mut rounds: Vec<Round> = Vec::new();
        let mut stage = field_size;
        while stage > 2 {
            let label = round_label(stage);
            let matches = if rounds.is_empty() {
                seed_pairs(stage)?
                    .into_iter()
                    .enumerate()
                    .map(|(i, (s1, s2))| {
                        Ok(Match::new(
                            format!("r-{stage}-m{i}"),
                            label.clone(),
                            MatchKind::Elimination,
                            lookup(s1)?,
                            lookup(s2)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?
            } else {
                (0..stage / 2)
                    .map(|i| {
                        Match::new(
                            format!("r-{stage}-m{i}"),
                            label.clone(),
                            MatchKind::Elimination,
                            Slot::Pending,
                            Slot::Pending,
                        )
                    })
                    .collect()
            };
            rounds.push(Round { label, matches });
            stage /= 2;
        }

        rounds.push(Round {
            label: TERMINAL_ROUND_LABEL.to_string(),
            matches: vec![
                Match::new(GOLD_MATCH_ID, GOLD_MATCH_LABEL, MatchKind::Gold, Slot::Pending, Slot::Pending),
                Match::new(BRONZE_MATCH_ID, BRONZE_MATCH_LABEL, MatchKind::Bronze, Slot::Pending, Slot::Pending),
            ],
        });

        let bracket = Self { rounds };
        tracing::debug!(field_size, rounds = bracket.rounds.len(), "bracket built");
        Ok(bracket)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Competitors entering the first round.
    pub fn field_size(&self) -> usize {
        self.rounds.first().map_or(0, |r| r.matches.len() * 2)
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn terminal_index(&self) -> Option<usize> {
        self.rounds.len().checked_sub(1)
    }

    /// Round immediately before the medal matches.
    pub fn semifinal_index(&self) -> Option<usize> {
        self.rounds.len().checked_sub(2)
    }

    pub fn is_terminal(&self, round: usize) -> bool {
        self.terminal_index() == Some(round)
    }

    pub fn is_semifinal(&self, round: usize) -> bool {
        self.semifinal_index() == Some(round)
    }

    pub fn get(&self, at: MatchRef) -> Option<&Match> {
        self.rounds.get(at.round)?.matches.get(at.index)
    }

    pub fn get_mut(&mut self, at: MatchRef) -> Option<&mut Match> {
        self.rounds.get_mut(at.round)?.matches.get_mut(at.index)
    }

    /// Locate a match by id anywhere in the bracket.
    pub fn find(&self, match_id: &str) -> Option<MatchRef> {
        self.rounds.iter().enumerate().find_map(|(round, r)| {
            r.position(match_id).map(|index| MatchRef { round, index })
        })
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter())
    }

    /// Completed matches a competitor played, in bracket order.
    pub fn matches_for(&self, competitor_id: &str) -> Vec<&Match> {
        self.matches()
            .filter(|m| m.completed && m.contains(competitor_id))
            .collect()
    }

    pub fn gold_match(&self) -> Option<&Match> {
        self.matches().find(|m| m.kind == MatchKind::Gold)
    }

    pub fn bronze_match(&self) -> Option<&Match> {
        self.matches().find(|m| m.kind == MatchKind::Bronze)
    }

    pub fn champion(&self) -> Option<&Competitor> {
        self.gold_match()?.winner_competitor()
    }

    /// Every round halves the previous one, and the last holds exactly the
    /// two medal matches.
    pub fn has_valid_shape(&self) -> bool {
        let Some(terminal) = self.rounds.last() else {
            return false;
        };
        let terminal_ok = terminal.matches.len() == 2
            && terminal.matches[0].kind == MatchKind::Gold
            && terminal.matches[1].kind == MatchKind::Bronze;
        let prelim = &self.rounds[..self.rounds.len() - 1];
        let halving = prelim
            .windows(2)
            .all(|w| w[1].matches.len() * 2 == w[0].matches.len());
        let feeds_medals = prelim.last().map_or(true, |r| r.matches.len() == 2);
        terminal_ok && halving && feeds_medals
    }
}

/// Convenience wrapper over [`Bracket::build`].
pub fn build_bracket(ranked: &[Competitor], field_size: usize) -> Result<Bracket> {
    Bracket::build(ranked, field_size)
}

#[cfg(test)]
#[path = "bracket_tests.rs"]
mod bracket_tests;
