//! Round progression: writing results back into the bracket and seeding the
//! next round.
//!
//! Every transition works on a private copy of the bracket and hands back the
//! new value, so callers never see a round that is only partly resolved.

use archery_core::{ArcheryError, Bracket, Match, MatchEngine, MatchKind, MatchRef, Result, Side, Slot};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The match the tracked competitor is currently playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub round_index: usize,
    pub match_id: String,
}

/// Where the tracked competitor finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    Gold,
    Silver,
    Bronze,
    Fourth,
    LostIn(String),
    Forfeited,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standing::Gold => write!(f, "Gold Medalist"),
            Standing::Silver => write!(f, "Silver Medalist"),
            Standing::Bronze => write!(f, "Bronze Medalist"),
            Standing::Fourth => write!(f, "4th Place"),
            Standing::LostIn(label) => write!(f, "Lost in {label}"),
            Standing::Forfeited => write!(f, "Retired/Forfeited (0-6)"),
        }
    }
}

/// State transitions a presentation layer may react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TournamentEvent {
    MatchDecided {
        match_id: String,
        round_label: String,
        winner_id: String,
        points: (u8, u8),
        shoot_off: bool,
        /// Played out by the engine rather than by the tracked competitor
        simulated: bool,
    },
    ShootOffStarted {
        match_id: String,
    },
    RoundAdvanced {
        round_index: usize,
        label: String,
    },
    TournamentFinished {
        standing: Standing,
    },
}

/// Result of one progression step.
#[derive(Debug, Clone)]
pub struct Advance {
    pub bracket: Bracket,
    /// `None` once the tournament is over
    pub cursor: Option<Cursor>,
    pub standing: Option<Standing>,
    pub events: Vec<TournamentEvent>,
}

/// Cursor for the tracked competitor's first-round match.
pub fn initial_cursor(bracket: &Bracket) -> Option<Cursor> {
    locate_tracked(bracket, 0)
}

/// Find the tracked competitor's match within one round.
pub fn locate_tracked(bracket: &Bracket, round_index: usize) -> Option<Cursor> {
    bracket
        .round(round_index)?
        .matches
        .iter()
        .find(|m| m.tracked_side().is_some())
        .map(|m| Cursor {
            round_index,
            match_id: m.id.clone(),
        })
}

fn mismatch(msg: impl Into<String>) -> ArcheryError {
    ArcheryError::MismatchedRoundState(msg.into())
}

/// Resolve the cursor to a pending, fully seeded match holding the tracked
/// competitor, and return its address and the tracked side.
fn resolve_cursor(bracket: &Bracket, cursor: &Cursor) -> Result<(MatchRef, Side)> {
    let round = bracket
        .round(cursor.round_index)
        .ok_or_else(|| mismatch(format!("round {} does not exist", cursor.round_index)))?;
    let index = round
        .position(&cursor.match_id)
        .ok_or_else(|| mismatch(format!("match {} is not in {}", cursor.match_id, round.label)))?;
    let at = MatchRef {
        round: cursor.round_index,
        index,
    };
    let slot = &round.matches[index];
    if slot.completed {
        return Err(mismatch(format!("match {} is already resolved", slot.id)));
    }
    if !slot.is_ready() {
        return Err(mismatch(format!("match {} is not seeded yet", slot.id)));
    }
    let side = slot
        .tracked_side()
        .ok_or_else(|| mismatch(format!("match {} does not involve the tracked competitor", slot.id)))?;
    Ok((at, side))
}

fn same_competitor(a: &Slot, b: &Slot) -> bool {
    match (a.competitor(), b.competitor()) {
        (Some(x), Some(y)) => x.id == y.id,
        _ => false,
    }
}

fn decided_event(m: &Match, simulated: bool) -> Option<TournamentEvent> {
    let winner = m.winner_competitor()?;
    Some(TournamentEvent::MatchDecided {
        match_id: m.id.clone(),
        round_label: m.round_label.clone(),
        winner_id: winner.id.clone(),
        points: (m.points_a, m.points_b),
        shoot_off: m.is_shoot_off,
        simulated,
    })
}

/// Simulate every still-pending, fully seeded match in a round.
pub fn resolve_round<R: Rng + ?Sized>(
    bracket: &mut Bracket,
    round_index: usize,
    engine: &MatchEngine,
    rng: &mut R,
    events: &mut Vec<TournamentEvent>,
) -> Result<()> {
    let round = bracket
        .rounds
        .get_mut(round_index)
        .ok_or_else(|| mismatch(format!("round {round_index} does not exist")))?;
    for m in round.matches.iter_mut() {
        if m.completed || !m.is_ready() {
            continue;
        }
        engine.simulate(m, rng)?;
        events.extend(decided_event(m, true));
    }
    Ok(())
}

/// Seed the round after `round_index` from its results.
///
/// Leaving the semifinal, winners go to the Gold match and losers to the
/// Bronze match, match 0 filling side A and match 1 side B. Otherwise winners
/// pair off in order: winners 0 and 1 meet in match 0, 2 and 3 in match 1.
fn fill_next_round(bracket: &mut Bracket, round_index: usize) -> Result<()> {
    let current = &bracket.rounds[round_index];
    let mut winners = Vec::with_capacity(current.matches.len());
    let mut losers = Vec::with_capacity(current.matches.len());
    for m in &current.matches {
        match (m.winner_competitor(), m.loser_competitor()) {
            (Some(w), Some(l)) => {
                winners.push(Slot::Filled(w.clone()));
                losers.push(Slot::Filled(l.clone()));
            }
            _ => return Err(mismatch(format!("match {} has no result", m.id))),
        }
    }

    let semifinal = bracket.is_semifinal(round_index);
    let next = bracket
        .rounds
        .get_mut(round_index + 1)
        .ok_or_else(|| mismatch(format!("no round after {round_index}")))?;

    if semifinal {
        let (Some(gold), Some(bronze)) = (
            next.matches.iter().position(|m| m.kind == MatchKind::Gold),
            next.matches.iter().position(|m| m.kind == MatchKind::Bronze),
        ) else {
            return Err(mismatch("terminal round lacks medal matches"));
        };
        if winners.len() != 2 {
            return Err(mismatch(format!("semifinal has {} matches", winners.len())));
        }
        let mut winners = winners.into_iter();
        let mut losers = losers.into_iter();
        next.matches[gold].a = winners.next().unwrap_or(Slot::Pending);
        next.matches[gold].b = winners.next().unwrap_or(Slot::Pending);
        next.matches[bronze].a = losers.next().unwrap_or(Slot::Pending);
        next.matches[bronze].b = losers.next().unwrap_or(Slot::Pending);
    } else {
        if winners.len() != next.matches.len() * 2 {
            return Err(mismatch(format!(
                "{} winners cannot fill {} matches",
                winners.len(),
                next.matches.len()
            )));
        }
        for (m, pair) in next.matches.iter_mut().zip(winners.chunks_exact(2)) {
            m.a = pair[0].clone();
            m.b = pair[1].clone();
        }
    }
    Ok(())
}

/// Apply the tracked competitor's decided match and move the tournament on.
///
/// The result is written at the cursor, the rest of the round is simulated,
/// and either a terminal standing is reached or the next round is seeded and
/// the cursor moved to the tracked competitor's next match.
///
/// A match the tracked competitor conceded ends the tournament as
/// [`Standing::Forfeited`], whichever round it was in.
pub fn advance<R: Rng + ?Sized>(
    bracket: &Bracket,
    cursor: &Cursor,
    decided: Match,
    engine: &MatchEngine,
    rng: &mut R,
) -> Result<Advance> {
    let (at, tracked_side) = resolve_cursor(bracket, cursor)?;
    let round_index = at.round;

    let mut next = bracket.clone();
    let slot = next
        .get_mut(at)
        .ok_or_else(|| mismatch(format!("match {} vanished", cursor.match_id)))?;
    if decided.id != slot.id {
        return Err(mismatch(format!("decided match {} is not the active match {}", decided.id, slot.id)));
    }
    if !same_competitor(&decided.a, &slot.a) || !same_competitor(&decided.b, &slot.b) {
        return Err(mismatch(format!("decided match {} has different competitors", decided.id)));
    }
    let Some(winner) = decided.winner.filter(|_| decided.completed) else {
        return Err(mismatch(format!("match {} is not decided", decided.id)));
    };

    let round_label = slot.round_label.clone();
    let kind = slot.kind;
    let conceded = decided.forfeited;
    *slot = Match {
        round_label: round_label.clone(),
        kind,
        ..decided
    };

    let mut events = Vec::new();
    events.extend(decided_event(slot, false));
    resolve_round(&mut next, round_index, engine, rng, &mut events)?;

    let tracked_won = winner == tracked_side;
    tracing::info!(round = %round_label, won = tracked_won, "tracked match decided");

    let standing = if conceded && !tracked_won {
        Some(Standing::Forfeited)
    } else if next.is_terminal(round_index) {
        Some(match (kind, tracked_won) {
            (MatchKind::Gold, true) => Standing::Gold,
            (MatchKind::Gold, false) => Standing::Silver,
            (_, true) => Standing::Bronze,
            (_, false) => Standing::Fourth,
        })
    } else if !tracked_won && !next.is_semifinal(round_index) {
        Some(Standing::LostIn(round_label))
    } else {
        None
    };

    if let Some(standing) = standing {
        tracing::info!(%standing, "tournament finished");
        events.push(TournamentEvent::TournamentFinished {
            standing: standing.clone(),
        });
        return Ok(Advance {
            bracket: next,
            cursor: None,
            standing: Some(standing),
            events,
        });
    }

    fill_next_round(&mut next, round_index)?;
    let next_index = round_index + 1;
    let label = next.rounds[next_index].label.clone();
    tracing::info!(round = %label, "advanced to next round");
    events.push(TournamentEvent::RoundAdvanced {
        round_index: next_index,
        label,
    });

    let cursor = locate_tracked(&next, next_index);
    Ok(Advance {
        bracket: next,
        cursor,
        standing: None,
        events,
    })
}

/// Concede the tracked competitor's active match 0-6 and end the tournament.
///
/// The rest of the round is still simulated so the bracket stays complete.
pub fn forfeit<R: Rng + ?Sized>(
    bracket: &Bracket,
    cursor: &Cursor,
    engine: &MatchEngine,
    rng: &mut R,
) -> Result<Advance> {
    let (at, tracked_side) = resolve_cursor(bracket, cursor)?;

    let mut next = bracket.clone();
    let mut events = Vec::new();
    if let Some(slot) = next.get_mut(at) {
        slot.forfeit(tracked_side)?;
        events.extend(decided_event(slot, false));
    }
    resolve_round(&mut next, at.round, engine, rng, &mut events)?;

    let standing = Standing::Forfeited;
    tracing::info!(%standing, match_id = %cursor.match_id, "tracked competitor retired");
    events.push(TournamentEvent::TournamentFinished {
        standing: standing.clone(),
    });
    Ok(Advance {
        bracket: next,
        cursor: None,
        standing: Some(standing),
        events,
    })
}

/// Recompute a finished tournament's standing from its bracket alone.
///
/// Returns `None` while the competitor is still alive in the bracket.
pub fn standing_from_bracket(bracket: &Bracket, competitor_id: &str) -> Option<Standing> {
    let last = *bracket.matches_for(competitor_id).last()?;
    let side = last.side_of(competitor_id)?;
    let won = last.winner == Some(side);

    if last.forfeited && !won {
        return Some(Standing::Forfeited);
    }
    match (last.kind, won) {
        (MatchKind::Gold, true) => Some(Standing::Gold),
        (MatchKind::Gold, false) => Some(Standing::Silver),
        (MatchKind::Bronze, true) => Some(Standing::Bronze),
        (MatchKind::Bronze, false) => Some(Standing::Fourth),
        (MatchKind::Elimination, true) => None,
        (MatchKind::Elimination, false) => {
            let at = bracket.find(&last.id)?;
            if bracket.is_semifinal(at.round) {
                // Still owed a Bronze match
                None
            } else {
                Some(Standing::LostIn(last.round_label.clone()))
            }
        }
    }
}

#[cfg(test)]
#[path = "progression_tests.rs"]
mod progression_tests;
