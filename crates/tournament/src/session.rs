//! A running tournament: the single owner of one bracket.
//!
//! The session keeps the seeded RNG, the tracked competitor's cursor and a
//! working copy of the match currently being shot. Results only reach the
//! bracket through [`progression::advance`] or [`progression::forfeit`].

use archery_core::{
    generate_field, ArcheryError, Bracket, Competitor, Match, MatchEngine, MatchPhase, Result,
    SetOutcome, Side, ARROWS_PER_SET,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::TournamentConfig;
use crate::history::TournamentRecord;
use crate::progression::{self, Advance, Cursor, Standing, TournamentEvent};
use crate::TournamentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Finished,
}

pub struct TournamentSession {
    config: TournamentConfig,
    competitors: Vec<Competitor>,
    bracket: Bracket,
    engine: MatchEngine,
    rng: ChaCha8Rng,
    cursor: Option<Cursor>,
    /// Working copy of the active match while sets are being shot
    live: Option<Match>,
    standing: Option<Standing>,
    record: Option<TournamentRecord>,
    events: Vec<TournamentEvent>,
}

impl TournamentSession {
    /// Generate a field from `config`, seed the bracket and point the cursor
    /// at the tracked competitor's first match.
    pub fn start(config: TournamentConfig) -> std::result::Result<Self, TournamentError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let competitors = generate_field(&config.field_config(), &mut rng);
        Ok(Self::with_field(config, competitors, rng)?)
    }

    /// Start from an already ranked field.
    pub fn with_field(config: TournamentConfig, competitors: Vec<Competitor>, rng: ChaCha8Rng) -> Result<Self> {
        let bracket = Bracket::build(&competitors, config.field_size)?;
        let cursor = progression::initial_cursor(&bracket)
            .ok_or_else(|| ArcheryError::MismatchedRoundState("no tracked competitor in the first round".to_string()))?;

        tracing::info!(
            field_size = config.field_size,
            distance = %config.distance,
            first_match = %cursor.match_id,
            "tournament started"
        );

        Ok(Self {
            engine: config.match_engine(),
            config,
            competitors,
            bracket,
            rng,
            cursor: Some(cursor),
            live: None,
            standing: None,
            record: None,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        if self.standing.is_some() {
            SessionStatus::Finished
        } else {
            SessionStatus::Active
        }
    }

    pub fn standing(&self) -> Option<&Standing> {
        self.standing.as_ref()
    }

    /// Snapshot taken when the tournament ended.
    pub fn record(&self) -> Option<&TournamentRecord> {
        self.record.as_ref()
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> &[TournamentEvent] {
        &self.events
    }

    pub fn tracked(&self) -> Option<&Competitor> {
        archery_core::tracked(&self.competitors)
    }

    /// The match the tracked competitor is playing, including sets already
    /// shot but not yet written to the bracket.
    pub fn active_match(&self) -> Option<&Match> {
        if let Some(live) = &self.live {
            return Some(live);
        }
        let cursor = self.cursor.as_ref()?;
        let at = self.bracket.find(&cursor.match_id)?;
        self.bracket.get(at)
    }

    fn live_match(&mut self) -> Result<(&mut Match, Side, &mut ChaCha8Rng)> {
        if self.standing.is_some() {
            return Err(ArcheryError::TournamentFinished);
        }
        if self.live.is_none() {
            let m = self
                .active_match()
                .cloned()
                .ok_or_else(|| ArcheryError::MismatchedRoundState("no active match".to_string()))?;
            self.live = Some(m);
        }
        let live = self
            .live
            .as_mut()
            .ok_or_else(|| ArcheryError::MismatchedRoundState("no active match".to_string()))?;
        let side = live.tracked_side().ok_or_else(|| {
            ArcheryError::MismatchedRoundState(format!("match {} does not involve the tracked competitor", live.id))
        })?;
        Ok((live, side, &mut self.rng))
    }

    fn note_shoot_off(&mut self, match_id: Option<String>) {
        if let Some(match_id) = match_id {
            tracing::info!(match_id = %match_id, "match tied, shoot-off");
            self.events.push(TournamentEvent::ShootOffStarted { match_id });
        }
    }

    /// Shoot one set for the tracked competitor; the opponent's arrows are
    /// drawn from their skill.
    pub fn play_tracked_set(&mut self, scores: [u8; ARROWS_PER_SET]) -> Result<SetOutcome> {
        let engine = self.engine;
        let (live, side, rng) = self.live_match()?;
        let outcome = engine.play_set(live, side, scores, rng)?;
        let tied = (live.phase() == MatchPhase::ShootOff).then(|| live.id.clone());
        self.note_shoot_off(tied);
        Ok(outcome)
    }

    /// Shoot the tracked competitor's shoot-off arrow.
    pub fn play_tracked_shoot_off(&mut self, score: u8) -> Result<Side> {
        let engine = self.engine;
        let (live, side, rng) = self.live_match()?;
        engine.play_shoot_off(live, side, score, rng)
    }

    /// Let the engine shoot the rest of the tracked competitor's match.
    pub fn simulate_tracked_match(&mut self) -> Result<Side> {
        let engine = self.engine;
        let (live, _, rng) = self.live_match()?;
        let was_tied = live.is_shoot_off;
        let winner = engine.simulate(live, rng)?;
        let tied = (!was_tied && live.is_shoot_off).then(|| live.id.clone());
        self.note_shoot_off(tied);
        Ok(winner)
    }

    /// Write the finished active match into the bracket and move on.
    ///
    /// Returns the standing if the tournament ended.
    pub fn complete_active_match(&mut self) -> Result<Option<Standing>> {
        if self.standing.is_some() {
            return Err(ArcheryError::TournamentFinished);
        }
        let cursor = self
            .cursor
            .clone()
            .ok_or_else(|| ArcheryError::MismatchedRoundState("no active match".to_string()))?;
        let decided = match &self.live {
            Some(m) if m.completed => m.clone(),
            Some(m) => {
                return Err(ArcheryError::MismatchedRoundState(format!("match {} is still in progress", m.id)))
            }
            None => {
                return Err(ArcheryError::MismatchedRoundState(format!("match {} has not been shot", cursor.match_id)))
            }
        };

        let advance = progression::advance(&self.bracket, &cursor, decided, &self.engine, &mut self.rng)?;
        self.live = None;
        Ok(self.apply(advance))
    }

    /// Retire from the active match: a 0-6 loss that ends the tournament.
    pub fn retire(&mut self) -> Result<Standing> {
        if self.standing.is_some() {
            return Err(ArcheryError::TournamentFinished);
        }
        let cursor = self
            .cursor
            .clone()
            .ok_or_else(|| ArcheryError::MismatchedRoundState("no active match".to_string()))?;
        let advance = progression::forfeit(&self.bracket, &cursor, &self.engine, &mut self.rng)?;
        self.live = None;
        Ok(self.apply(advance).unwrap_or(Standing::Forfeited))
    }

    /// Simulate the tracked competitor's matches until the tournament ends.
    pub fn run_to_completion(&mut self) -> Result<Standing> {
        loop {
            if let Some(standing) = &self.standing {
                return Ok(standing.clone());
            }
            let finished = self.live.as_ref().is_some_and(|m| m.completed);
            if !finished {
                self.simulate_tracked_match()?;
            }
            if let Some(standing) = self.complete_active_match()? {
                return Ok(standing);
            }
        }
    }

    fn apply(&mut self, advance: Advance) -> Option<Standing> {
        let Advance {
            bracket,
            cursor,
            standing,
            events,
        } = advance;
        self.bracket = bracket;
        self.cursor = cursor;
        self.events.extend(events);

        if let Some(standing) = &standing {
            self.standing = Some(standing.clone());
            self.record = Some(TournamentRecord::capture(
                &self.bracket,
                &self.competitors,
                self.config.distance,
                standing.clone(),
            ));
        }
        standing
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
