//! Tournament history: immutable snapshots of finished brackets

use archery_core::{field, Bracket, Competitor, Distance, Match};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progression::{standing_from_bracket, Standing};

/// Snapshot of a finished tournament.
///
/// Holds its own deep copy of the bracket and field, so nothing that happens
/// to a live session afterwards can change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub field_size: usize,
    pub tracked_name: String,
    pub tracked_skill: f64,
    pub distance: Distance,
    pub standing: Standing,
    /// Completed matches involving the tracked competitor, in bracket order
    pub tracked_matches: Vec<Match>,
    pub bracket: Bracket,
    pub competitors: Vec<Competitor>,
}

impl TournamentRecord {
    pub fn capture(
        bracket: &Bracket,
        competitors: &[Competitor],
        distance: Distance,
        standing: Standing,
    ) -> Self {
        let tracked = field::tracked(competitors);
        let tracked_matches = tracked
            .map(|c| bracket.matches_for(&c.id).into_iter().cloned().collect())
            .unwrap_or_default();

        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            field_size: competitors.len(),
            tracked_name: tracked.map(|c| c.name.clone()).unwrap_or_else(|| "User".to_string()),
            tracked_skill: tracked.map_or(0.0, |c| c.skill),
            distance,
            standing,
            tracked_matches,
            bracket: bracket.clone(),
            competitors: competitors.to_vec(),
        }
    }

    pub fn tracked(&self) -> Option<&Competitor> {
        field::tracked(&self.competitors)
    }

    /// Standing recomputed from the stored bracket.
    pub fn replayed_standing(&self) -> Option<Standing> {
        standing_from_bracket(&self.bracket, &self.tracked()?.id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Finished tournaments, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    records: Vec<TournamentRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TournamentRecord) {
        self.records.insert(0, record);
    }

    pub fn records(&self) -> &[TournamentRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&TournamentRecord> {
        self.records.first()
    }

    pub fn get(&self, id: Uuid) -> Option<&TournamentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of medals won across the log, as (gold, silver, bronze).
    pub fn medal_count(&self) -> (usize, usize, usize) {
        self.records.iter().fold((0, 0, 0), |(g, s, b), r| match r.standing {
            Standing::Gold => (g + 1, s, b),
            Standing::Silver => (g, s + 1, b),
            Standing::Bronze => (g, s, b + 1),
            _ => (g, s, b),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod history_tests;
