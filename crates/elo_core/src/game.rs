//! Game result payload parsing
//!
//! A game payload looks like:
//!
//! ```json
//! {
//!   "participants": { "Player_1": "agent-id", ... },
//!   "results": [
//!     {
//!       "scores": [{ "player_name": "Player_1", "team": "werewolves", "role": "werewolf",
//!                    "won": true, "metrics": { "aggregate_score": 0.71 } }],
//!       "winner": "werewolves",
//!       "action_log": [{ "timestamp": "2025-01-01T00:00:00Z", ... }]
//!     }
//!   ]
//! }
//! ```
//!
//! Unknown fields are ignored here and left untouched in the payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::GameError;

/// Number of participant slots a rated game must fill.
pub const ROSTER_SIZE: usize = 8;

/// Team label of the werewolf side; every other label plays as a villager.
pub const WEREWOLF_TEAM: &str = "werewolves";

/// Which role-specific rating a player's game counts towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Werewolf,
    Villager,
}

impl Side {
    pub fn from_team(team: &str) -> Self {
        if team == WEREWOLF_TEAM {
            Side::Werewolf
        } else {
            Side::Villager
        }
    }
}

/// One player's outcome inside a result block's `scores` list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerScore {
    pub player_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub won: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Metrics,
    /// Delta written by a previous run, if any
    #[serde(default)]
    pub elo_delta: Option<f64>,
    /// Post-game rating written by a previous run, if any
    #[serde(default)]
    pub elo_after: Option<f64>,
}

impl PlayerScore {
    pub fn side(&self) -> Side {
        Side::from_team(&self.team)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Metrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aggregate_score: f64,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct RawGame {
    /// Slot -> agent; a `null` agent leaves the slot unmapped
    #[serde(default, deserialize_with = "null_as_default")]
    participants: BTreeMap<String, Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    scores: Option<Vec<PlayerScore>>,
    winner: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    action_log: Vec<RawAction>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    #[serde(default)]
    timestamp: Option<Value>,
}

impl RawGame {
    fn from_payload(payload: &Value) -> Result<Self, GameError> {
        Ok(RawGame::deserialize(payload)?)
    }

    /// First and last event timestamps across every result block.
    ///
    /// Timestamps are ISO-8601 strings in one canonical form, so the
    /// lexicographic order is the chronological one.
    fn event_window(&self) -> (Option<String>, Option<String>) {
        let mut timestamps = self
            .results
            .iter()
            .flat_map(|result| &result.action_log)
            .filter_map(|action| action.timestamp.as_ref()?.as_str())
            .filter(|ts| !ts.is_empty());

        let Some(first) = timestamps.next() else {
            return (None, None);
        };
        let (start, end) = timestamps.fold((first, first), |(start, end), ts| {
            (start.min(ts), end.max(ts))
        });
        (Some(start.to_string()), Some(end.to_string()))
    }
}

/// A validated game, ready to be folded into the leaderboard
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// File name the game was read from; doubles as its processed-set key
    pub id: String,
    /// Player slot -> agent identifier, `None` for a `null` slot
    pub participants: BTreeMap<String, Option<String>>,
    /// Per-player outcomes in input order
    pub scores: Vec<PlayerScore>,
    /// Index of the result block the scores came from
    pub scores_block: usize,
    pub winner: Option<Value>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl GameRecord {
    /// Parse and validate a game payload.
    ///
    /// Rejects games whose participant mapping does not have exactly
    /// `roster_size` slots, and games where no result block has a non-empty
    /// `scores` list.
    pub fn parse(
        id: impl Into<String>,
        payload: &Value,
        roster_size: usize,
    ) -> Result<Self, GameError> {
        let raw = RawGame::from_payload(payload)?;

        if raw.participants.len() != roster_size {
            return Err(GameError::RosterSize {
                found: raw.participants.len(),
                expected: roster_size,
            });
        }

        let (start_time, end_time) = raw.event_window();

        let (scores_block, result) = raw
            .results
            .iter()
            .enumerate()
            .find(|(_, result)| result.scores.as_ref().is_some_and(|s| !s.is_empty()))
            .ok_or(GameError::MissingScores)?;

        Ok(Self {
            id: id.into(),
            scores: result.scores.clone().unwrap_or_default(),
            winner: result.winner.clone(),
            scores_block,
            participants: raw.participants,
            start_time,
            end_time,
        })
    }

    /// Agent playing in `slot`; empty mappings count as unmapped.
    pub fn agent_for(&self, slot: &str) -> Option<&str> {
        self.participants
            .get(slot)
            .and_then(Option::as_deref)
            .filter(|agent| !agent.is_empty())
    }
}

/// The facts about a processed game the games index needs
///
/// Built without roster validation so that every processed file is listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub filename: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Distinct agents, sorted
    pub participants: Vec<String>,
    pub participant_count: usize,
    pub winner: Option<Value>,
}

impl GameSummary {
    pub fn from_payload(filename: impl Into<String>, payload: &Value) -> Result<Self, GameError> {
        let raw = RawGame::from_payload(payload)?;
        let (start_time, end_time) = raw.event_window();
        let participants: BTreeSet<&String> = raw.participants.values().flatten().collect();

        Ok(Self {
            filename: filename.into(),
            start_time,
            end_time,
            participants: participants.into_iter().cloned().collect(),
            participant_count: raw.participants.len(),
            winner: first_winner(payload),
        })
    }
}

/// `winner` of the first result block carrying the key, `None` if that one is `null`.
fn first_winner(payload: &Value) -> Option<Value> {
    payload
        .get("results")?
        .as_array()?
        .iter()
        .find_map(|block| block.get("winner"))
        .filter(|winner| !winner.is_null())
        .cloned()
}

/// Rating result to write back into one entry of a game's scores list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAnnotation {
    /// Position in the scores list
    pub index: usize,
    pub elo_delta: f64,
    pub elo_after: f64,
}

/// Write `elo_delta` and `elo_after` into the scores list of a raw payload.
///
/// All other fields, and the key order of each entry, are preserved.
pub fn annotate_scores(payload: &mut Value, scores_block: usize, annotations: &[ScoreAnnotation]) {
    let Some(scores) = payload
        .get_mut("results")
        .and_then(|results| results.get_mut(scores_block))
        .and_then(|block| block.get_mut("scores"))
        .and_then(Value::as_array_mut)
    else {
        tracing::warn!(scores_block, "scores list missing, cannot annotate");
        return;
    };

    for annotation in annotations {
        if let Some(entry) = scores.get_mut(annotation.index).and_then(Value::as_object_mut) {
            set_number(entry, "elo_delta", annotation.elo_delta);
            set_number(entry, "elo_after", annotation.elo_after);
        }
    }
}

fn set_number(entry: &mut Map<String, Value>, key: &str, value: f64) {
    entry.insert(key.to_string(), Value::from(value));
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
