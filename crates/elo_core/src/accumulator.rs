//! Folding games into cumulative leaderboard state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::game::{GameRecord, PlayerScore, ScoreAnnotation};
use crate::rating::{rating_delta, round_to_tenth, INITIAL_RATING};
use crate::state::{AgentState, EloState};

/// One player's result in one game, as shown in the agent's history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaEntry {
    pub game: String,
    pub player_name: String,
    pub role: String,
    pub team: String,
    pub won: bool,
    pub elo_before: f64,
    pub elo_delta: f64,
    pub elo_after: f64,
    /// Aggregate score metric as a percentage, one decimal place
    pub aggregate_score: f64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// A history entry together with the agent it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDelta {
    pub agent_id: String,
    pub entry: DeltaEntry,
}

/// Agent identifier -> game history, in the order games were applied
pub type AgentHistories = BTreeMap<String, Vec<DeltaEntry>>;

/// What applying a single game produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameUpdate {
    /// One entry per rated player, in scores-list order
    pub deltas: Vec<AgentDelta>,
    /// Values to write back into the game's scores list
    pub annotations: Vec<ScoreAnnotation>,
    /// Whether any annotation differs from what the payload already held
    pub modified: bool,
}

impl GameUpdate {
    /// Append this game's entries to the per-agent histories.
    pub fn record_into(&self, histories: &mut AgentHistories) {
        for delta in &self.deltas {
            histories
                .entry(delta.agent_id.clone())
                .or_default()
                .push(delta.entry.clone());
        }
    }
}

/// Fold one game into `state`.
///
/// Returns `None` if the game was already processed. Every player's delta is
/// computed against the same pre-game snapshot, so the order of the scores
/// list does not affect the result. The game is marked processed once all of
/// its players have been applied.
///
/// An agent filling several slots gets one entry per slot. Each entry's
/// `elo_after` is the snapshot rating plus that slot's delta only, while the
/// live rating receives the sum of all of them.
pub fn apply_game(state: &mut EloState, game: &GameRecord) -> Option<GameUpdate> {
    if state.is_processed(&game.id) {
        return None;
    }

    let snapshot: BTreeMap<&str, AgentState> = game
        .scores
        .iter()
        .filter_map(|score| game.agent_for(&score.player_name))
        .map(|agent_id| {
            let agent = state.agents.get(agent_id).cloned().unwrap_or_default();
            (agent_id, agent)
        })
        .collect();

    let mut update = GameUpdate::default();

    for (index, score) in game.scores.iter().enumerate() {
        let Some(agent_id) = game.agent_for(&score.player_name) else {
            continue;
        };
        let Some(before) = snapshot.get(agent_id) else {
            continue;
        };

        let side = score.side();
        let opponents_avg = opponents_average(game, score, &snapshot);

        let elo_before = before.general_elo;
        let elo_delta = rating_delta(elo_before, opponents_avg, score.won);
        let elo_after = round_to_tenth(elo_before + elo_delta);
        let side_delta = rating_delta(before.side_elo(side), opponents_avg, score.won);

        let agent = state.agent_mut(agent_id);
        agent.general_elo = round_to_tenth(agent.general_elo + elo_delta);
        let side_after = round_to_tenth(agent.side_elo(side) + side_delta);
        *agent.side_elo_mut(side) = side_after;
        agent.record_game(side, score.won);

        if score.elo_delta != Some(elo_delta) || score.elo_after != Some(elo_after) {
            update.modified = true;
        }
        update.annotations.push(ScoreAnnotation {
            index,
            elo_delta,
            elo_after,
        });

        tracing::debug!(
            game = %game.id,
            player = %score.player_name,
            agent = agent_id,
            elo_before,
            elo_after,
            elo_delta,
            "rated player"
        );

        update.deltas.push(AgentDelta {
            agent_id: agent_id.to_string(),
            entry: DeltaEntry {
                game: game.id.clone(),
                player_name: score.player_name.clone(),
                role: score.role.clone(),
                team: score.team.clone(),
                won: score.won,
                elo_before,
                elo_delta,
                elo_after,
                aggregate_score: round_to_tenth(score.metrics.aggregate_score * 100.0),
                start_time: game.start_time.clone(),
                end_time: game.end_time.clone(),
            },
        });
    }

    state.mark_processed(&game.id);
    Some(update)
}

/// Average pre-game general rating of every mapped player on another team.
///
/// Falls back to `INITIAL_RATING` when the game lists no opponents.
fn opponents_average(
    game: &GameRecord,
    player: &PlayerScore,
    snapshot: &BTreeMap<&str, AgentState>,
) -> f64 {
    let ratings: Vec<f64> = game
        .scores
        .iter()
        .filter(|other| other.player_name != player.player_name && other.team != player.team)
        .filter_map(|other| game.agent_for(&other.player_name))
        .map(|agent_id| {
            snapshot
                .get(agent_id)
                .map_or(INITIAL_RATING, |agent| agent.general_elo)
        })
        .collect();

    if ratings.is_empty() {
        return INITIAL_RATING;
    }
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

#[cfg(test)]
#[path = "accumulator_tests.rs"]
mod accumulator_tests;
