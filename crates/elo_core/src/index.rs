//! Read-optimized documents for the leaderboard front-end
//!
//! Each projection is rebuilt from scratch out of the final state, so the
//! indexes never carry state of their own. Timestamps are supplied by the
//! caller to keep the projections pure.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::accumulator::{AgentHistories, DeltaEntry};
use crate::game::GameSummary;
use crate::state::{AgentState, EloState};

/// Default base of the per-game traceability link
pub const TRACE_BASE_URL: &str = "https://agentbeats.dev";

/// Newest first; games without an end time sort last.
fn by_end_time_desc(a: Option<&str>, b: Option<&str>) -> Ordering {
    b.unwrap_or("").cmp(a.unwrap_or(""))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameListEntry {
    pub filename: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub participants: Vec<String>,
    pub participant_count: usize,
    pub winner: Option<Value>,
    pub traceability_url: String,
}

impl GameListEntry {
    pub fn new(summary: GameSummary, trace_base_url: &str) -> Self {
        let stem = summary.filename.replace(".json", "");
        Self {
            traceability_url: format!("{}/{stem}", trace_base_url.trim_end_matches('/')),
            filename: summary.filename,
            start_time: summary.start_time,
            end_time: summary.end_time,
            participants: summary.participants,
            participant_count: summary.participant_count,
            winner: summary.winner,
        }
    }
}

/// `games.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamesIndex {
    pub last_updated: String,
    pub total_games: usize,
    pub games: Vec<GameListEntry>,
}

/// List every processed game, most recently finished first.
pub fn games_index(
    summaries: impl IntoIterator<Item = GameSummary>,
    trace_base_url: &str,
    last_updated: &str,
) -> GamesIndex {
    let mut games: Vec<GameListEntry> = summaries
        .into_iter()
        .map(|summary| GameListEntry::new(summary, trace_base_url))
        .collect();
    games.sort_by(|a, b| by_end_time_desc(a.end_time.as_deref(), b.end_time.as_deref()));

    GamesIndex {
        last_updated: last_updated.to_string(),
        total_games: games.len(),
        games,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub agent_id: String,
    pub general_elo: f64,
    pub werewolf_elo: f64,
    pub villager_elo: f64,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub games_as_werewolf: u32,
    pub games_as_villager: u32,
    pub wins_as_werewolf: u32,
    pub wins_as_villager: u32,
    pub rank: usize,
}

impl RankingEntry {
    fn new(agent_id: &str, agent: &AgentState) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            general_elo: agent.general_elo,
            werewolf_elo: agent.werewolf_elo,
            villager_elo: agent.villager_elo,
            games_played: agent.games_played,
            wins: agent.wins,
            losses: agent.losses,
            win_rate: agent.win_rate(),
            games_as_werewolf: agent.games_as_werewolf,
            games_as_villager: agent.games_as_villager,
            wins_as_werewolf: agent.wins_as_werewolf,
            wins_as_villager: agent.wins_as_villager,
            rank: 0,
        }
    }
}

/// `leaderboard.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub last_updated: String,
    pub total_agents: usize,
    pub rankings: Vec<RankingEntry>,
}

/// Rank every agent that has played, by general rating.
///
/// Equal ratings keep agent-id order.
pub fn leaderboard(state: &EloState, last_updated: &str) -> Leaderboard {
    let mut rankings: Vec<RankingEntry> = state
        .agents
        .iter()
        .filter(|(_, agent)| agent.games_played > 0)
        .map(|(agent_id, agent)| RankingEntry::new(agent_id, agent))
        .collect();
    rankings.sort_by(|a, b| b.general_elo.total_cmp(&a.general_elo));
    for (i, entry) in rankings.iter_mut().enumerate() {
        entry.rank = i + 1;
    }

    Leaderboard {
        last_updated: last_updated.to_string(),
        total_agents: rankings.len(),
        rankings,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentElo {
    pub general: f64,
    pub werewolf: f64,
    pub villager: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub games_as_werewolf: u32,
    pub games_as_villager: u32,
    pub wins_as_werewolf: u32,
    pub wins_as_villager: u32,
}

/// `agents/<agent_id>.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDocument {
    pub agent_id: String,
    pub last_updated: String,
    pub current_elo: CurrentElo,
    pub stats: AgentStats,
    pub game_history: Vec<DeltaEntry>,
}

impl AgentDocument {
    pub fn new(
        agent_id: &str,
        agent: &AgentState,
        history: &[DeltaEntry],
        last_updated: &str,
    ) -> Self {
        let mut game_history = history.to_vec();
        game_history.sort_by(|a, b| by_end_time_desc(a.end_time.as_deref(), b.end_time.as_deref()));

        Self {
            agent_id: agent_id.to_string(),
            last_updated: last_updated.to_string(),
            current_elo: CurrentElo {
                general: agent.general_elo,
                werewolf: agent.werewolf_elo,
                villager: agent.villager_elo,
            },
            stats: AgentStats {
                games_played: agent.games_played,
                wins: agent.wins,
                losses: agent.losses,
                games_as_werewolf: agent.games_as_werewolf,
                games_as_villager: agent.games_as_villager,
                wins_as_werewolf: agent.wins_as_werewolf,
                wins_as_villager: agent.wins_as_villager,
            },
            game_history,
        }
    }
}

/// One document per agent with any history.
///
/// Agents missing from `state` get the ratings of a new agent.
pub fn agent_documents(
    state: &EloState,
    histories: &AgentHistories,
    last_updated: &str,
) -> Vec<AgentDocument> {
    let unseen = AgentState::default();
    histories
        .iter()
        .map(|(agent_id, history)| {
            let agent = state.agents.get(agent_id).unwrap_or(&unseen);
            AgentDocument::new(agent_id, agent, history, last_updated)
        })
        .collect()
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod index_tests;
