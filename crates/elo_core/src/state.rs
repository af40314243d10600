//! Cumulative leaderboard state persisted between runs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::game::Side;
use crate::rating::{round_to_tenth, INITIAL_RATING};

fn initial_rating() -> f64 {
    INITIAL_RATING
}

/// Ratings and counters for a single agent
///
/// Every field is optional in the persisted document and falls back to the
/// value a brand-new agent starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    #[serde(default = "initial_rating")]
    pub general_elo: f64,
    #[serde(default = "initial_rating")]
    pub werewolf_elo: f64,
    #[serde(default = "initial_rating")]
    pub villager_elo: f64,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub games_as_werewolf: u32,
    #[serde(default)]
    pub games_as_villager: u32,
    #[serde(default)]
    pub wins_as_werewolf: u32,
    #[serde(default)]
    pub wins_as_villager: u32,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            general_elo: INITIAL_RATING,
            werewolf_elo: INITIAL_RATING,
            villager_elo: INITIAL_RATING,
            games_played: 0,
            wins: 0,
            losses: 0,
            games_as_werewolf: 0,
            games_as_villager: 0,
            wins_as_werewolf: 0,
            wins_as_villager: 0,
        }
    }
}

impl AgentState {
    /// Rating tracked for games played on `side`
    pub fn side_elo(&self, side: Side) -> f64 {
        match side {
            Side::Werewolf => self.werewolf_elo,
            Side::Villager => self.villager_elo,
        }
    }

    pub fn side_elo_mut(&mut self, side: Side) -> &mut f64 {
        match side {
            Side::Werewolf => &mut self.werewolf_elo,
            Side::Villager => &mut self.villager_elo,
        }
    }

    /// Count one finished game towards the general and role counters.
    pub fn record_game(&mut self, side: Side, won: bool) {
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        let (games, wins) = match side {
            Side::Werewolf => (&mut self.games_as_werewolf, &mut self.wins_as_werewolf),
            Side::Villager => (&mut self.games_as_villager, &mut self.wins_as_villager),
        };
        *games += 1;
        if won {
            *wins += 1;
        }
    }

    /// Percentage of games won, rounded to one decimal place
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        round_to_tenth(f64::from(self.wins) * 100.0 / f64::from(self.games_played))
    }
}

/// Everything the leaderboard carries from one run to the next
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EloState {
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Agent identifier -> cumulative state
    #[serde(default)]
    pub agents: BTreeMap<String, AgentState>,
    /// Games already folded into `agents`
    #[serde(default)]
    pub processed_games: BTreeSet<String>,
}

impl EloState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, game_id: &str) -> bool {
        self.processed_games.contains(game_id)
    }

    /// Mark a game as folded in. Returns false if it already was.
    pub fn mark_processed(&mut self, game_id: &str) -> bool {
        self.processed_games.insert(game_id.to_string())
    }

    /// Current general rating, `INITIAL_RATING` for unseen agents
    pub fn general_elo(&self, agent_id: &str) -> f64 {
        self.agents
            .get(agent_id)
            .map_or(INITIAL_RATING, |agent| agent.general_elo)
    }

    /// Get or initialize an agent's state
    pub fn agent_mut(&mut self, agent_id: &str) -> &mut AgentState {
        self.agents.entry(agent_id.to_string()).or_default()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
