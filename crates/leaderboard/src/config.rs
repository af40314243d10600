//! Leaderboard configuration
//!
//! Read from a TOML file; every key is optional:
//!
//! ```toml
//! results_dir = "results"
//! indexes_dir = "indexes"
//! state_file = "elo_state.json"
//! roster_size = 8
//! trace_base_url = "https://agentbeats.dev"
//! ```

use elo_core::{ROSTER_SIZE, TRACE_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LadderError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Directory holding one JSON file per game
    pub results_dir: PathBuf,
    /// Directory the front-end indexes are written to
    pub indexes_dir: PathBuf,
    /// Cumulative rating state carried between runs
    pub state_file: PathBuf,
    /// Participant slots a game must fill to be rated
    pub roster_size: usize,
    /// Base of each game's traceability link
    pub trace_base_url: String,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            indexes_dir: PathBuf::from("indexes"),
            state_file: PathBuf::from("elo_state.json"),
            roster_size: ROSTER_SIZE,
            trace_base_url: TRACE_BASE_URL.to_string(),
        }
    }
}

impl LadderConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LadderError::io(path, e))?;
        Self::from_toml(&contents).map_err(|source| LadderError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Directory of the per-agent history documents
    pub fn agents_dir(&self) -> PathBuf {
        self.indexes_dir.join("agents")
    }

    pub fn games_index_path(&self) -> PathBuf {
        self.indexes_dir.join("games.json")
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.indexes_dir.join("leaderboard.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LadderConfig::from_toml("").unwrap();
        assert_eq!(config, LadderConfig::default());
        assert_eq!(config.roster_size, 8);
        assert_eq!(config.agents_dir(), PathBuf::from("indexes/agents"));
    }

    #[test]
    fn test_partial_config() {
        let config = LadderConfig::from_toml(
            r#"
            results_dir = "data/results"
            roster_size = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.results_dir, PathBuf::from("data/results"));
        assert_eq!(config.roster_size, 6);
        assert_eq!(config.state_file, PathBuf::from("elo_state.json"));
        assert_eq!(config.trace_base_url, "https://agentbeats.dev");
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(LadderConfig::from_toml("roster_size = \"eight\"").is_err());
    }
}
