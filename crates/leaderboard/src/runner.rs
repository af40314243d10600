//! The batch run: fold new game files into the state, then rebuild indexes

use chrono::{SecondsFormat, Utc};
use elo_core::{
    agent_documents, annotate_scores, apply_game, games_index, leaderboard, AgentHistories,
    EloState, GameRecord, GameSummary,
};
use std::path::Path;

use crate::config::LadderConfig;
use crate::error::{LadderError, Result};
use crate::store;

/// How a run treats the state left by previous runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Continue from the saved state, rating only games not yet processed
    #[default]
    Update,
    /// Ignore saved state and histories and re-rate every game file
    Replay,
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Result files found in the results directory
    pub files_found: usize,
    /// Games folded into the state during this run
    pub new_games: usize,
    /// Game files rewritten with new rating annotations
    pub files_modified: usize,
    /// Games rejected or unreadable, left for the next run
    pub skipped: usize,
}

/// Current UTC time as ISO-8601 with a `Z` suffix
pub fn utc_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Leaderboard state for the duration of one run
#[derive(Debug)]
pub struct Ladder {
    config: LadderConfig,
    state: EloState,
    histories: AgentHistories,
}

impl Ladder {
    /// Load the state and agent histories left by the previous run.
    pub fn open(config: LadderConfig) -> Result<Self> {
        let state = store::load_state(&config.state_file)?;
        let histories = store::load_agent_histories(&config.agents_dir());
        tracing::info!(
            agents = state.agents.len(),
            processed = state.processed_games.len(),
            "loaded state"
        );
        Ok(Self {
            config,
            state,
            histories,
        })
    }

    /// Start from an empty state, as if no game had ever been rated.
    pub fn fresh(config: LadderConfig) -> Self {
        Self {
            config,
            state: EloState::new(),
            histories: AgentHistories::new(),
        }
    }

    pub fn state(&self) -> &EloState {
        &self.state
    }

    pub fn histories(&self) -> &AgentHistories {
        &self.histories
    }

    /// Fold every not-yet-processed game file into the state, in file name order.
    pub fn process_games(&mut self) -> Result<RunSummary> {
        let files = store::discover_games(&self.config.results_dir)?;
        let mut summary = RunSummary {
            files_found: files.len(),
            ..Default::default()
        };
        tracing::info!(files = files.len(), "found result files");

        for path in &files {
            let id = store::game_id(path);
            if self.state.is_processed(&id) {
                tracing::debug!(game = %id, "already processed");
                continue;
            }
            match self.process_game(path, &id)? {
                GameOutcome::Applied { modified } => {
                    summary.new_games += 1;
                    if modified {
                        summary.files_modified += 1;
                    }
                }
                GameOutcome::Skipped => summary.skipped += 1,
            }
        }

        tracing::info!(
            new_games = summary.new_games,
            files_modified = summary.files_modified,
            skipped = summary.skipped,
            "processed games"
        );
        Ok(summary)
    }

    fn process_game(&mut self, path: &Path, id: &str) -> Result<GameOutcome> {
        let mut payload = match store::read_json(path) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(game = id, ?err, "skipping unreadable game");
                return Ok(GameOutcome::Skipped);
            }
        };

        let record = match GameRecord::parse(id, &payload, self.config.roster_size) {
            Ok(record) => record,
            Err(reason) => {
                tracing::warn!(game = id, %reason, "skipping game");
                return Ok(GameOutcome::Skipped);
            }
        };

        let Some(update) = apply_game(&mut self.state, &record) else {
            return Ok(GameOutcome::Skipped);
        };
        tracing::info!(game = id, players = update.deltas.len(), "processed game");
        for delta in &update.deltas {
            tracing::info!(
                player = %delta.entry.player_name,
                agent = %delta.agent_id,
                "{:.0} -> {:.0} ({:+})",
                delta.entry.elo_before,
                delta.entry.elo_after,
                delta.entry.elo_delta
            );
        }
        update.record_into(&mut self.histories);

        if update.modified {
            annotate_scores(&mut payload, record.scores_block, &update.annotations);
            store::write_json(path, &payload)?;
        }
        Ok(GameOutcome::Applied {
            modified: update.modified,
        })
    }

    /// Persist the state and regenerate every index document.
    pub fn finish(mut self) -> Result<EloState> {
        let now = utc_now();
        self.state.last_updated = Some(now.clone());
        store::save_state(&self.config.state_file, &self.state)?;
        tracing::info!(path = %self.config.state_file.display(), "saved state");

        let summaries = self.processed_summaries();
        let games = games_index(summaries, &self.config.trace_base_url, &now);
        store::write_json(&self.config.games_index_path(), &games)?;
        tracing::info!(games = games.total_games, "wrote games index");

        let board = leaderboard(&self.state, &now);
        store::write_json(&self.config.leaderboard_path(), &board)?;
        tracing::info!(agents = board.total_agents, "wrote leaderboard");

        let documents = agent_documents(&self.state, &self.histories, &now);
        store::write_agent_documents(&self.config.agents_dir(), &documents)?;
        tracing::info!(agents = documents.len(), "wrote agent documents");

        Ok(self.state)
    }

    /// Summaries of every processed game whose file is still present
    fn processed_summaries(&self) -> Vec<GameSummary> {
        self.state
            .processed_games
            .iter()
            .filter_map(|id| {
                let path = self.config.results_dir.join(id);
                if !path.exists() {
                    return None;
                }
                let payload = store::read_json(&path)
                    .map_err(|err| tracing::warn!(game = %id, ?err, "cannot index game"))
                    .ok()?;
                GameSummary::from_payload(id.as_str(), &payload)
                    .map_err(|reason| tracing::warn!(game = %id, %reason, "cannot index game"))
                    .ok()
            })
            .collect()
    }
}

enum GameOutcome {
    Applied { modified: bool },
    Skipped,
}

/// Run the whole batch: process new games, save state, write indexes.
///
/// A missing results directory aborts before anything is loaded or written.
pub fn run(config: LadderConfig, mode: RunMode) -> Result<(RunSummary, EloState)> {
    if !config.results_dir.is_dir() {
        return Err(LadderError::MissingResultsDir(config.results_dir));
    }

    let mut ladder = match mode {
        RunMode::Update => Ladder::open(config)?,
        RunMode::Replay => Ladder::fresh(config),
    };
    let summary = ladder.process_games()?;
    let state = ladder.finish()?;
    Ok((summary, state))
}
