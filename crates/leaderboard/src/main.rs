//! Elo calculator CLI
//!
//! Rate new werewolf games and regenerate the leaderboard indexes.

use anyhow::Context;
use clap::{Parser, Subcommand};
use elo_core::EloState;
use leaderboard::{load_state, run, LadderConfig, RunMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Elo rating calculator for the werewolf agent leaderboard.
#[derive(Parser)]
struct Options {
    /// TOML file with leaderboard settings.
    #[clap(short, long, env = "ELO_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of game result files (one JSON file per game).
    #[clap(short, long, env = "ELO_RESULTS_DIR")]
    results_dir: Option<PathBuf>,

    /// Directory the front-end indexes are written to.
    #[clap(short, long, env = "ELO_INDEXES_DIR")]
    indexes_dir: Option<PathBuf>,

    /// File holding the cumulative rating state.
    #[clap(short, long, env = "ELO_STATE_FILE")]
    state_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rate games not yet processed and rebuild the indexes (default).
    Update,
    /// Discard the saved state and re-rate every game from scratch.
    Replay,
    /// Print the current rankings without processing anything.
    Show,
}

impl Options {
    fn ladder_config(&self) -> anyhow::Result<LadderConfig> {
        let mut config = match &self.config {
            Some(path) => LadderConfig::load(path)?,
            None => LadderConfig::default(),
        };
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(dir) = &self.indexes_dir {
            config.indexes_dir = dir.clone();
        }
        if let Some(file) = &self.state_file {
            config.state_file = file.clone();
        }
        Ok(config)
    }
}

fn print_rankings(state: &EloState) {
    let mut agents: Vec<_> = state.agents.iter().collect();
    agents.sort_by(|a, b| b.1.general_elo.total_cmp(&a.1.general_elo));

    println!("\n=== Current Elo Rankings ===");
    println!(
        "{:>4}  {:<40} {:>8} {:>6} {:>6} {:>6}",
        "#", "Agent", "Elo", "Games", "W", "L"
    );
    println!("{}", "-".repeat(76));
    for (i, (agent_id, agent)) in agents.into_iter().enumerate() {
        println!(
            "{:>4}  {:<40} {:>8.0} {:>6} {:>6} {:>6}",
            i + 1,
            agent_id,
            agent.general_elo,
            agent.games_played,
            agent.wins,
            agent.losses
        );
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(true)
        .init();
    let opt = Options::parse();
    let config = opt.ladder_config()?;

    let mode = match opt.command.unwrap_or(Command::Update) {
        Command::Update => RunMode::Update,
        Command::Replay => RunMode::Replay,
        Command::Show => {
            let state = load_state(&config.state_file)?;
            print_rankings(&state);
            return Ok(());
        }
    };

    let results_dir = config.results_dir.clone();
    let (summary, state) = run(config, mode)
        .with_context(|| format!("elo run over {} failed", results_dir.display()))?;

    println!(
        "Summary: {} new games, {} files modified, {} skipped ({} files found)",
        summary.new_games, summary.files_modified, summary.skipped, summary.files_found
    );
    if !state.agents.is_empty() {
        print_rankings(&state);
    }
    Ok(())
}
