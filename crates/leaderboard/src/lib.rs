//! Werewolf Elo leaderboard runner
//!
//! This crate drives `elo_core` over a directory of game result files:
//! - Rating every game not processed by an earlier run
//! - Writing rating deltas back into the game files
//! - Persisting cumulative state between runs
//! - Regenerating the front-end indexes
//!
//! # Usage
//!
//! ```bash
//! # Rate new games and rebuild the indexes
//! cargo run -p leaderboard -- update
//!
//! # Recompute everything from the result files alone
//! cargo run -p leaderboard -- replay --results-dir data/results
//! ```

mod config;
mod error;
mod runner;
mod store;

pub use config::*;
pub use error::*;
pub use runner::*;
pub use store::*;
