//! Core of the werewolf Elo leaderboard
//!
//! This crate provides the storage-agnostic pieces of the leaderboard:
//! - The Elo rating model (expected score, rating delta)
//! - Parsing of per-game result payloads
//! - Folding games into cumulative per-agent state
//! - Projecting that state into the front-end index documents
//!
//! Reading and writing files is left to the caller, which hands in parsed
//! JSON values and gets back documents to persist.

pub mod accumulator;
pub mod error;
pub mod game;
pub mod index;
pub mod rating;
pub mod state;

pub use accumulator::*;
pub use error::*;
pub use game::*;
pub use index::*;
pub use rating::*;
pub use state::*;
