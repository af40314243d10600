//! Reasons a game record is not folded into the leaderboard.

use thiserror::Error;

/// Why a game payload was rejected.
///
/// Every variant is skippable: the game is left out of the processed set and
/// picked up again on the next run, so a fixed file eventually counts.
#[derive(Debug, Error)]
pub enum GameError {
    /// The participant mapping does not fill the roster.
    #[error("has {found} participants, need {expected}")]
    RosterSize { found: usize, expected: usize },

    /// No result block carries a non-empty `scores` list.
    #[error("no scores found")]
    MissingScores,

    /// The payload does not have the shape of a game record.
    #[error("malformed game record: {0}")]
    Malformed(#[from] serde_json::Error),
}
