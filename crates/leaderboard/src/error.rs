//! Errors raised while reading and writing leaderboard files.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LadderError>;

#[derive(Debug, Error)]
pub enum LadderError {
    /// Nothing to rate; the run stops before touching any state.
    #[error("results directory {} does not exist", .0.display())]
    MissingResultsDir(PathBuf),

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl LadderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
