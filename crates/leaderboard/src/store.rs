//! Whole-file JSON storage for game results, state and indexes

use elo_core::{AgentDocument, AgentHistories, DeltaEntry, EloState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LadderError, Result};

/// Read and parse a JSON file
pub fn read_json(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).map_err(|e| LadderError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| LadderError::json(path, e))
}

/// Write a value as pretty-printed JSON, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| LadderError::json(path, e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LadderError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| LadderError::io(path, e))
}

/// Load the cumulative state, starting empty if the file does not exist yet
pub fn load_state(path: &Path) -> Result<EloState> {
    if !path.exists() {
        return Ok(EloState::new());
    }
    let contents = fs::read_to_string(path).map_err(|e| LadderError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| LadderError::json(path, e))
}

pub fn save_state(path: &Path, state: &EloState) -> Result<()> {
    write_json(path, state)
}

/// All `*.json` files in `dir`, sorted by file name
pub fn discover_games(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(LadderError::MissingResultsDir(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| LadderError::io(dir, e))? {
        let path = entry.map_err(|e| LadderError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// The identifier a game file is tracked under
pub fn game_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name stem for an agent document; path separators become `_`.
pub fn safe_agent_filename(agent_id: &str) -> String {
    agent_id.replace(['/', '\\'], "_")
}

#[derive(Deserialize)]
struct StoredAgentDocument {
    agent_id: Option<String>,
    #[serde(default)]
    game_history: Vec<DeltaEntry>,
}

/// Read the histories written by the previous run.
///
/// Unreadable documents are logged and skipped, leaving that agent's history
/// empty.
pub fn load_agent_histories(dir: &Path) -> AgentHistories {
    let mut histories = AgentHistories::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return histories;
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let document = fs::read_to_string(&path)
            .map_err(|e| LadderError::io(&path, e))
            .and_then(|contents| {
                serde_json::from_str::<StoredAgentDocument>(&contents)
                    .map_err(|e| LadderError::json(&path, e))
            });
        match document {
            Ok(StoredAgentDocument {
                agent_id: Some(agent_id),
                game_history,
            }) if !agent_id.is_empty() => {
                histories.insert(agent_id, game_history);
            }
            Ok(_) => tracing::warn!(path = %path.display(), "agent document has no agent_id"),
            Err(err) => tracing::warn!(?err, "could not load agent history"),
        }
    }
    histories
}

pub fn write_agent_documents(dir: &Path, documents: &[AgentDocument]) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| LadderError::io(dir, e))?;
    for document in documents {
        let path = dir.join(format!("{}.json", safe_agent_filename(&document.agent_id)));
        write_json(&path, document)?;
    }
    Ok(())
}
