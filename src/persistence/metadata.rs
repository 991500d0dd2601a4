use super::files::{atomic_write, read_file};
use crate::engine::UndoHistory;
use crate::domain::TaskId;
use crate::error::StoreResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session state kept in meta.json so the timer survives between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default)]
    pub active_task_id: Option<TaskId>,
    #[serde(default)]
    pub active_started_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub last_paused_task_id: Option<TaskId>,
    #[serde(default)]
    pub item_symbol: String,
}

/// Load session metadata, default when the file doesn't exist
pub fn load_metadata<P: AsRef<Path>>(path: P) -> StoreResult<SessionMetadata> {
    match read_file(path)? {
        Some(content) => Ok(serde_json::from_str(&content)?),
        None => Ok(SessionMetadata::default()),
    }
}

pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &SessionMetadata) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    atomic_write(path, &json)
}

/// Load the undo/redo log, empty when the file doesn't exist
pub fn load_history<P: AsRef<Path>>(path: P) -> StoreResult<UndoHistory> {
    match read_file(path)? {
        Some(content) => Ok(serde_json::from_str(&content)?),
        None => Ok(UndoHistory::default()),
    }
}

pub fn save_history<P: AsRef<Path>>(path: P, history: &UndoHistory) -> StoreResult<()> {
    let json = serde_json::to_string(history)?;
    atomic_write(path, &json)
}
