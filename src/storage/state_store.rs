//! StateStore — atomic JSON snapshot of `AgentState`, with rolling backups.

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::defaults::MAX_STATE_BACKUPS;
use crate::types::AgentState;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error reading/writing {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("failed to serialize agent state: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct StateStore {
    dir: PathBuf,
    current_file: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let current_file = dir.join("current_state.json");
        Self { dir, current_file }
    }

    /// Write `state` atomically (temp file + rename) and rotate backups,
    /// dropping the oldest once more than `MAX_STATE_BACKUPS` accumulate.
    pub fn save(&self, state: &AgentState) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::Io(self.dir.clone(), e))?;

        let payload = serde_json::to_vec_pretty(state)?;
        let tmp_path = self.current_file.with_extension("json.tmp");
        std::fs::write(&tmp_path, &payload).map_err(|e| StorageError::Io(tmp_path.clone(), e))?;
        std::fs::rename(&tmp_path, &self.current_file).map_err(|e| StorageError::Io(self.current_file.clone(), e))?;

        let backup_name = format!("state_{}.json", Utc::now().format("%Y%m%d_%H%M%S_%6f"));
        let backup_path = self.dir.join(backup_name);
        std::fs::write(&backup_path, &payload).map_err(|e| StorageError::Io(backup_path, e))?;
        self.rotate_backups()?;

        info!(path = %self.current_file.display(), "agent state saved");
        Ok(())
    }

    /// Load the current state snapshot. Unknown fields are ignored by serde
    /// by default, so old snapshots stay loadable across additive schema
    /// changes.
    pub fn load(&self) -> Result<Option<AgentState>, StorageError> {
        if !self.current_file.exists() {
            return Ok(None);
        }
        let raw = std::fs::read(&self.current_file).map_err(|e| StorageError::Io(self.current_file.clone(), e))?;
        let state = serde_json::from_slice(&raw)?;
        Ok(Some(state))
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        let mut backups = self.list_backups()?;
        backups.sort();
        while backups.len() > MAX_STATE_BACKUPS {
            let oldest = backups.remove(0);
            if let Err(e) = std::fs::remove_file(&oldest) {
                warn!(path = %oldest.display(), error = %e, "failed to remove old state backup");
            }
        }
        Ok(())
    }

    fn list_backups(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut backups = Vec::new();
        if !self.dir.exists() {
            return Ok(backups);
        }
        for entry in std::fs::read_dir(&self.dir).map_err(|e| StorageError::Io(self.dir.clone(), e))? {
            let entry = entry.map_err(|e| StorageError::Io(self.dir.clone(), e))?;
            let path = entry.path();
            if path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with("state_") && n.ends_with(".json")) {
                backups.push(path);
            }
        }
        Ok(backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_state_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let state = AgentState::new(100);
        store.save(&state).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.last_updated, 100);
    }

    #[test]
    fn load_returns_none_when_no_snapshot_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn rotates_backups_beyond_the_configured_maximum() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        for i in 0..(MAX_STATE_BACKUPS as i64 + 5) {
            let state = AgentState::new(i);
            store.save(&state).unwrap();
        }
        let backups = store.list_backups().unwrap();
        assert!(backups.len() <= MAX_STATE_BACKUPS);
    }
}
