//! High-score file
//!
//! A JSON object mapping screen id to best score. The file is re-read on
//! every access so two screens never overwrite each other's entries. A
//! missing or unreadable file counts as an empty table.

use std::path::{Path, PathBuf};

use handheld_core::highscore::HighScoreTable;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "high-score file: {}", e),
            StoreError::Json(e) => write!(f, "high-score encoding: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// High-score table persisted at a path
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current table; empty if the file is missing or corrupt
    pub fn load(&self) -> HighScoreTable {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HighScoreTable::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "high scores unreadable");
                return HighScoreTable::new();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "high scores corrupt, starting empty");
            HighScoreTable::new()
        })
    }

    /// Best score for `id`
    pub fn get(&self, id: &str) -> i64 {
        self.load().get(id)
    }

    /// Record a score; the file is only written for a new best
    pub fn record(&self, id: &str, score: i64) -> Result<bool, StoreError> {
        let mut table = self.load();
        if !table.record(id, score) {
            return Ok(false);
        }
        let json = serde_json::to_string_pretty(&table).map_err(StoreError::Json)?;
        std::fs::write(&self.path, json).map_err(StoreError::Io)?;
        tracing::info!(app = id, score, "new high score");
        Ok(true)
    }
}
