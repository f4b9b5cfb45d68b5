use std::fs;
use std::path::PathBuf;

use crate::error::ClawdError;
use crate::session::Turn;

/// Persists the session's turn sequence to a single JSON file.
///
/// The file holds one JSON array of `{"role", "content"}` objects and is
/// rewritten in full after every completed exchange. There is no schema
/// version and no migration path. Single writer, no locking.
pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the full turn sequence. An absent file is an empty history;
    /// malformed content surfaces as a JSON error.
    pub fn load(&self) -> Result<Vec<Turn>, ClawdError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let turns = serde_json::from_str(&contents)?;
        Ok(turns)
    }

    /// Serialize the full sequence and replace the file contents. Writes to a
    /// temporary sibling first and renames over the target so a crash
    /// mid-write cannot truncate existing history.
    pub fn save(&self, turns: &[Turn]) -> Result<(), ClawdError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(turns)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}
