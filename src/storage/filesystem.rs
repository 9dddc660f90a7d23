use super::store::HistoryStore;
use crate::error::{IvoneError, Result};
use crate::models::{Message, PersistedHistorySnapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const HISTORY_FILE_NAME: &str = "ivone_chat_history.json";

/// Keeps the snapshot as one JSON file in the user's cache directory.
pub struct FilesystemHistoryStore {
    dir: PathBuf,
}

impl FilesystemHistoryStore {
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .unwrap_or_else(std::env::temp_dir)
            .join("ivone")
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE_NAME)
    }

    fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                IvoneError::StorageError(format!(
                    "failed to create {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for FilesystemHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FilesystemHistoryStore {
    fn save(&self, messages: &[Message]) -> Result<()> {
        Self::ensure_dir(&self.dir)?;

        let snapshot = PersistedHistorySnapshot::now(messages);
        let content = serde_json::to_string_pretty(&snapshot)?;

        // Write next to the target and rename so a crash never leaves half a file.
        let target = self.path();
        let tmp = self.dir.join(format!("{}.tmp", HISTORY_FILE_NAME));
        fs::write(&tmp, content)
            .and_then(|_| fs::rename(&tmp, &target))
            .map_err(|e| {
                IvoneError::StorageError(format!("failed to write {}: {}", target.display(), e))
            })?;

        tracing::debug!(path = %target.display(), count = messages.len(), "history saved");
        Ok(())
    }

    fn load(&self) -> Vec<Message> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<PersistedHistorySnapshot>(&content) {
            Ok(snapshot) => snapshot.messages,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable history");
                Vec::new()
            }
        }
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IvoneError::StorageError(format!(
                "failed to remove {}: {}",
                self.path().display(),
                e
            ))),
        }
    }
}
