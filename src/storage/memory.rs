use super::store::HistoryStore;
use crate::error::Result;
use crate::models::{Message, PersistedHistorySnapshot};
use std::sync::Mutex;

/// Holds the serialized snapshot in memory. Used when history should not
/// outlive the process.
#[derive(Default)]
pub struct MemoryHistoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with raw text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn save(&self, messages: &[Message]) -> Result<()> {
        let content = serde_json::to_string(&PersistedHistorySnapshot::now(messages))?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| crate::error::IvoneError::StorageError("slot poisoned".to_string()))?;
        *slot = Some(content);
        Ok(())
    }

    fn load(&self) -> Vec<Message> {
        self.raw()
            .and_then(|raw| serde_json::from_str::<PersistedHistorySnapshot>(&raw).ok())
            .map(|snapshot| snapshot.messages)
            .unwrap_or_default()
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}
