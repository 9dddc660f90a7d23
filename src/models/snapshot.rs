use super::Message;
use serde::{Deserialize, Serialize};

/// Durable form of the display history.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PersistedHistorySnapshot {
    pub messages: Vec<Message>,
    /// Milliseconds since the Unix epoch.
    pub last_updated: i64,
}

impl PersistedHistorySnapshot {
    pub fn now(messages: &[Message]) -> Self {
        Self {
            messages: messages.to_vec(),
            last_updated: chrono::Utc::now().timestamp_millis(),
        }
    }
}
