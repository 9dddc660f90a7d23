use crate::error::Result;
use crate::models::Message;

/// A single durable slot holding the serialized display history.
pub trait HistoryStore: Send + Sync {
    /// Replace the stored snapshot with `messages` stamped with the current time.
    fn save(&self, messages: &[Message]) -> Result<()>;

    /// Previously saved messages. Missing or unreadable data yields an empty list.
    fn load(&self) -> Vec<Message>;

    /// Remove the stored snapshot. Clearing an empty slot succeeds.
    fn clear(&self) -> Result<()>;
}

impl<T: HistoryStore + ?Sized> HistoryStore for Box<T> {
    fn save(&self, messages: &[Message]) -> Result<()> {
        (**self).save(messages)
    }

    fn load(&self) -> Vec<Message> {
        (**self).load()
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
