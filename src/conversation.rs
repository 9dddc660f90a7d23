use crate::models::{ChatMessage, Message};

/// Default number of history entries sent with each request.
pub const MAX_CONTEXT_MESSAGES: usize = 10;

/// The display history of one session plus the bound applied to outbound
/// requests. Trimming only ever happens on the request copy.
#[derive(Debug, Clone)]
pub struct ConversationWindow {
    messages: Vec<Message>,
    max_context: usize,
}

impl ConversationWindow {
    pub fn new() -> Self {
        Self::with_max_context(MAX_CONTEXT_MESSAGES)
    }

    pub fn with_max_context(max_context: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_context,
        }
    }

    /// Rebuild a window from previously persisted messages, oldest first.
    pub fn from_messages(messages: Vec<Message>, max_context: usize) -> Self {
        Self {
            messages,
            max_context,
        }
    }

    /// Add a message to the end of the display history.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// System directive followed by at most the last `max_context` messages.
    pub fn to_request_payload(&self, system_directive: &str) -> Vec<ChatMessage> {
        let start = self.messages.len().saturating_sub(self.max_context);
        let mut payload = Vec::with_capacity(self.messages.len() - start + 1);
        payload.push(ChatMessage::system(system_directive));
        payload.extend(self.messages[start..].iter().map(ChatMessage::from));
        payload
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::models::Role::Assistant)
    }

    pub fn max_context(&self) -> usize {
        self.max_context
    }

    /// Timestamp for the next message, never earlier than the newest one held.
    pub fn next_timestamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.messages
            .last()
            .map_or(now, |last| now.max(last.timestamp))
    }
}

impl Default for ConversationWindow {
    fn default() -> Self {
        Self::new()
    }
}
