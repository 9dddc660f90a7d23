use crate::models::{ChatMessage, Message};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingReply,
    ConfirmingClear,
}

/// A user message that has been accepted and persisted and whose reply is
/// still outstanding.
#[derive(Debug)]
pub struct PendingTurn {
    pub(super) sequence: u64,
    pub(super) payload: Vec<ChatMessage>,
}

impl PendingTurn {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Directive plus trimmed history to send upstream.
    pub fn payload(&self) -> &[ChatMessage] {
        &self.payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied(Message),
    /// The request failed; carries the message shown to the user.
    Failed(String),
    /// The turn was cancelled or superseded before its result arrived.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearFailure {
    Snapshot(String),
    RemoteConversation(String),
}

impl fmt::Display for ClearFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClearFailure::Snapshot(_) => f.write_str("o histórico salvo não pôde ser apagado"),
            ClearFailure::RemoteConversation(_) => {
                f.write_str("a conversa no servidor não pôde ser reiniciada")
            }
        }
    }
}

/// Result of a confirmed clear. The local window is always emptied; the
/// other two phases may fail independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearReport {
    Complete,
    Partial { failures: Vec<ClearFailure> },
}

impl ClearReport {
    pub fn is_complete(&self) -> bool {
        matches!(self, ClearReport::Complete)
    }
}
