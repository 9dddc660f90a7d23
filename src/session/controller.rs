use super::state::{ClearFailure, ClearReport, PendingTurn, TurnOutcome, TurnState};
use crate::api::CompletionClient;
use crate::conversation::ConversationWindow;
use crate::error::{IvoneError, Result, REPLY_FAILED_MESSAGE};
use crate::models::{Message, Role};
use crate::storage::HistoryStore;

/// Drives one conversation: accepts user input, keeps the window and the
/// persisted snapshot in step, and talks to the completion client.
///
/// The controller is the only writer of its window. Each instance owns its
/// own window, so several sessions can coexist in one process.
pub struct SessionController<C, S> {
    window: ConversationWindow,
    client: C,
    store: S,
    system_directive: String,
    state: TurnState,
    loading: bool,
    last_error: Option<String>,
    storage_warning: Option<String>,
    sequence: u64,
}

impl<C: CompletionClient, S: HistoryStore> SessionController<C, S> {
    pub fn new(client: C, store: S, system_directive: impl Into<String>) -> Self {
        Self::with_window(client, store, system_directive, ConversationWindow::new())
    }

    /// Start a session from whatever the store holds.
    pub fn restore(
        client: C,
        store: S,
        system_directive: impl Into<String>,
        max_context: usize,
    ) -> Self {
        let messages = store.load();
        tracing::debug!(count = messages.len(), "restored history");
        let window = ConversationWindow::from_messages(messages, max_context);
        Self::with_window(client, store, system_directive, window)
    }

    fn with_window(
        client: C,
        store: S,
        system_directive: impl Into<String>,
        window: ConversationWindow,
    ) -> Self {
        Self {
            window,
            client,
            store,
            system_directive: system_directive.into(),
            state: TurnState::Idle,
            loading: false,
            last_error: None,
            storage_warning: None,
            sequence: 0,
        }
    }

    /// Run a full turn: accept `text`, request a reply and record the result.
    pub async fn submit(&mut self, text: &str) -> Result<TurnOutcome> {
        let pending = self.begin_turn(text)?;
        let result = self.client.send(pending.payload()).await;
        Ok(self.complete_turn(pending, result))
    }

    /// Accept user input and persist it. The caller sends the returned
    /// payload and hands the result to [`complete_turn`](Self::complete_turn).
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn> {
        if text.trim().is_empty() {
            return Err(IvoneError::InvalidInput("message is blank".to_string()));
        }
        match self.state {
            TurnState::Idle => {}
            TurnState::AwaitingReply => return Err(IvoneError::Busy),
            TurnState::ConfirmingClear => {
                return Err(IvoneError::InvalidState(
                    "Confirme ou cancele a limpeza da conversa primeiro.".to_string(),
                ))
            }
        }

        self.last_error = None;
        self.storage_warning = None;
        self.loading = true;
        self.state = TurnState::AwaitingReply;

        let message = Message::new(Role::User, text, self.window.next_timestamp());
        self.window.append(message);
        self.persist();

        self.sequence += 1;
        Ok(PendingTurn {
            sequence: self.sequence,
            payload: self.window.to_request_payload(&self.system_directive),
        })
    }

    /// Apply the completion result for `pending`. Results for a turn that was
    /// cancelled or superseded are dropped.
    pub fn complete_turn(&mut self, pending: PendingTurn, result: Result<String>) -> TurnOutcome {
        if pending.sequence != self.sequence || self.state != TurnState::AwaitingReply {
            tracing::debug!(
                turn = pending.sequence,
                current = self.sequence,
                "discarding stale completion result"
            );
            return TurnOutcome::Discarded;
        }

        self.state = TurnState::Idle;
        self.loading = false;

        match result {
            Ok(reply) => {
                let message = Message::new(Role::Assistant, reply, self.window.next_timestamp());
                self.window.append(message.clone());
                self.persist();
                TurnOutcome::Replied(message)
            }
            Err(e) => {
                if e.is_completion_failure() {
                    tracing::warn!(error = %e, turn = pending.sequence, "completion request failed");
                } else {
                    tracing::error!(error = %e, turn = pending.sequence, "turn failed outside the completion path");
                }
                self.last_error = Some(REPLY_FAILED_MESSAGE.to_string());
                TurnOutcome::Failed(REPLY_FAILED_MESSAGE.to_string())
            }
        }
    }

    /// Abandon the outstanding turn. The user message stays in history.
    pub fn cancel_turn(&mut self) -> bool {
        if self.state != TurnState::AwaitingReply {
            return false;
        }
        self.sequence += 1;
        self.state = TurnState::Idle;
        self.loading = false;
        true
    }

    pub fn request_clear(&mut self) -> Result<()> {
        match self.state {
            TurnState::Idle | TurnState::ConfirmingClear => {
                self.state = TurnState::ConfirmingClear;
                Ok(())
            }
            TurnState::AwaitingReply => Err(IvoneError::Busy),
        }
    }

    pub fn cancel_clear(&mut self) {
        if self.state == TurnState::ConfirmingClear {
            self.state = TurnState::Idle;
        }
    }

    /// Empty the window, delete the snapshot and reset the remote
    /// conversation. Reports which of the last two phases failed.
    pub async fn confirm_clear(&mut self) -> Result<ClearReport> {
        if self.state != TurnState::ConfirmingClear {
            return Err(IvoneError::InvalidState(
                "Nenhuma limpeza pendente.".to_string(),
            ));
        }

        self.window.clear();
        self.sequence += 1;
        self.state = TurnState::Idle;
        self.last_error = None;
        self.storage_warning = None;

        let mut failures = Vec::new();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to delete persisted history");
            failures.push(ClearFailure::Snapshot(e.to_string()));
        }
        if let Err(e) = self.client.reset_conversation().await {
            tracing::warn!(error = %e, "failed to reset remote conversation");
            failures.push(ClearFailure::RemoteConversation(e.to_string()));
        }

        if failures.is_empty() {
            Ok(ClearReport::Complete)
        } else {
            Ok(ClearReport::Partial { failures })
        }
    }

    /// The warning always reflects the latest save.
    fn persist(&mut self) {
        match self.store.save(self.window.messages()) {
            Ok(()) => self.storage_warning = None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist history");
                self.storage_warning = Some(e.user_message());
            }
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn storage_warning(&self) -> Option<&str> {
        self.storage_warning.as_deref()
    }

    pub fn window(&self) -> &ConversationWindow {
        &self.window
    }

    pub fn messages(&self) -> &[Message] {
        self.window.messages()
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
