use async_trait::async_trait;
use ivone::api::CompletionClient;
use ivone::error::{IvoneError, Result};
use ivone::models::ChatMessage;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Completion client that replays scripted results and records every payload.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    payloads: Mutex<Vec<Vec<ChatMessage>>>,
    resets: Mutex<usize>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: IvoneError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn payloads(&self) -> Vec<Vec<ChatMessage>> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn resets(&self) -> usize {
        *self.resets.lock().unwrap()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
        self.payloads.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(IvoneError::Other("no scripted reply".to_string())))
    }

    async fn reset_conversation(&self) -> Result<()> {
        *self.resets.lock().unwrap() += 1;
        Ok(())
    }
}
