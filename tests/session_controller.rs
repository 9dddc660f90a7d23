mod common;

use common::ScriptedClient;
use ivone::error::{IvoneError, REPLY_FAILED_MESSAGE};
use ivone::models::Role;
use ivone::session::{ClearReport, SessionController, TurnOutcome, TurnState};
use ivone::storage::{FilesystemHistoryStore, HistoryStore, MemoryHistoryStore};
use tempfile::TempDir;

const DIRECTIVE: &str = "Você é a IVONE.";

#[tokio::test]
async fn test_successful_turn_updates_history_and_snapshot() {
    let client = ScriptedClient::new().reply("Oi! Como posso ajudar?");
    let mut session = SessionController::new(client, MemoryHistoryStore::new(), DIRECTIVE);

    let outcome = session.submit("Olá").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Replied(ref m) if m.content == "Oi! Como posso ajudar?"));
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Olá");
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(messages[1].timestamp >= messages[0].timestamp);
    assert_eq!(session.store().load(), messages.to_vec());
    assert!(!session.is_loading());
    assert!(session.last_error().is_none());

    let payloads = session.client().payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0][0].role, "system");
    assert_eq!(payloads[0][0].content, DIRECTIVE);
    assert_eq!(payloads[0][1].content, "Olá");
}

#[tokio::test]
async fn test_transport_failure_keeps_user_message() {
    let client = ScriptedClient::new().fail(IvoneError::Other("connection refused".to_string()));
    let mut session = SessionController::new(client, MemoryHistoryStore::new(), DIRECTIVE);

    let outcome = session.submit("teste").await.unwrap();

    assert_eq!(outcome, TurnOutcome::Failed(REPLY_FAILED_MESSAGE.to_string()));
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].content, "teste");
    assert_eq!(session.last_error(), Some(REPLY_FAILED_MESSAGE));
    assert!(!session.is_loading());
    assert_eq!(session.state(), TurnState::Idle);
    assert_eq!(session.store().load().len(), 1);
}

#[tokio::test]
async fn test_error_clears_on_next_successful_turn() {
    let client = ScriptedClient::new()
        .fail(IvoneError::ApiError {
            status: 503,
            message: "Model is loading".to_string(),
        })
        .reply("Agora sim.");
    let mut session = SessionController::new(client, MemoryHistoryStore::new(), DIRECTIVE);

    session.submit("primeira").await.unwrap();
    assert!(session.last_error().is_some());

    session.submit("segunda").await.unwrap();
    assert!(session.last_error().is_none());
    assert_eq!(session.messages().len(), 3);
}

#[tokio::test]
async fn test_payload_window_drops_oldest_exchange() {
    let mut client = ScriptedClient::new();
    for i in 1..=11 {
        client = client.reply(&format!("resposta {}", i));
    }
    let mut session = SessionController::new(client, MemoryHistoryStore::new(), DIRECTIVE);

    for i in 1..=11 {
        session.submit(&format!("pergunta {}", i)).await.unwrap();
    }

    let payloads = session.client().payloads();
    let last = payloads.last().unwrap();
    assert_eq!(last.len(), 11);
    assert_eq!(last[0].role, "system");
    assert!(last.iter().all(|m| m.content != "pergunta 1" && m.content != "resposta 1"));
    assert_eq!(last[1].content, "resposta 6");
    assert_eq!(last[10].content, "pergunta 11");

    assert_eq!(session.messages().len(), 22);
    assert_eq!(session.messages()[0].content, "pergunta 1");
    assert_eq!(session.store().load().len(), 22);
}

#[tokio::test]
async fn test_clear_requires_confirmation() {
    let client = ScriptedClient::new().reply("Oi!");
    let mut session = SessionController::new(client, MemoryHistoryStore::new(), DIRECTIVE);
    session.submit("Olá").await.unwrap();
    let before = session.messages().to_vec();

    session.request_clear().unwrap();
    assert_eq!(session.state(), TurnState::ConfirmingClear);
    session.cancel_clear();

    assert_eq!(session.state(), TurnState::Idle);
    assert_eq!(session.messages(), before.as_slice());
    assert_eq!(session.store().load(), before);
    assert_eq!(session.client().resets(), 0);

    session.request_clear().unwrap();
    let report = session.confirm_clear().await.unwrap();

    assert_eq!(report, ClearReport::Complete);
    assert!(session.messages().is_empty());
    assert!(session.store().load().is_empty());
    assert_eq!(session.client().resets(), 1);
}

#[tokio::test]
async fn test_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let client = ScriptedClient::new().reply("Oi! Como posso ajudar?");
        let store = FilesystemHistoryStore::with_dir(temp_dir.path());
        let mut session = SessionController::new(client, store, DIRECTIVE);
        session.submit("Olá").await.unwrap();
    }

    let client = ScriptedClient::new().reply("Lembro sim.");
    let store = FilesystemHistoryStore::with_dir(temp_dir.path());
    let mut session = SessionController::restore(client, store, DIRECTIVE, 10);
    assert_eq!(session.messages().len(), 2);

    session.submit("Lembra de mim?").await.unwrap();

    let payload = &session.client().payloads()[0];
    assert_eq!(payload.len(), 4);
    assert_eq!(payload[1].content, "Olá");
    assert_eq!(payload[2].content, "Oi! Como posso ajudar?");
}

#[tokio::test]
async fn test_restore_from_corrupted_snapshot_starts_empty() {
    let store = MemoryHistoryStore::with_raw("{ definitely not a snapshot");
    let session = SessionController::restore(ScriptedClient::new(), store, DIRECTIVE, 10);

    assert!(session.messages().is_empty());
    assert_eq!(session.state(), TurnState::Idle);
}
