//! Memory cache synchronization tests against a scripted assistant service.

mod common;

use common::{session_with, wait_until, ScriptedApi};
use recall::{AppError, CreateOutcome, Memory, MemoryId, RefreshOutcome};

#[tokio::test]
async fn test_session_start_loads_memories_once() {
    let api = ScriptedApi::new();
    api.memories(vec![Memory::new(1, "I like tea"), Memory::new(2, "I live in Oslo")]);
    let session = session_with(&api);

    session.start().await.unwrap();

    assert_eq!(api.fetch_calls(), 1);
    assert_eq!(session.memory.len(), 2);
    assert_eq!(session.memory.memories()[1].content, "I live in Oslo");
}

#[tokio::test]
async fn test_failed_start_leaves_session_usable() {
    let api = ScriptedApi::new();
    api.fail_fetch(AppError::Transport("connection refused".to_string()));
    let session = session_with(&api);

    assert!(session.start().await.is_err());
    assert!(session.memory.is_empty());
    assert!(session.memory.last_error().is_some());

    session.conversation.send_message("still there?").await.unwrap();
    assert_eq!(session.conversation.len(), 2);
}

#[tokio::test]
async fn test_create_then_single_refresh() {
    let api = ScriptedApi::new();
    let session = session_with(&api);

    let outcome = session.memory.create_memory("remember this").await.unwrap();

    assert!(matches!(outcome, CreateOutcome::Stored { refreshed: true, .. }));
    assert_eq!(api.created(), vec!["remember this"]);
    assert_eq!(api.fetch_calls(), 1);
    assert_eq!(
        session.memory.memories(),
        vec![Memory::new(1, "remember this")]
    );
}

#[tokio::test]
async fn test_blank_create_sends_nothing() {
    let api = ScriptedApi::new();
    let session = session_with(&api);

    let outcome = session.memory.create_memory("  \n ").await.unwrap();

    assert!(matches!(outcome, CreateOutcome::Skipped));
    assert!(api.created().is_empty());
    assert_eq!(api.fetch_calls(), 0);
}

#[tokio::test]
async fn test_cache_is_replaced_not_merged() {
    let api = ScriptedApi::new();
    api.memories(vec![Memory::new(1, "old"), Memory::new(2, "older")]);
    api.memories(vec![Memory::new(3, "new")]);
    let session = session_with(&api);

    session.memory.refresh_all().await.unwrap();
    session.memory.refresh_all().await.unwrap();

    assert_eq!(session.memory.memories(), vec![Memory::new(3, "new")]);
}

#[tokio::test]
async fn test_late_response_from_older_refresh_is_dropped() {
    let api = ScriptedApi::new();
    let slow = api.memories_gated(vec![Memory::new(1, "a")]);
    api.memories(vec![Memory::new(1, "a"), Memory::new(2, "b")]);
    let session = session_with(&api);

    let memory = session.memory.clone();
    let older = tokio::spawn(async move { memory.refresh_all().await });
    wait_until(|| api.fetch_calls() == 1).await;

    let newer = session.memory.refresh_all().await.unwrap();
    assert_eq!(newer, RefreshOutcome::Applied { count: 2 });

    slow.open();
    let older = older.await.unwrap().unwrap();
    assert_eq!(older, RefreshOutcome::Stale);
    assert_eq!(session.memory.len(), 2);
}

#[tokio::test]
async fn test_late_failure_from_older_refresh_is_not_reported() {
    let api = ScriptedApi::new();
    let slow = api.fail_fetch_gated(AppError::Transport("timed out".to_string()));
    api.memories(vec![Memory::new(1, "a")]);
    let session = session_with(&api);

    let memory = session.memory.clone();
    let older = tokio::spawn(async move { memory.refresh_all().await });
    wait_until(|| api.fetch_calls() == 1).await;

    session.memory.refresh_all().await.unwrap();
    assert!(session.memory.last_error().is_none());

    slow.open();
    assert!(older.await.unwrap().is_err());
    assert!(session.memory.last_error().is_none());
    assert_eq!(session.memory.memories(), vec![Memory::new(1, "a")]);
}

#[tokio::test]
async fn test_initial_load_racing_create() {
    let api = ScriptedApi::new();
    // The initial load answers with a snapshot taken before the create
    let initial = api.memories_gated(vec![]);
    let session = session_with(&api);

    let starter = session.clone();
    let start = tokio::spawn(async move { starter.start().await });
    wait_until(|| api.fetch_calls() == 1).await;

    session.memory.create_memory("note").await.unwrap();
    assert_eq!(session.memory.len(), 1);

    initial.open();
    start.await.unwrap().unwrap();
    assert_eq!(session.memory.memories(), vec![Memory::new(1, "note")]);
}

#[tokio::test]
async fn test_delete_then_refresh() {
    let api = ScriptedApi::new();
    let session = session_with(&api);
    session.memory.create_memory("first").await.unwrap();
    session.memory.create_memory("second").await.unwrap();

    session
        .memory
        .delete_memory(&MemoryId::Number(1))
        .await
        .unwrap();

    let contents: Vec<String> = session
        .memory
        .memories()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["second"]);
}

#[tokio::test]
async fn test_delete_unknown_id_is_rejected() {
    let api = ScriptedApi::new();
    let session = session_with(&api);

    let result = session.memory.delete_memory(&MemoryId::Number(99)).await;

    assert!(matches!(result, Err(AppError::Rejected { status: 404, .. })));
    assert_eq!(api.fetch_calls(), 0);
}

#[tokio::test]
async fn test_search_does_not_touch_cache() {
    let api = ScriptedApi::new();
    let session = session_with(&api);
    session.memory.create_memory("I like green tea").await.unwrap();
    let fetches = api.fetch_calls();

    let results = session.memory.search_memories("tea").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].display_text(), "I like green tea");
    assert_eq!(api.fetch_calls(), fetches);
}
