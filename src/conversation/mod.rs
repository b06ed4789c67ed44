//! Conversation orchestration.
//!
//! [`Conversation`] owns the transcript and drives the chat round trip:
//! the user's message is appended immediately, the history payload is sent
//! to the service, and the answer (with the memories it used) is appended
//! when it arrives. At most one round trip is in flight at a time.

pub mod history;

use crate::api::AssistantApi;
use crate::memory::{CreateOutcome, MemoryStore};
use crate::types::{AppError, ChatMessage, ChatRequest, HistoryEntry, MessageStatus, Result};
use history::HistoryPolicy;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a send did not start a round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyInput,
    Pending,
}

/// Result of a successful [`Conversation::send_message`] call
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing happened; transcript and pending flag are unchanged
    Skipped(SkipReason),
    /// The assistant answered; this is the message appended to the transcript
    Answered(ChatMessage),
}

#[derive(Debug, Default)]
struct ConversationState {
    transcript: Vec<ChatMessage>,
    pending: bool,
    draft: String,
    last_error: Option<String>,
}

impl ConversationState {
    fn set_status(&mut self, id: &str, status: MessageStatus) {
        if let Some(msg) = self.transcript.iter_mut().rev().find(|m| m.id == id) {
            msg.status = status;
        }
    }
}

/// Clears the pending flag when the round trip ends, including when the
/// send future is dropped before the response arrives.
struct PendingGuard<'a> {
    state: &'a Mutex<ConversationState>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().pending = false;
    }
}

/// Session-scoped chat state plus the operations that advance it.
pub struct Conversation {
    api: Arc<dyn AssistantApi>,
    memory: Arc<MemoryStore>,
    policy: HistoryPolicy,
    state: Mutex<ConversationState>,
}

impl Conversation {
    pub fn new(
        api: Arc<dyn AssistantApi>,
        memory: Arc<MemoryStore>,
        policy: HistoryPolicy,
    ) -> Self {
        Self {
            api,
            memory,
            policy,
            state: Mutex::new(ConversationState::default()),
        }
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Snapshot of the transcript in append order
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().transcript.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().transcript.is_empty()
    }

    /// True while a chat round trip is in flight
    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    pub fn draft(&self) -> String {
        self.state.lock().draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().draft = text.into();
    }

    /// Error from the most recent failed operation, cleared by the next send
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    /// History payload the next request would carry for the current transcript
    pub fn history_payload(&self) -> Vec<HistoryEntry> {
        self.policy.apply(&self.state.lock().transcript)
    }

    /// Sends `text` to the assistant.
    ///
    /// Returns `Skipped` without touching any state when `text` is blank or
    /// another send is still pending. Otherwise the user message is appended
    /// right away and stays in the transcript whatever the outcome; on
    /// failure it is marked [`MessageStatus::Failed`] and the error is
    /// returned. The pending flag is always clear once this returns.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let (user_id, request) = {
            let mut state = self.state.lock();
            if text.trim().is_empty() {
                return Ok(SendOutcome::Skipped(SkipReason::EmptyInput));
            }
            if state.pending {
                debug!("Send ignored: a request is already pending");
                return Ok(SendOutcome::Skipped(SkipReason::Pending));
            }

            let user_msg = ChatMessage::user(text);
            let user_id = user_msg.id.clone();
            state.transcript.push(user_msg);
            state.pending = true;
            state.draft.clear();
            state.last_error = None;

            let request = ChatRequest {
                query: text.to_string(),
                history: self.policy.apply(&state.transcript),
            };
            (user_id, request)
        };
        let _guard = PendingGuard { state: &self.state };

        debug!(
            "Sending chat request with {} history entries",
            request.history.len()
        );
        let result = self.api.chat(&request).await;

        let mut state = self.state.lock();
        state.pending = false;
        match result {
            Ok(response) => {
                state.set_status(&user_id, MessageStatus::Confirmed);
                let answer = ChatMessage::assistant(response.answer, response.memories_used);
                info!(
                    "Assistant answered using {} memories",
                    answer.memories_used.len()
                );
                state.transcript.push(answer.clone());
                Ok(SendOutcome::Answered(answer))
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                state.set_status(&user_id, MessageStatus::Failed);
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Sends whatever is currently in the draft.
    pub async fn send_draft(&self) -> Result<SendOutcome> {
        let draft = self.draft();
        self.send_message(&draft).await
    }

    /// Stores the current draft as a memory. The transcript is not touched.
    ///
    /// The draft is cleared only when the memory was stored.
    pub async fn store_current_draft_as_memory(&self) -> Result<CreateOutcome> {
        let draft = self.draft();
        match self.memory.create_memory(&draft).await {
            Ok(outcome) => {
                if outcome.is_stored() {
                    let mut state = self.state.lock();
                    // Keep anything typed while the request was in flight
                    if state.draft == draft {
                        state.draft.clear();
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    fn record_error(&self, err: &AppError) {
        self.state.lock().last_error = Some(err.to_string());
    }
}
