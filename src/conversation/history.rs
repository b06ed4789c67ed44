//! History payload construction.
//!
//! The chat endpoint receives the conversation so far as role/content pairs.
//! How much of the transcript goes out is decided by a [`HistoryPolicy`]:
//! - `Full` resends the whole transcript (the service's default expectation)
//! - `Window` keeps only the most recent messages
//! - `TokenBudget` keeps the most recent messages that fit an estimated budget
//!
//! Every policy keeps transcript order and always includes the newest message.

use crate::types::{ChatMessage, HistoryEntry};
use serde::{Deserialize, Serialize};

/// Default number of recent messages kept by [`HistoryPolicy::Window`].
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Strategy for turning a transcript into the history payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Send every message in the transcript
    #[default]
    Full,
    /// Send at most `max_messages` of the most recent messages
    Window { max_messages: usize },
    /// Send the most recent messages whose estimated tokens fit in `max_tokens`
    TokenBudget { max_tokens: usize },
}

impl HistoryPolicy {
    /// Builds the history payload for `transcript` under this policy.
    pub fn apply(&self, transcript: &[ChatMessage]) -> Vec<HistoryEntry> {
        let kept = match *self {
            HistoryPolicy::Full => transcript,
            HistoryPolicy::Window { max_messages } => truncate_history(transcript, max_messages),
            HistoryPolicy::TokenBudget { max_tokens } => {
                truncate_history_to_tokens(transcript, max_tokens)
            }
        };
        kept.iter().map(HistoryEntry::from).collect()
    }

    /// Short human-readable description, used by the CLI
    pub fn describe(&self) -> String {
        match self {
            HistoryPolicy::Full => "full transcript".to_string(),
            HistoryPolicy::Window { max_messages } => {
                format!("last {} messages", max_messages)
            }
            HistoryPolicy::TokenBudget { max_tokens } => {
                format!("~{} tokens of recent messages", max_tokens)
            }
        }
    }
}

/// Keeps the last `window_size` messages. A zero window still keeps the newest one.
pub fn truncate_history(history: &[ChatMessage], window_size: usize) -> &[ChatMessage] {
    let window_size = window_size.max(1);
    if history.len() <= window_size {
        history
    } else {
        &history[history.len() - window_size..]
    }
}

/// Estimates token count for a message (rough approximation).
///
/// Uses ~4 characters per token for English text.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Keeps the longest suffix of `history` that fits in `token_budget`.
///
/// The newest message is kept even when it alone exceeds the budget, since
/// the service needs the current query in context.
pub fn truncate_history_to_tokens(history: &[ChatMessage], token_budget: usize) -> &[ChatMessage] {
    let mut total_tokens = 0;
    let mut start = history.len();

    // Work backwards from most recent messages
    for (idx, msg) in history.iter().enumerate().rev() {
        let msg_tokens = estimate_tokens(&msg.text);
        if total_tokens + msg_tokens > token_budget && start < history.len() {
            break;
        }
        total_tokens += msg_tokens;
        start = idx;
    }

    &history[start..]
}
