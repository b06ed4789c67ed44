use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============= Memory Types =============

/// Opaque memory identifier assigned by the assistant service.
///
/// The service currently hands out integers, but nothing on the client
/// depends on that, so string identifiers are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryId::Number(n) => write!(f, "{}", n),
            MemoryId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MemoryId {
    fn from(value: i64) -> Self {
        MemoryId::Number(value)
    }
}

impl std::str::FromStr for MemoryId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::InvalidInput("memory id must not be empty".to_string()));
        }
        Ok(s.parse::<i64>()
            .map(MemoryId::Number)
            .unwrap_or_else(|_| MemoryId::Text(s.to_string())))
    }
}

/// A stored memory as returned by `GET /memories/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: MemoryId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance_score: Option<f64>,
    /// Informational only; timestamps without an offset are read as UTC and
    /// anything unparseable becomes `None`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(s)) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&s) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(s.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc()))
}

impl Memory {
    pub fn new(id: impl Into<MemoryId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            importance_score: None,
            created_at: None,
        }
    }
}

/// An entry of `memories_used` in a chat answer.
///
/// The service may report either the memory object or just its raw text;
/// both shapes are kept as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryRef {
    Stored(MemoryContent),
    Raw(String),
    Other(serde_json::Value),
}

/// Object form of a [`MemoryRef`]; only `content` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MemoryId>,
    pub content: String,
    /// Any remaining fields (scores, timestamps) are carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MemoryRef {
    /// Text to show for this entry: `content` when present, else the raw value.
    pub fn display_text(&self) -> String {
        match self {
            MemoryRef::Stored(m) => m.content.clone(),
            MemoryRef::Raw(s) => s.clone(),
            MemoryRef::Other(v) => v.to_string(),
        }
    }
}

// ============= Conversation Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Role name used in the history payload
    pub fn role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// Delivery status of a transcript entry.
///
/// User messages start as `SentLocally` and resolve to `Confirmed` once the
/// service answers, or `Failed` if the round trip did not complete.
/// Assistant messages are created `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    SentLocally,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub memories_used: Vec<MemoryRef>,
    pub status: MessageStatus,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            memories_used: vec![],
            status: MessageStatus::SentLocally,
        }
    }

    pub fn assistant(text: impl Into<String>, memories_used: Vec<MemoryRef>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            memories_used,
            status: MessageStatus::Confirmed,
        }
    }
}

// ============= API Request/Response Types =============

/// One role/content pair of the history payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.sender.role().to_string(),
            content: msg.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub memories_used: Vec<MemoryRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemoryRequest {
    pub text: String,
}

/// Whatever the service says about a create; never required for correctness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMemoryReceipt {
    #[serde(default)]
    pub stored_count: Option<usize>,
    #[serde(default)]
    pub memories: Vec<Memory>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<MemoryRef>,
}

/// Error body sent by the service on non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request could not complete (connection refused, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether the failure came from the remote round trip rather than local validation.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::Rejected { .. } | AppError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
