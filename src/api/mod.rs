//! Assistant service API
//!
//! The orchestrator talks to the remote assistant/memory service only through
//! the [`AssistantApi`] trait. [`HttpAssistantClient`] is the REST/JSON
//! implementation; tests substitute their own.

pub mod client;

pub use client::HttpAssistantClient;

use crate::types::{
    ChatRequest, ChatResponse, CreateMemoryReceipt, Memory, MemoryId, MemoryRef, Result,
};
use async_trait::async_trait;

/// Request/response contract of the assistant service.
///
/// Every method is a single round trip. Implementations report failures as
/// [`AppError::Transport`](crate::types::AppError::Transport) when the request
/// could not complete and [`AppError::Rejected`](crate::types::AppError::Rejected)
/// when the service answered with a non-success status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// `GET /memories/all`
    async fn fetch_memories(&self) -> Result<Vec<Memory>>;

    /// `POST /memories`
    async fn create_memory(&self, text: &str) -> Result<CreateMemoryReceipt>;

    /// `GET /memories/search?q=`
    async fn search_memories(&self, query: &str) -> Result<Vec<MemoryRef>>;

    /// `DELETE /memories/{id}`
    async fn delete_memory(&self, id: &MemoryId) -> Result<()>;

    /// `POST /chat`
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
