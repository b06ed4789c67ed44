//! # Recall - client for a memory-augmented assistant
//!
//! A user stores free-text memories, chats with an assistant, and every
//! answer reports which stored memories it drew upon. This crate is the
//! client-side orchestration for that: it keeps the conversation transcript,
//! keeps a cached copy of the memory list in sync with the service, and
//! reconciles both into state a front end can render.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recall::{RecallConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RecallConfig::load("recall.toml")?;
//!     let session = Session::from_config(config)?;
//!     session.start().await?;
//!
//!     session.memory.create_memory("I moved to Oslo last spring").await?;
//!     session.conversation.send_message("Where do I live?").await?;
//!
//!     for msg in session.conversation.transcript() {
//!         println!("{:?}: {}", msg.sender, msg.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Service contract ([`AssistantApi`]) and the reqwest client
//! - [`conversation`] - Transcript, pending round trip, history policies
//! - [`memory`] - Memory cache synchronization
//! - [`types`] - Wire and domain types, error handling
//! - [`utils`] - Configuration loading
//! - [`cli`] - Terminal front end helpers

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Assistant service contract and HTTP client.
pub mod api;
/// Terminal front end: argument parsing and output.
pub mod cli;
/// Conversation orchestration and history policies.
pub mod conversation;
/// Memory store synchronization.
pub mod memory;
/// Session wiring of config, client, memory store and conversation.
pub mod session;
/// Core types (messages, memories, wire payloads, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use api::{AssistantApi, HttpAssistantClient};
pub use conversation::history::HistoryPolicy;
pub use conversation::{Conversation, SendOutcome, SkipReason};
pub use memory::{CreateOutcome, MemoryStore, RefreshOutcome};
pub use session::Session;
pub use types::{AppError, ChatMessage, Memory, MemoryId, MemoryRef, MessageStatus, Result, Sender};
pub use utils::config::{ConfigError, RecallConfig};
