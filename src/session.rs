use crate::api::{AssistantApi, HttpAssistantClient};
use crate::conversation::Conversation;
use crate::memory::MemoryStore;
use crate::types::Result;
use crate::utils::config::RecallConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// One chat session: the configuration, the service client, the memory
/// cache and the conversation, wired together.
///
/// Both subsystems share the same client and never share state; the
/// conversation only calls into the memory store to create memories.
#[derive(Clone)]
pub struct Session {
    /// Immutable configuration the session was built from
    pub config: Arc<RecallConfig>,
    /// Memory cache and memory mutations
    pub memory: Arc<MemoryStore>,
    /// Transcript and chat round trip
    pub conversation: Arc<Conversation>,
}

impl Session {
    /// Builds a session that talks to the configured service over HTTP.
    pub fn from_config(config: RecallConfig) -> Result<Self> {
        let api = Arc::new(HttpAssistantClient::new(&config.api)?);
        Ok(Self::with_api(config, api))
    }

    /// Builds a session around any [`AssistantApi`] implementation.
    pub fn with_api(config: RecallConfig, api: Arc<dyn AssistantApi>) -> Self {
        let memory = Arc::new(MemoryStore::new(api.clone()));
        let conversation = Arc::new(Conversation::new(
            api,
            memory.clone(),
            config.conversation.history,
        ));

        Self {
            config: Arc::new(config),
            memory,
            conversation,
        }
    }

    /// Session start: loads the memory list once.
    ///
    /// A failed initial load leaves the cache empty; the error is returned
    /// so the front end can show it, but the session stays usable.
    pub async fn start(&self) -> Result<()> {
        info!("Starting session against {}", self.config.api.base_url);
        if let Err(e) = self.memory.refresh_all().await {
            warn!("Initial memory load failed: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
