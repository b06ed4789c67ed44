//! Memory store synchronization.
//!
//! [`MemoryStore`] keeps a local, read-only copy of the service's memory list
//! and forwards mutations (create, delete) to the service. After every
//! successful mutation the whole list is fetched again instead of trusting the
//! mutation response, so the cache always mirrors what the service returned
//! last.
//!
//! Refreshes may overlap (the initial load can race a create-then-refresh).
//! Each refresh takes a sequence number when it is issued, and its result is
//! only applied if no refresh issued after it has already been applied.

use crate::api::AssistantApi;
use crate::types::{AppError, CreateMemoryReceipt, Memory, MemoryId, MemoryRef, Result};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of [`MemoryStore::create_memory`]
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// Input was empty or whitespace; nothing was sent
    Skipped,
    /// The service accepted the memory
    Stored {
        receipt: CreateMemoryReceipt,
        /// Whether the follow-up refresh succeeded
        refreshed: bool,
    },
}

impl CreateOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, CreateOutcome::Stored { .. })
    }
}

/// Result of [`MemoryStore::refresh_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cache now holds this response
    Applied { count: usize },
    /// A newer refresh already landed; this response was dropped
    Stale,
}

#[derive(Debug, Default)]
struct MemoryCache {
    memories: Vec<Memory>,
    /// Sequence number of the refresh currently reflected in `memories`
    applied_seq: u64,
}

/// Local cache of the service's memories plus the operations that change them.
pub struct MemoryStore {
    api: Arc<dyn AssistantApi>,
    cache: RwLock<MemoryCache>,
    next_seq: AtomicU64,
    last_error: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new(api: Arc<dyn AssistantApi>) -> Self {
        Self {
            api,
            cache: RwLock::new(MemoryCache::default()),
            next_seq: AtomicU64::new(1),
            last_error: RwLock::new(None),
        }
    }

    /// Snapshot of the cached memories, in service order
    pub fn memories(&self) -> Vec<Memory> {
        self.cache.read().memories.clone()
    }

    pub fn len(&self) -> usize {
        self.cache.read().memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().memories.is_empty()
    }

    /// Most recent failure, if the last operation did not succeed
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn record_error(&self, context: &str, err: &AppError) {
        warn!("{}: {}", context, err);
        *self.last_error.write() = Some(err.to_string());
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }

    /// Fetches the full memory list and replaces the cache with it.
    ///
    /// On failure the previous cache is kept and the error is returned. The
    /// failure is only recorded in [`last_error`](Self::last_error) if no
    /// newer refresh has been applied in the meantime.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        debug!("Refreshing memories (request #{})", seq);

        let memories = match self.api.fetch_memories().await {
            Ok(memories) => memories,
            Err(e) => {
                // A newer list is already showing; this failure says nothing about it
                let applied = self.cache.read().applied_seq;
                if seq < applied {
                    debug!("Stale memory refresh #{} failed: {}", seq, e);
                } else {
                    self.record_error("Failed to refresh memories", &e);
                }
                return Err(e);
            }
        };

        let mut cache = self.cache.write();
        if seq < cache.applied_seq {
            debug!(
                "Dropping stale memory list #{} (#{} already applied)",
                seq, cache.applied_seq
            );
            return Ok(RefreshOutcome::Stale);
        }

        let count = memories.len();
        cache.memories = memories;
        cache.applied_seq = seq;
        drop(cache);

        self.clear_error();
        info!("Memory cache refreshed: {} memories", count);
        Ok(RefreshOutcome::Applied { count })
    }

    /// Stores `text` as a new memory and refreshes the cache afterwards.
    ///
    /// Empty or whitespace-only text is ignored without contacting the
    /// service. The text is trimmed before it is sent. A failed follow-up
    /// refresh does not undo the create; it is reported through
    /// [`CreateOutcome::Stored::refreshed`] and [`last_error`](Self::last_error).
    pub async fn create_memory(&self, text: &str) -> Result<CreateOutcome> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty memory");
            return Ok(CreateOutcome::Skipped);
        }

        let receipt = match self.api.create_memory(text).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.record_error("Failed to store memory", &e);
                return Err(e);
            }
        };
        info!(
            "Memory stored (service reported {} new)",
            receipt
                .stored_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string())
        );

        let refreshed = self.refresh_all().await.is_ok();
        Ok(CreateOutcome::Stored { receipt, refreshed })
    }

    /// Deletes a memory on the service, then refreshes the cache.
    pub async fn delete_memory(&self, id: &MemoryId) -> Result<()> {
        if let Err(e) = self.api.delete_memory(id).await {
            self.record_error("Failed to delete memory", &e);
            return Err(e);
        }
        info!("Memory {} deleted", id);

        // The delete itself succeeded; a failed refresh is recorded in last_error.
        let _ = self.refresh_all().await;
        Ok(())
    }

    /// Ranked search on the service. Does not touch the cache.
    pub async fn search_memories(&self, query: &str) -> Result<Vec<MemoryRef>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }

        match self.api.search_memories(query).await {
            Ok(results) => {
                debug!("Search '{}' returned {} results", query, results.len());
                Ok(results)
            }
            Err(e) => {
                self.record_error("Memory search failed", &e);
                Err(e)
            }
        }
    }
}
