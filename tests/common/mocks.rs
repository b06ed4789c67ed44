//! Mock implementations for testing.
//!
//! `ScriptedApi` is an in-memory [`AssistantApi`] whose replies are queued
//! up front. Any reply can be held behind a gate so a test can observe the
//! state while a request is still in flight.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use recall::types::{
    AppError, ChatRequest, ChatResponse, CreateMemoryReceipt, Memory, MemoryId, MemoryRef, Result,
};
use recall::AssistantApi;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A closed gate; `open()` lets exactly one held request through.
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    fn new() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    pub fn open(&self) {
        self.0.add_permits(1);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.0.acquire().await {
            permit.forget();
        }
    }
}

struct Step<T> {
    gate: Option<Gate>,
    reply: Result<T>,
}

/// Scripted assistant service.
///
/// Unscripted chat calls echo the query; unscripted fetches return the
/// current `server_memories`, which `create_memory` appends to.
#[derive(Default)]
pub struct ScriptedApi {
    chat_script: Mutex<VecDeque<Step<ChatResponse>>>,
    fetch_script: Mutex<VecDeque<Step<Vec<Memory>>>>,
    create_failures: Mutex<VecDeque<AppError>>,
    server_memories: Mutex<Vec<Memory>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    created: Mutex<Vec<String>>,
    fetch_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a chat answer
    pub fn answer(&self, answer: &str, memories_used: Vec<MemoryRef>) {
        self.chat_script.lock().push_back(Step {
            gate: None,
            reply: Ok(ChatResponse {
                answer: answer.to_string(),
                memories_used,
            }),
        });
    }

    /// Queue a chat answer that is only delivered once the returned gate opens
    pub fn answer_gated(&self, answer: &str) -> Gate {
        let gate = Gate::new();
        self.chat_script.lock().push_back(Step {
            gate: Some(gate.clone()),
            reply: Ok(ChatResponse {
                answer: answer.to_string(),
                memories_used: vec![],
            }),
        });
        gate
    }

    /// Queue a chat failure
    pub fn fail_chat(&self, err: AppError) {
        self.chat_script.lock().push_back(Step {
            gate: None,
            reply: Err(err),
        });
    }

    /// Queue a memory list for the next fetch
    pub fn memories(&self, list: Vec<Memory>) {
        self.fetch_script.lock().push_back(Step {
            gate: None,
            reply: Ok(list),
        });
    }

    /// Queue a memory list that is only delivered once the returned gate opens
    pub fn memories_gated(&self, list: Vec<Memory>) -> Gate {
        let gate = Gate::new();
        self.fetch_script.lock().push_back(Step {
            gate: Some(gate.clone()),
            reply: Ok(list),
        });
        gate
    }

    /// Queue a fetch failure
    pub fn fail_fetch(&self, err: AppError) {
        self.fetch_script.lock().push_back(Step {
            gate: None,
            reply: Err(err),
        });
    }

    /// Queue a fetch failure that is only delivered once the returned gate opens
    pub fn fail_fetch_gated(&self, err: AppError) -> Gate {
        let gate = Gate::new();
        self.fetch_script.lock().push_back(Step {
            gate: Some(gate.clone()),
            reply: Err(err),
        });
        gate
    }

    /// Make the next create fail
    pub fn fail_create(&self, err: AppError) {
        self.create_failures.lock().push_back(err);
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().clone()
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_requests.lock().len()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }
}

#[async_trait]
impl AssistantApi for ScriptedApi {
    async fn fetch_memories(&self) -> Result<Vec<Memory>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.fetch_script.lock().pop_front();
        match step {
            Some(step) => {
                if let Some(gate) = step.gate {
                    gate.pass().await;
                }
                step.reply
            }
            None => Ok(self.server_memories.lock().clone()),
        }
    }

    async fn create_memory(&self, text: &str) -> Result<CreateMemoryReceipt> {
        if let Some(err) = self.create_failures.lock().pop_front() {
            return Err(err);
        }
        self.created.lock().push(text.to_string());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let memory = Memory::new(id, text);
        self.server_memories.lock().push(memory.clone());
        Ok(CreateMemoryReceipt {
            stored_count: Some(1),
            memories: vec![memory],
            message: None,
        })
    }

    async fn search_memories(&self, query: &str) -> Result<Vec<MemoryRef>> {
        let query = query.to_lowercase();
        Ok(self
            .server_memories
            .lock()
            .iter()
            .filter(|m| m.content.to_lowercase().contains(&query))
            .map(|m| MemoryRef::Raw(m.content.clone()))
            .collect())
    }

    async fn delete_memory(&self, id: &MemoryId) -> Result<()> {
        let mut memories = self.server_memories.lock();
        let before = memories.len();
        memories.retain(|m| &m.id != id);
        if memories.len() == before {
            return Err(AppError::Rejected {
                status: 404,
                message: "Memory not found".to_string(),
            });
        }
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.chat_requests.lock().push(request.clone());
        let step = self.chat_script.lock().pop_front();
        match step {
            Some(step) => {
                if let Some(gate) = step.gate {
                    gate.pass().await;
                }
                step.reply
            }
            None => Ok(ChatResponse {
                answer: format!("echo: {}", request.query),
                memories_used: vec![],
            }),
        }
    }
}
