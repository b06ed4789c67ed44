//! REST client for the assistant service

use crate::api::AssistantApi;
use crate::types::{
    ApiErrorBody, AppError, ChatRequest, ChatResponse, CreateMemoryReceipt, CreateMemoryRequest,
    Memory, MemoryId, MemoryRef, Result, SearchResponse,
};
use crate::utils::config::ApiConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// [`AssistantApi`] over HTTP, rooted at the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpAssistantClient {
    client: Client,
    base_url: String,
}

impl HttpAssistantClient {
    /// Builds a client from the API section of the configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// Uses an existing `reqwest::Client` (shared connection pool, custom TLS, ...)
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-success status into [`AppError::Rejected`], preferring the
    /// service's `{"error": ...}` message when it sent one.
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    body
                }
            });

        Err(AppError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        resp.json::<T>()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))
    }
}

fn transport(e: reqwest::Error) -> AppError {
    AppError::Transport(e.to_string())
}

#[async_trait]
impl AssistantApi for HttpAssistantClient {
    async fn fetch_memories(&self) -> Result<Vec<Memory>> {
        let url = self.url("/memories/all");
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await.map_err(transport)?;
        let resp = Self::check(resp).await?;
        Self::decode(resp).await
    }

    async fn create_memory(&self, text: &str) -> Result<CreateMemoryReceipt> {
        let url = self.url("/memories");
        debug!("POST {}", url);

        let body = CreateMemoryRequest {
            text: text.to_string(),
        };
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let resp = Self::check(resp).await?;

        // Only success matters here; the body is informational.
        let raw = resp.text().await.map_err(transport)?;
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    async fn search_memories(&self, query: &str) -> Result<Vec<MemoryRef>> {
        let url = self.url("/memories/search");
        debug!("GET {} q={}", url, query);

        let resp = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(transport)?;
        let resp = Self::check(resp).await?;
        let body: SearchResponse = Self::decode(resp).await?;
        Ok(body.results)
    }

    async fn delete_memory(&self, id: &MemoryId) -> Result<()> {
        let url = self.url(&format!("/memories/{}", id));
        debug!("DELETE {}", url);

        let resp = self.client.delete(&url).send().await.map_err(transport)?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.url("/chat");
        debug!("POST {} ({} history entries)", url, request.history.len());

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let resp = Self::check(resp).await?;
        Self::decode(resp).await
    }
}
