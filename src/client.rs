//! Inference client boundary — the opaque request/response service every
//! agent call goes through.
//!
//! `InferenceClient` is the seam for tests; `HttpInferenceClient` talks to
//! any OpenAI-compatible chat-completions endpoint and lifts retrieval
//! metadata into [`Citation`] records.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::agent::AgentProfile;

/// Citations returned past this count are dropped, preserving the client's
/// ranking order.
const MAX_CITATIONS: usize = 12;

/// Snippets longer than this are truncated.
const SNIPPET_MAX_CHARS: usize = 180;

/// Errors from the inference boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("response parse error: {0}")]
    ParseError(String),
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in an agent's context window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A source reference attached to an agent's response by the inference
/// service's retrieval layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub filename: String,
    pub chunk: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Generated text plus retrieval citations for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// The opaque inference service consumed by the orchestrator.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run one completion for `profile` with the given context window.
    async fn complete(
        &self,
        profile: &AgentProfile,
        messages: &[ChatMessage],
    ) -> Result<AgentReply, ClientError>;
}

// ── OpenAI-compatible HTTP implementation ──────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    stream: bool,
    include_retrieval_info: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    retrieval: Option<Retrieval>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct Retrieval {
    #[serde(default)]
    items: Vec<RetrievalItem>,
}

#[derive(Deserialize)]
struct RetrievalItem {
    file_name: Option<String>,
    title: Option<String>,
    chunk_index: Option<u32>,
    page: Option<u32>,
    snippet: Option<String>,
}

impl RetrievalItem {
    fn into_citation(self) -> Citation {
        Citation {
            filename: self
                .file_name
                .or(self.title)
                .unwrap_or_else(|| "unknown.txt".to_string()),
            chunk: self.chunk_index.or(self.page).unwrap_or(0),
            snippet: self
                .snippet
                .map(|s| s.chars().take(SNIPPET_MAX_CHARS).collect()),
        }
    }
}

/// reqwest-backed client for OpenAI-compatible `/chat/completions` endpoints.
///
/// Each agent has its own base URL and key; the model name is fixed by the
/// endpoint, so the request carries the placeholder `"n/a"`.
pub struct HttpInferenceClient {
    http: reqwest::Client,
}

impl HttpInferenceClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for HttpInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn complete(
        &self,
        profile: &AgentProfile,
        messages: &[ChatMessage],
    ) -> Result<AgentReply, ClientError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: "n/a",
            messages,
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
            stream: false,
            include_retrieval_info: true,
        };

        let url = format!("{}/chat/completions", profile.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&profile.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::BadStatus { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let citations: Vec<Citation> = parsed
            .retrieval
            .map(|r| {
                r.items
                    .into_iter()
                    .take(MAX_CITATIONS)
                    .map(RetrievalItem::into_citation)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            warn!(agent = %profile.name, "agent returned an empty response");
        }
        debug!(
            agent = %profile.name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            citations = citations.len(),
            "completion finished"
        );

        Ok(AgentReply { text, citations })
    }
}
