//! Remote completion collaborator.
//!
//! [`CompletionAgent`] is the seam between the orchestrator and the
//! network: the orchestrator only ever sees this trait, tests plug in
//! scripted agents, and [`OpenAIChatAgent`] talks to an OpenAI-compatible
//! chat completions endpoint.

mod openai_api_agent;

pub use openai_api_agent::OpenAIChatAgent;

use glance_core::Result;
use glance_core::session::Turn;
use serde::Serialize;

/// One chat completion request.
///
/// Both the primary completion and the follow-up derivation use this
/// shape; they differ in `messages`, `max_tokens` and possibly `model`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Issues completion requests against a remote model.
#[async_trait::async_trait]
pub trait CompletionAgent: Send + Sync {
    /// Sends one request and returns the trimmed content of the first choice.
    ///
    /// Never retries. Non-success statuses and network failures map to
    /// [`glance_core::GlanceError::Transport`]; a reply without content
    /// maps to [`glance_core::GlanceError::EmptyReply`].
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
