//! OpenAIChatAgent - REST client for an OpenAI-compatible chat completions endpoint.
//!
//! Every request carries the bearer API key and the `OpenAI-Project` header.
//! Failures are never retried here; recovery is always a user resubmission.

use std::time::Duration;

use async_trait::async_trait;
use glance_core::config::CompletionConfig;
use glance_core::secret::Credentials;
use glance_core::{GlanceError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{CompletionAgent, CompletionRequest};

const PROJECT_HEADER: &str = "OpenAI-Project";

/// Agent implementation that talks to the chat completions HTTP API.
#[derive(Clone)]
pub struct OpenAIChatAgent {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl OpenAIChatAgent {
    /// Creates a new agent for `endpoint` with the provided credentials.
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            credentials,
        }
    }

    /// Builds an agent from the `[completion]` config section.
    pub fn from_config(config: &CompletionConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| GlanceError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_request(&self, body: &CompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.credentials.api_key)
            .header(PROJECT_HEADER, &self.credentials.project_id)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                GlanceError::transport(
                    err.status().map(|status| status.as_u16()),
                    format!("Completion request failed: {err}"),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            GlanceError::transport(None, format!("Failed to parse completion response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionAgent for OpenAIChatAgent {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "Sending completion request"
        );
        self.send_request(&request).await
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GlanceError::EmptyReply)
}

fn map_http_error(status: StatusCode, body: &str) -> GlanceError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .ok()
        .filter(|message| !message.trim().is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        });

    GlanceError::transport(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extracts_first_choice_trimmed() {
        let response = parse(
            r#"{"choices":[{"message":{"content":"  Sodium below 135 mmol/L.\n"}},{"message":{"content":"other"}}]}"#,
        );
        assert_eq!(
            extract_text_response(response).unwrap(),
            "Sodium below 135 mmol/L."
        );
    }

    #[test]
    fn test_missing_content_is_empty_reply() {
        assert_eq!(
            extract_text_response(parse(r#"{"choices":[]}"#)).unwrap_err(),
            GlanceError::EmptyReply
        );
        assert_eq!(
            extract_text_response(parse(r#"{"choices":[{"message":{"content":null}}]}"#))
                .unwrap_err(),
            GlanceError::EmptyReply
        );
        assert_eq!(
            extract_text_response(parse(r#"{}"#)).unwrap_err(),
            GlanceError::EmptyReply
        );
    }

    #[test]
    fn test_http_error_uses_api_message() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        );
        assert_eq!(
            err,
            GlanceError::transport(Some(401), "Incorrect API key provided")
        );
    }

    #[test]
    fn test_http_error_falls_back_to_reason() {
        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "Error 500: Internal Server Error");

        let raw = map_http_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(raw.to_string(), "Error 502: upstream down");
    }

    #[test]
    fn test_from_config_uses_endpoint() {
        let config = CompletionConfig {
            endpoint: "http://localhost:9/v1/chat/completions".into(),
            ..CompletionConfig::default()
        };
        let agent =
            OpenAIChatAgent::from_config(&config, Credentials::new("sk-1", "proj_1")).unwrap();
        assert_eq!(agent.endpoint(), "http://localhost:9/v1/chat/completions");
    }
}
