use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Faults a completion call can produce. The variants drive the agent's
/// retry ladder: connection and generic API faults are retried on the same
/// model, rate-limit and unavailable faults advance to the next model.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("Connection error: {0}")]
    Connection(String),
    /// The service rejected the model id (404 or a "does not exist" payload).
    #[error("{0}")]
    ModelUnavailable(String),
    #[error("{0}")]
    Api(String),
}

/// One chat message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The external text-generation collaborator. One call, one model, one
/// structured text payload back. Implementations must tolerate concurrent
/// invocation; each call is independent.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// OpenAI-compatible chat-completion client. Requests a JSON-object
/// response so the payload parses as the agents' output schema.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        trace!("Request: model={}, {} messages", model, messages.len());

        let request = ChatRequest {
            model,
            messages,
            temperature,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status_error(status, body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Api(format!("Malformed completion response: {e}")))?;
        trace!("Response has {} choices", chat_response.choices.len());

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Api("Completion response contained no choices".to_string()))
    }
}

fn classify_transport_error(error: reqwest::Error) -> LlmError {
    if error.is_connect() || error.is_timeout() {
        LlmError::Connection(error.to_string())
    } else {
        LlmError::Api(error.to_string())
    }
}

fn classify_status_error(status: reqwest::StatusCode, body: String) -> LlmError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return LlmError::RateLimited(body);
    }
    // Unknown-model failures surface as 404s or as "does not exist" in the
    // error payload, depending on the provider.
    if status == reqwest::StatusCode::NOT_FOUND
        || body.contains("does not exist")
        || body.contains("model_not_found")
    {
        return LlmError::ModelUnavailable(format!("{status}: {body}"));
    }
    LlmError::Api(format!("{status}: {body}"))
}
