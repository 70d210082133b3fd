//! LLM Client — the single point of entry for all completion calls.
//!
//! No other module talks to the Anthropic API directly. Handlers depend on the
//! `CompletionClient` trait so tests can substitute a scripted client.
//!
//! Model: claude-sonnet-4-20250514 (hardcoded so every analysis uses the same model)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

#[cfg(test)]
pub mod mock;

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for every analysis.
pub const MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 2000;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LlmError {
    /// DNS failure, refused or reset connection.
    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("upstream did not respond within {}s", .after.as_secs_f32())]
    Timeout { after: Duration },

    #[error("could not decode upstream response: {0}")]
    Decode(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// HTTP status reported by the upstream, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        // A connect timeout also reports is_timeout(); it is a transport failure.
        if e.is_connect() {
            LlmError::Transport(e)
        } else if e.is_timeout() {
            // reqwest does not report the elapsed time; the caller's deadline
            // normally fires first and carries the real value.
            LlmError::Timeout {
                after: Duration::ZERO,
            }
        } else if e.is_decode() {
            LlmError::Decode(e.to_string())
        } else {
            LlmError::Transport(e)
        }
    }
}

/// A text-completion backend. One prompt in, the model's raw reply text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` as the sole user message. Gives up after `deadline`.
    async fn complete(
        &self,
        prompt: &str,
        api_key: &str,
        deadline: Duration,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client. Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
}

impl AnthropicClient {
    pub fn new(base_url: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(LlmError::Transport)?;

        Ok(Self::with_client(client, base_url))
    }

    fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), MESSAGES_PATH),
        }
    }

    async fn send(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Claude API error: {} - {}", status.as_u16(), body);
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let llm_response: LlmResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        llm_response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(
        &self,
        prompt: &str,
        api_key: &str,
        deadline: Duration,
    ) -> Result<String, LlmError> {
        match tokio::time::timeout(deadline, self.send(prompt, api_key)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout { after: deadline }),
        }
    }
}
