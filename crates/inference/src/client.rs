//! HTTP client for the chat-completions endpoint.
//!
//! [`GroqClient`] wraps the OpenAI-compatible `POST /chat/completions`
//! surface using [`reqwest`], with the request timeout baked into the
//! underlying client so every call is bounded. The [`CompletionClient`]
//! trait is the seam the generator (and the test suite) programs against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GroqConfig;

/// Sampling temperature sent with every request.
const TEMPERATURE: f32 = 0.7;
/// Cap on completion tokens per request.
const MAX_TOKENS: u32 = 2048;
/// Nucleus sampling parameter.
const TOP_P: f32 = 1.0;

/// Errors from the completion transport layer.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("Inference endpoint error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response that does not carry a completion.
    #[error("Malformed completion response: {0}")]
    Malformed(String),
}

/// One completion call against the inference endpoint.
///
/// Object-safe so the generator can be handed a scripted double in tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one system + user message pair, returning the completion text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for Groq's OpenAI-compatible chat-completions endpoint.
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqClient {
    /// Build a client from configuration.
    ///
    /// Fails when no API key is configured ([`GroqConfig::enabled`] is the
    /// startup check that avoids constructing the client at all in that
    /// case) or when the underlying HTTP client cannot be built.
    pub fn new(config: &GroqConfig) -> Result<Self, CompletionError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| CompletionError::Malformed("No API key configured".into()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Malformed("Response carried no choices".into()))?;

        Ok(content)
    }
}
