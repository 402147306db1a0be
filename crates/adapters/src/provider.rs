// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! OpenAI-compatible chat-completions client for the x.ai provider.
//!
//! The client is constructed from an explicit [`ProviderConfig`] and
//! injected wherever provider access is needed; there is no global
//! singleton. Timeouts and retries are this adapter's responsibility -
//! callers treat any failure here like any other provider failure.

use leadscope_core::ModelVariant;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::debug;

/// Default API endpoint for the x.ai provider.
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "XAI_API_KEY";

/// Environment variable overriding the provider base URL.
pub const BASE_URL_ENV: &str = "XAI_BASE_URL";

/// Errors raised by provider operations.
#[derive(Debug, ThisError)]
pub enum ProviderError {
    /// The API key environment variable is not set.
    #[error("XAI_API_KEY environment variable is not set")]
    MissingApiKey,

    /// The request never produced an HTTP response.
    #[error("Provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the provider.
        body: String,
    },

    /// The provider answered 2xx but the body did not match the expected
    /// completion shape.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Connection settings for the provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bearer token for the provider API.
    pub api_key: String,
    /// API base URL.
    pub base_url: String,
}

impl ProviderConfig {
    /// Create a config against the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (for proxies or test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a config from the process environment.
    ///
    /// Reads [`API_KEY_ENV`] (required) and [`BASE_URL_ENV`] (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ProviderError::MissingApiKey)?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

/// One message of a chat-completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: "system", "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options for a completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum completion tokens.
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Position of the choice in the response.
    pub index: u32,
    /// The generated message.
    pub message: ChatMessage,
    /// Why generation stopped, when reported.
    pub finish_reason: Option<String>,
}

/// Token accounting for a completion.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the completion.
    pub completion_tokens: u32,
    /// Prompt plus completion tokens.
    pub total_tokens: u32,
}

/// The provider's chat-completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Provider-assigned response id.
    pub id: String,
    /// Response object type.
    pub object: String,
    /// Creation timestamp (unix seconds).
    pub created: i64,
    /// Model that served the request.
    pub model: String,
    /// Generated choices.
    pub choices: Vec<ChatChoice>,
    /// Token accounting.
    pub usage: TokenUsage,
}

/// HTTP client for the provider's chat-completions endpoint.
pub struct ProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl ProviderClient {
    /// Create a client over the given config.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Execute a chat-completion request against `variant`.
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        variant: ModelVariant,
        options: CompletionOptions,
    ) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: variant.as_str(),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!(model = %variant, temperature = options.temperature, "Sending chat completion request");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            ProviderError::InvalidResponse(format!("completion body did not parse: {err}"))
        })
    }

    /// Run a single-prompt completion and return the first choice's text.
    pub async fn generate_text(
        &self,
        prompt: &str,
        variant: ModelVariant,
        options: CompletionOptions,
    ) -> Result<String> {
        let messages = [ChatMessage::user(prompt)];
        let response = self.chat_completion(&messages, variant, options).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
