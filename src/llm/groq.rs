//! Groq API client implementation
//!
//! Groq serves an OpenAI-compatible chat completions endpoint. This module
//! implements the LlmClient trait against it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::client::{LlmClient, LlmError};
use super::types::{CompletionRequest, CompletionResponse, FinishReason, Usage};

/// Groq chat completions endpoint
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Environment variable holding the API key
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

const DEFAULT_MODEL: &str = "llama3-70b-8192";

const DEFAULT_MAX_TOKENS: u32 = 8000;

/// Configuration for the Groq client
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            base_url: GROQ_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.1,
            timeout: Duration::from_secs(300),
        }
    }
}

/// Groq API client
pub struct GroqClient {
    client: Client,
    api_key: String,
    config: GroqConfig,
    usage: Arc<Mutex<Usage>>,
}

impl GroqClient {
    /// Create a client reading the API key from `env_var`
    pub fn from_env(env_var: &str, config: GroqConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(env_var).map_err(|_| LlmError::MissingApiKey {
            env_var: env_var.to_string(),
        })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: GroqConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body for the chat completions API
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);
        let temperature = request.temperature.unwrap_or(self.config.temperature);

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(json!({ "role": "system", "content": request.system }));
        }
        for message in &request.messages {
            messages.push(json!({ "role": message.role, "content": message.content }));
        }

        json!({
            "model": model,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "messages": messages
        })
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse, LlmError> {
        let choice = body["choices"]
            .get(0)
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?;

        let content = choice["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let finish_reason = FinishReason::from_api(choice["finish_reason"].as_str());

        let usage = body
            .get("usage")
            .map(|u| {
                Usage::new(
                    u["prompt_tokens"].as_u64().unwrap_or(0),
                    u["completion_tokens"].as_u64().unwrap_or(0),
                )
            })
            .unwrap_or_default();

        self.usage.lock().unwrap_or_else(|e| e.into_inner()).add(&usage);

        Ok(CompletionResponse {
            content,
            finish_reason,
            usage,
            model: body["model"].as_str().unwrap_or(&self.config.model).to_string(),
        })
    }

    /// Send a request to the API
    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        *self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("model", &self.config.model)
            .field("max_tokens", &self.config.max_tokens)
            .finish()
    }
}
