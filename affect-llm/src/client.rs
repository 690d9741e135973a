//! LLM Client: unified interface for Ollama and OpenAI-compatible backends.

use std::time::{Duration, Instant};

use affect_core::config::LlmConfig;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::prompt::ollama_prompt;
use crate::types::{GenerationRequest, GenerationResponse};

/// Provider backend for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmProvider {
    /// Ollama running locally (default).
    Ollama {
        /// Server root, e.g. `http://localhost:11434`.
        base_url: String,
    },
    /// OpenAI-compatible chat completions API.
    OpenAiCompatible {
        /// API root (without `/v1`).
        base_url: String,
        /// Bearer token.
        api_key: String,
    },
    /// No backend. Every call fails, so every reply is the fallback.
    None,
}

impl LlmProvider {
    /// Short provider name for logs. Never includes credentials.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ollama { .. } => "ollama",
            Self::OpenAiCompatible { .. } => "openai",
            Self::None => "none",
        }
    }
}

/// Routes generation requests to the configured backend.
#[derive(Debug, Clone)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    max_retries: u32,
}

impl LlmClient {
    /// Create a new client.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>, max_retries: u32) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            max_retries,
        }
    }

    /// Create a client with no backend.
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, String::new(), 0)
    }

    /// Build a client from the `[llm]` configuration section.
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` for an unknown provider, or for an
    /// OpenAI-compatible provider without an API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let provider = match config.provider.trim().to_lowercase().as_str() {
            "ollama" => LlmProvider::Ollama { base_url },
            "openai" | "openai_compatible" => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    LlmError::ConfigError("openai provider requires llm.api_key".into())
                })?;
                LlmProvider::OpenAiCompatible { base_url, api_key }
            }
            "none" | "" => LlmProvider::None,
            other => {
                return Err(LlmError::ConfigError(format!("unknown provider: {other}")));
            }
        };
        Ok(Self::new(provider, config.model.clone(), config.max_retries))
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Configured backend.
    #[must_use]
    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Generate a reply.
    ///
    /// # Errors
    /// Returns `Err` if the backend is unavailable or every attempt fails.
    /// The caller is expected to substitute a fallback reply.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("No LLM provider configured".into())),
            LlmProvider::Ollama { base_url } => {
                let url = format!("{base_url}/api/generate");
                let body = json!({
                    "model": self.model,
                    "prompt": ollama_prompt(&request.system, &request.user),
                    "stream": false,
                    "options": {
                        "temperature": request.temperature,
                        "num_predict": request.max_tokens,
                    }
                });
                self.send_with_retries(&url, None, &body, request.timeout_ms, |json| {
                    let text = json["response"].as_str()?;
                    let tokens = json["eval_count"].as_u64().unwrap_or(0);
                    Some((text.to_string(), tokens))
                })
                .await
            }
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                let url = format!("{base_url}/v1/chat/completions");
                let body = json!({
                    "model": self.model,
                    "messages": [
                        { "role": "system", "content": request.system },
                        { "role": "user", "content": request.user },
                    ],
                    "max_tokens": request.max_tokens,
                    "temperature": request.temperature,
                });
                self.send_with_retries(&url, Some(api_key.as_str()), &body, request.timeout_ms, |json| {
                    let text = json["choices"][0]["message"]["content"].as_str()?;
                    let tokens = json["usage"]["completion_tokens"].as_u64().unwrap_or(0);
                    Some((text.to_string(), tokens))
                })
                .await
            }
        }
    }

    /// POST `body` to `url` until it succeeds, fails permanently, or the
    /// retry budget runs out.
    ///
    /// Permanent failures and single-attempt failures are returned as they
    /// are; a spent retry budget becomes `RetriesExhausted`.
    async fn send_with_retries(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &Value,
        timeout_ms: u64,
        extract: impl Fn(&Value) -> Option<(String, u64)>,
    ) -> Result<GenerationResponse, LlmError> {
        let attempts = self.max_retries + 1;
        let mut last_error = LlmError::Unavailable("no attempt made".into());

        for attempt in 0..attempts {
            if attempt > 0 {
                debug!(attempt = attempt + 1, attempts, "Retrying LLM call");
            }

            let start = Instant::now();
            let mut builder = self
                .http
                .post(url)
                .json(body)
                .timeout(Duration::from_millis(timeout_ms));
            if let Some(key) = bearer {
                builder = builder.bearer_auth(key);
            }

            let error = match builder.send().await {
                Ok(resp) if resp.status().is_success() => {
                    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let json: Value = resp
                        .json()
                        .await
                        .map_err(|e| LlmError::ParseError(e.to_string()))?;
                    let (text, tokens) = extract(&json).ok_or_else(|| {
                        LlmError::ParseError(format!("unexpected response shape: {json}"))
                    })?;
                    debug!(latency_ms, tokens, model = %self.model, "LLM call succeeded");
                    return Ok(GenerationResponse {
                        text: text.trim().to_string(),
                        tokens_generated: u32::try_from(tokens).unwrap_or(u32::MAX),
                        latency_ms,
                        model: self.model.clone(),
                    });
                }
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let body = resp.text().await.unwrap_or_default();
                    warn!(status, %body, "LLM backend returned error");
                    LlmError::Http { status, body }
                }
                Err(e) if e.is_timeout() => {
                    warn!(timeout_ms, "LLM request timed out");
                    LlmError::Timeout(timeout_ms)
                }
                Err(e) => {
                    let error = LlmError::from(e);
                    warn!(error = %error, "LLM request failed");
                    error
                }
            };

            if !error.is_retryable() {
                return Err(error);
            }
            last_error = error;
        }

        if attempts == 1 {
            return Err(last_error);
        }
        Err(LlmError::RetriesExhausted {
            attempts,
            last_error: last_error.to_string(),
        })
    }
}
