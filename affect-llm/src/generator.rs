//! The generation seam.
//!
//! The turn pipeline only needs `(system, user, temperature, max_tokens) ->
//! text`. [`Generator`] is that contract; [`HttpGenerator`] implements it
//! over an [`LlmClient`] and [`MockGenerator`](crate::mock::MockGenerator)
//! implements it for tests.

use async_trait::async_trait;

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::types::GenerationRequest;

/// Anything that can produce a reply.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate reply text.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// [`LlmClient`] with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: LlmClient,
    timeout_ms: u64,
}

impl HttpGenerator {
    /// Wrap a client; each call times out after `timeout_ms`.
    #[must_use]
    pub fn new(client: LlmClient, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    /// The wrapped client.
    #[must_use]
    pub fn client(&self) -> &LlmClient {
        &self.client
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = GenerationRequest::new(system, user)
            .with_temperature(temperature)
            .with_max_tokens(max_tokens)
            .with_timeout(self.timeout_ms);
        self.client.generate(&request).await.map(|r| r.text)
    }

    fn describe(&self) -> String {
        format!("{} model={}", self.client.provider().name(), self.client.model())
    }
}
