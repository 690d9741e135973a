//! Scripted [`Generator`] for tests and offline runs.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::LlmError;
use crate::generator::Generator;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return this text.
    Fixed(String),
    /// Return the user text prefixed with `"echo: "`.
    Echo,
    /// Always fail as an unreachable backend.
    Fail(String),
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// System prompt received.
    pub system: String,
    /// User text received.
    pub user: String,
    /// Temperature received.
    pub temperature: f32,
    /// Token budget received.
    pub max_tokens: u32,
}

/// A generator that never touches the network.
#[derive(Debug)]
pub struct MockGenerator {
    behavior: MockBehavior,
    delay: Option<Duration>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockGenerator {
    /// Mock with the given behavior.
    #[must_use]
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock that always returns `text`.
    #[must_use]
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(text.into()))
    }

    /// Mock that echoes the user text.
    #[must_use]
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Mock that always fails with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fail(reason.into()))
    }

    /// Sleep before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.calls.lock().push(MockCall {
            system: system.to_string(),
            user: user.to_string(),
            temperature,
            max_tokens,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.behavior {
            MockBehavior::Fixed(text) => Ok(text.clone()),
            MockBehavior::Echo => Ok(format!("echo: {user}")),
            MockBehavior::Fail(reason) => Err(LlmError::Unavailable(reason.clone())),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
