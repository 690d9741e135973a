//! Reply policy: system prompt assembly and graceful fallback.

use std::time::Instant;

use affect_core::config::LlmConfig;
use affect_core::{AffectVector, Strategy, Style};
use affect_llm::prompt::{PromptTemplate, fallback_reply};
use affect_llm::Generator;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::controls::Controls;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Produced by the generation backend.
    Generated,
    /// Backend failed; the fallback text was used.
    Fallback,
    /// Crisis message; the backend was not called.
    Crisis,
}

/// A reply and its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Text shown to the user.
    pub text: String,
    /// Where it came from.
    pub source: ReplySource,
    /// Generation latency, when the backend was called.
    pub latency_ms: Option<u64>,
}

/// Prompt template plus sampling settings.
#[derive(Debug, Clone)]
pub struct ReplyPolicy {
    template: PromptTemplate,
    temperature: f32,
    max_tokens: u32,
}

impl ReplyPolicy {
    /// Built-in template with the configured sampling settings.
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            template: PromptTemplate::builtin(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Use a different system prompt template.
    #[must_use]
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Active template.
    #[must_use]
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Render the system prompt for one turn.
    #[must_use]
    pub fn system_prompt(&self, affect: &AffectVector, style: &Style, controls: &Controls) -> String {
        build_system_prompt(&self.template, affect, style, controls)
    }

    /// Ask the backend for a reply, substituting the fallback on failure.
    pub async fn reply(&self, generator: &dyn Generator, system: &str, user: &str) -> Reply {
        let start = Instant::now();
        let result = generator
            .generate(system, user, self.temperature, self.max_tokens)
            .await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(text) => {
                debug!(latency_ms, backend = %generator.describe(), "reply generated");
                Reply {
                    text,
                    source: ReplySource::Generated,
                    latency_ms: Some(latency_ms),
                }
            }
            Err(e) => {
                warn!(error = %e, backend = %generator.describe(), "generation failed, using fallback");
                Reply {
                    text: fallback_reply(&e),
                    source: ReplySource::Fallback,
                    latency_ms: Some(latency_ms),
                }
            }
        }
    }
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default())
    }
}

/// Fill `template` with the affect, style, strategy and persona settings.
#[must_use]
pub fn build_system_prompt(
    template: &PromptTemplate,
    affect: &AffectVector,
    style: &Style,
    controls: &Controls,
) -> String {
    let strategy = controls.strategy();
    let two = |x: f32| format!("{x:.2}");
    let bias = controls.persona_bias();
    let overrides = controls.style();
    let values = [
        ("pleasure", two(affect.pleasure())),
        ("arousal", two(affect.arousal())),
        ("dominance", two(affect.dominance())),
        ("warmth", two(style.warmth)),
        ("formality", two(style.formality)),
        ("hedging", two(style.hedging)),
        ("emoji", two(style.emoji)),
        ("pace", two(style.pace)),
        ("strategy", strategy.as_str().to_string()),
        ("strategy_guidance", Strategy::guidance().to_string()),
        ("valence_bias", two(bias.pleasure())),
        ("arousal_bias", two(bias.arousal())),
        ("dominance_bias", two(bias.dominance())),
        ("persona_weight", two(controls.persona_weight())),
        ("directness", two(overrides.directness)),
        ("persona_formality", two(overrides.formality)),
        ("persona_emoji", two(overrides.emoji)),
    ];
    let vars: Vec<(&str, &str)> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
    template.render(&vars)
}
