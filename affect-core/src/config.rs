//! Configuration for the affect layer.
//!
//! Maps directly to `affect.toml`. Every field has a default, so partial
//! files are valid and an empty file yields [`AffectConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{AffectError, Result};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffectConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Mood decay and blending.
    #[serde(default)]
    pub mood: MoodConfig,
    /// Simulated neuromodulator dynamics.
    #[serde(default)]
    pub neuro: NeuroConfig,
    /// Short/long-term memory capacity and promotion.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Rapport tracking.
    #[serde(default)]
    pub attachment: AttachmentConfig,
    /// Persona preset selection.
    #[serde(default)]
    pub persona: PersonaConfig,
    /// Generation backend settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Crisis handling.
    #[serde(default)]
    pub safety: SafetyConfig,
}

impl AffectConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `AffectError::Config` if the TOML is invalid, or
    /// `AffectError::InvalidParameter` if a value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| AffectError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check every bounded knob.
    ///
    /// # Errors
    /// Returns `AffectError::InvalidParameter` naming the first bad setting.
    pub fn validate(&self) -> Result<()> {
        unit("mood.decay_rate", self.mood.decay_rate)?;
        unit("mood.blend", self.mood.blend)?;
        unit("neuro.decay_factor", self.neuro.decay_factor)?;
        unit("neuro.learning_rate", self.neuro.learning_rate)?;
        unit("neuro.drift_strength", self.neuro.drift_strength)?;
        unit("neuro.influence", self.neuro.influence)?;
        unit("memory.long_term_threshold", self.memory.long_term_threshold)?;
        unit("attachment.initial", self.attachment.initial)?;
        unit("persona.weight", self.persona.weight)?;
        nonzero("memory.max_short_term", self.memory.max_short_term)?;
        nonzero("memory.max_long_term", self.memory.max_long_term)?;
        nonzero("memory.summary_max_chars", self.memory.summary_max_chars)?;
        Ok(())
    }
}

fn unit(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AffectError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

fn nonzero(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        Err(AffectError::InvalidParameter {
            name: name.to_string(),
            value: "0".to_string(),
        })
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How many exchanges the session transcript keeps.
    #[serde(default = "default_12")]
    pub transcript_limit: usize,
    /// How many reflections the session keeps.
    #[serde(default = "default_50")]
    pub reflection_limit: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            transcript_limit: 12,
            reflection_limit: 50,
        }
    }
}

/// Mood decay and blending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodConfig {
    /// Fraction of the previous mood kept each turn.
    #[serde(default = "default_0_85")]
    pub decay_rate: f32,
    /// Weight given to each new affect delta.
    #[serde(default = "default_0_25")]
    pub blend: f32,
    /// Cap on stored mood snapshots.
    #[serde(default = "default_256")]
    pub history_limit: usize,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.85,
            blend: 0.25,
            history_limit: 256,
        }
    }
}

/// Simulated neuromodulator dynamics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuroConfig {
    /// Per-turn multiplicative pull toward neutral.
    #[serde(default = "default_0_9")]
    pub decay_factor: f32,
    /// How strongly an affect delta moves the modulators.
    #[serde(default = "default_0_4")]
    pub learning_rate: f32,
    /// Per-turn interpolation toward the persona baseline.
    #[serde(default = "default_0_1")]
    pub drift_strength: f32,
    /// Weight of the neuro bias when mixed with mood.
    #[serde(default = "default_0_4")]
    pub influence: f32,
    /// Cap on stored neuro snapshots.
    #[serde(default = "default_256")]
    pub history_limit: usize,
}

impl Default for NeuroConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.9,
            learning_rate: 0.4,
            drift_strength: 0.1,
            influence: 0.4,
            history_limit: 256,
        }
    }
}

/// Short/long-term memory capacity and promotion policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Short-term cap (oldest evicted first).
    #[serde(default = "default_20")]
    pub max_short_term: usize,
    /// Long-term cap (least important evicted first).
    #[serde(default = "default_12")]
    pub max_long_term: usize,
    /// Minimum importance for long-term promotion.
    #[serde(default = "default_0_6")]
    pub long_term_threshold: f32,
    /// Short-term records included in the prompt context.
    #[serde(default = "default_4")]
    pub context_short_term: usize,
    /// Long-term records included in the prompt context.
    #[serde(default = "default_6")]
    pub context_long_term: usize,
    /// Character limit of a long-term summary before the ellipsis.
    #[serde(default = "default_140")]
    pub summary_max_chars: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_short_term: 20,
            max_long_term: 12,
            long_term_threshold: 0.6,
            context_short_term: 4,
            context_long_term: 6,
            summary_max_chars: 140,
        }
    }
}

/// Rapport tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentConfig {
    /// Starting bond strength.
    #[serde(default = "default_0_3")]
    pub initial: f32,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self { initial: 0.3 }
    }
}

/// Persona preset selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Preset key or display name.
    #[serde(default = "default_persona")]
    pub preset: String,
    /// How strongly the persona bias shifts the effective affect.
    #[serde(default = "default_0_5")]
    pub weight: f32,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            preset: default_persona(),
            weight: 0.5,
        }
    }
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "ollama", "openai", "none".
    #[serde(default = "default_ollama")]
    pub provider: String,
    /// Base URL for the API.
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for OpenAI-compatible providers.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_0_6")]
    pub temperature: f32,
    /// Maximum generated tokens.
    #[serde(default = "default_350")]
    pub max_tokens: u32,
    /// Hard timeout for a generation call in milliseconds.
    #[serde(default = "default_60000")]
    pub request_timeout_ms: u64,
    /// Retries after the first failed attempt.
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: default_ollama_url(),
            model: default_model(),
            api_key: None,
            temperature: 0.6,
            max_tokens: 350,
            request_timeout_ms: 60_000,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Apply `AFFECT_LLM_URL` / `AFFECT_LLM_MODEL` / `AFFECT_LLM_API_KEY` if set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("AFFECT_LLM_URL") {
            self.base_url = url;
        }
        if let Ok(model) = std::env::var("AFFECT_LLM_MODEL") {
            self.model = model;
        }
        if let Ok(key) = std::env::var("AFFECT_LLM_API_KEY") {
            self.api_key = Some(key);
        }
        self
    }
}

/// Crisis handling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Replacement for the built-in supportive message.
    #[serde(default)]
    pub crisis_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_persona() -> String {
    "calm_therapist".to_string()
}
fn default_ollama() -> String {
    "ollama".to_string()
}
fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3.2:3b".to_string()
}
fn default_4() -> usize {
    4
}
fn default_6() -> usize {
    6
}
fn default_12() -> usize {
    12
}
fn default_20() -> usize {
    20
}
fn default_50() -> usize {
    50
}
fn default_140() -> usize {
    140
}
fn default_256() -> usize {
    256
}
fn default_350() -> u32 {
    350
}
fn default_60000() -> u64 {
    60_000
}
fn default_0_1() -> f32 {
    0.1
}
fn default_0_25() -> f32 {
    0.25
}
fn default_0_3() -> f32 {
    0.3
}
fn default_0_4() -> f32 {
    0.4
}
fn default_0_5() -> f32 {
    0.5
}
fn default_0_6() -> f32 {
    0.6
}
fn default_0_85() -> f32 {
    0.85
}
fn default_0_9() -> f32 {
    0.9
}
