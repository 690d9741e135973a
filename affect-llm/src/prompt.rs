//! Prompt templates for reply generation.
//!
//! The system prompt carries the assistant's effective affect, the derived
//! style knobs, the reply strategy and the persona settings. Placeholders are
//! `{key}` and are filled by [`render_template`]. An alternative system
//! prompt can be loaded from a TOML file with a `[prompt]` table.

use std::path::Path;

use serde::Deserialize;

use crate::error::LlmError;

/// Default system prompt for replies.
pub const REPLY_SYSTEM: &str = r"You are an empathetic, emotionally intelligent AI assistant. Respond succinctly (1-3 sentences), clearly, and supportively. Offer a small concrete next step or a focused question when helpful.

PAD mood (after persona bias): pleasure={pleasure}, arousal={arousal}, dominance={dominance}.
Style knobs: warmth={warmth}, formality={formality}, hedging={hedging}, emoji={emoji}, pace={pace}.
Strategy: {strategy} ({strategy_guidance}).
Communication guidance:
- Use a tone consistent with the PAD mood and style knobs.
- If emoji>0.5, include at most ONE light emoji; otherwise avoid emojis.
- Higher formality means more precise, professional wording.
- Lower hedging means fewer 'maybe/might/perhaps'; higher hedging means softer language.
- Keep answers concrete, avoid generic platitudes.

Persona:
- valence_bias={valence_bias}, arousal_bias={arousal_bias}, dominance_bias={dominance_bias}, weight={persona_weight}
- directness={directness} (1=very direct, 0=very hedged), formality={persona_formality}, emoji_playfulness={persona_emoji}
- Honor persona settings when wording the reply.
";

/// Every placeholder [`REPLY_SYSTEM`] expects.
pub const REPLY_VARS: &[&str] = &[
    "pleasure",
    "arousal",
    "dominance",
    "warmth",
    "formality",
    "hedging",
    "emoji",
    "pace",
    "strategy",
    "strategy_guidance",
    "valence_bias",
    "arousal_bias",
    "dominance_bias",
    "persona_weight",
    "directness",
    "persona_formality",
    "persona_emoji",
];

/// Line placed between the memory context and the user's message.
pub const CURRENT_MESSAGE_MARKER: &str = "Current message from the user:";

/// Prefix of every reply produced when generation fails.
pub const FALLBACK_PREFIX: &str = "(Fallback) I'm having trouble reaching the language model:";

/// Reply used in place of a failed generation.
#[must_use]
pub fn fallback_reply(error: &impl std::fmt::Display) -> String {
    format!("{FALLBACK_PREFIX} {error}")
}

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value. Unknown placeholders are
/// left as they are.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Single-string prompt for completion-style backends.
#[must_use]
pub fn ollama_prompt(system: &str, user: &str) -> String {
    format!("{system}\n\nUser: {user}\nAssistant:")
}

/// Prefix the user's message with memory context.
///
/// An empty context leaves the message untouched.
#[must_use]
pub fn with_memory_context(context: &str, user_text: &str) -> String {
    if context.is_empty() {
        user_text.to_string()
    } else {
        format!("{context}\n\n{CURRENT_MESSAGE_MARKER}\n{user_text}")
    }
}

// ---------------------------------------------------------------------------
// PromptTemplate: TOML-loadable system prompt
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PromptFile {
    prompt: PromptSection,
}

#[derive(Deserialize)]
struct PromptSection {
    system: String,
    #[serde(default)]
    version: Option<u32>,
}

/// A system prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Template text with `{key}` placeholders.
    pub system: String,
    /// Version tag, if the file declares one.
    pub version: u32,
}

impl PromptTemplate {
    /// The built-in reply prompt.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            system: REPLY_SYSTEM.to_string(),
            version: 1,
        }
    }

    /// Parse a template from TOML (`[prompt] system = "..."`).
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` if the TOML is malformed or the
    /// `[prompt]` table is missing.
    pub fn from_toml(toml_str: &str) -> Result<Self, LlmError> {
        let file: PromptFile =
            toml::from_str(toml_str).map_err(|e| LlmError::ConfigError(e.to_string()))?;
        Ok(Self {
            system: file.prompt.system,
            version: file.prompt.version.unwrap_or(1),
        })
    }

    /// Load a template from a TOML file.
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LlmError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Fill the template.
    #[must_use]
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        render_template(&self.system, vars)
    }

    /// Placeholders from [`REPLY_VARS`] the template does not use.
    #[must_use]
    pub fn unused_vars(&self) -> Vec<&'static str> {
        REPLY_VARS
            .iter()
            .copied()
            .filter(|key| !self.system.contains(&format!("{{{key}}}")))
            .collect()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_rendering_works() {
        let out = render_template("mood {pleasure}, pace {pace}", &[("pleasure", "0.10"), ("pace", "0.50")]);
        assert_eq!(out, "mood 0.10, pace 0.50");
    }

    #[test]
    fn template_handles_missing_vars() {
        let out = render_template("hello {name}", &[]);
        assert_eq!(out, "hello {name}");
    }

    #[test]
    fn builtin_uses_every_reply_var() {
        assert!(PromptTemplate::builtin().unused_vars().is_empty());
    }

    #[test]
    fn ollama_prompt_layout() {
        assert_eq!(ollama_prompt("SYS", "hi"), "SYS\n\nUser: hi\nAssistant:");
    }

    #[test]
    fn memory_context_prefix() {
        assert_eq!(with_memory_context("", "hello"), "hello");
        assert_eq!(
            with_memory_context("Recent conversation snippets:\n- a", "hello"),
            "Recent conversation snippets:\n- a\n\nCurrent message from the user:\nhello"
        );
    }

    #[test]
    fn template_parses_from_toml() {
        let template = PromptTemplate::from_toml(
            "[prompt]\nversion = 3\nsystem = \"Be brief. Mood {pleasure}.\"\n",
        )
        .expect("valid toml");
        assert_eq!(template.version, 3);
        assert_eq!(template.render(&[("pleasure", "0.20")]), "Be brief. Mood 0.20.");
        assert!(template.unused_vars().contains(&"warmth"));
    }

    #[test]
    fn template_without_prompt_table_is_rejected() {
        assert!(PromptTemplate::from_toml("system = \"x\"").is_err());
    }
}
