//! Crisis detection.
//!
//! A fixed, case-insensitive whole-word pattern over self-harm phrasing.
//! A match short-circuits reply generation for the turn; every other turn
//! step still runs with the label forced to [`EmotionLabel::Safety`].
//!
//! [`EmotionLabel::Safety`]: crate::types::EmotionLabel::Safety

use std::sync::LazyLock;

use regex::Regex;

use crate::config::SafetyConfig;

/// Supportive reply used when no override is configured.
pub const DEFAULT_CRISIS_MESSAGE: &str = "I am really sorry you are going through this. \
You are not alone. If you are in immediate danger, please call your local emergency number. \
In the UK you can contact Samaritans 24/7 at 116 123 or text SHOUT to 85258.";

static CRISIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(self\s*harm|suicide|kill myself|end it all|overdose)\b")
        .expect("crisis pattern is valid")
});

/// Pattern-matching crisis check.
#[derive(Debug, Clone)]
pub struct CrisisDetector {
    message: String,
}

impl CrisisDetector {
    /// Detector replying with `message` on a match.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Detector using the configured message, or the default one.
    #[must_use]
    pub fn from_config(config: &SafetyConfig) -> Self {
        Self::new(
            config
                .crisis_message
                .clone()
                .unwrap_or_else(|| DEFAULT_CRISIS_MESSAGE.to_string()),
        )
    }

    /// The supportive message when `text` matches, `None` otherwise.
    #[must_use]
    pub fn check(&self, text: &str) -> Option<&str> {
        CRISIS.is_match(text).then_some(self.message.as_str())
    }
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CRISIS_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive() {
        let detector = CrisisDetector::default();
        let reply = detector.check("I want to KILL MYSELF");
        assert_eq!(reply, Some(DEFAULT_CRISIS_MESSAGE));
        assert!(detector.check("thinking about self harm").is_some());
        assert!(detector.check("thinking about selfharm").is_some());
    }

    #[test]
    fn ordinary_text_passes() {
        let detector = CrisisDetector::default();
        assert!(detector.check("I had a rough day at work").is_none());
        // whole-word only
        assert!(detector.check("the suicides squad").is_none());
    }

    #[test]
    fn configured_message_overrides_default() {
        let detector = CrisisDetector::from_config(&SafetyConfig {
            crisis_message: Some("Please reach out to someone you trust.".to_string()),
        });
        assert_eq!(
            detector.check("overdose"),
            Some("Please reach out to someone you trust.")
        );
    }

    #[test]
    fn default_message_mentions_hotlines() {
        assert!(DEFAULT_CRISIS_MESSAGE.contains("116 123"));
        assert!(DEFAULT_CRISIS_MESSAGE.contains("85258"));
    }
}
