//! Communication style derived from affect.
//!
//! [`Style::from_affect`] is a pure linear map from PAD to five knobs in
//! [0, 1]. The session layer then applies user overrides on top.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AffectVector, clip_unit};

/// Five style parameters, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Friendliness and emotional warmth.
    pub warmth: f32,
    /// Register: casual (0) to professional (1).
    pub formality: f32,
    /// Softening language ("maybe", "perhaps").
    pub hedging: f32,
    /// Propensity to use an emoji.
    pub emoji: f32,
    /// Tempo and energy of the reply.
    pub pace: f32,
}

impl Style {
    /// Derive the style for an affect state.
    ///
    /// ```text
    /// warmth    = 0.5 + 0.4·P − 0.2·D
    /// formality = 0.5 + 0.3·D − 0.2·A
    /// hedging   = 0.6 − 0.4·D + 0.1·(1 − |P|)
    /// emoji     = 0.3 + 0.5·P
    /// pace      = 0.5 + 0.4·A
    /// ```
    #[must_use]
    pub fn from_affect(affect: &AffectVector) -> Self {
        let (p, a, d) = (affect.pleasure(), affect.arousal(), affect.dominance());
        Self {
            warmth: clip_unit(0.5 + 0.4 * p - 0.2 * d),
            formality: clip_unit(0.5 + 0.3 * d - 0.2 * a),
            hedging: clip_unit(0.6 - 0.4 * d + 0.1 * (1.0 - p.abs())),
            emoji: clip_unit(0.3 + 0.5 * p),
            pace: clip_unit(0.5 + 0.4 * a),
        }
    }

    /// Replace knobs with explicit user settings.
    ///
    /// Formality and emoji are taken verbatim, hedging becomes
    /// `1 − directness`, and pace is pulled halfway toward the persona's
    /// arousal bias.
    #[must_use]
    pub fn with_overrides(self, overrides: &StyleOverrides, arousal_bias: f32) -> Self {
        Self {
            warmth: self.warmth,
            formality: clip_unit(overrides.formality),
            hedging: clip_unit(1.0 - overrides.directness),
            emoji: clip_unit(overrides.emoji),
            pace: clip_unit(0.5 * self.pace + 0.5 * (0.5 + arousal_bias)),
        }
    }

    /// Drop hedging and emoji by 0.2 each (floored at 0). Applied when the
    /// user's anger is aimed at the assistant.
    #[must_use]
    pub fn damped_for_anger_at_bot(self) -> Self {
        Self {
            hedging: (self.hedging - 0.2).max(0.0),
            emoji: (self.emoji - 0.2).max(0.0),
            ..self
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::from_affect(&AffectVector::ZERO)
    }
}

/// User-facing style settings layered over the derived style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleOverrides {
    /// Forced formality.
    pub formality: f32,
    /// 1 = very direct, 0 = very hedged.
    pub directness: f32,
    /// Forced emoji propensity.
    pub emoji: f32,
}

impl StyleOverrides {
    /// Build overrides, clamping each knob to [0, 1].
    #[must_use]
    pub fn new(formality: f32, directness: f32, emoji: f32) -> Self {
        Self {
            formality: clip_unit(formality),
            directness: clip_unit(directness),
            emoji: clip_unit(emoji),
        }
    }
}

/// How the reply should relate to the user's emotional tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Reflect the user's tone back.
    Mirror,
    /// Gently lower arousal and increase clarity and agency.
    #[default]
    Regulate,
}

impl Strategy {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Regulate => "regulate",
        }
    }

    /// One-line gloss of both strategies, rendered into the prompt.
    #[must_use]
    pub fn guidance() -> &'static str {
        "mirror=reflect the user's tone; regulate=gently lower arousal / increase clarity and agency"
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mirror" => Ok(Self::Mirror),
            "regulate" => Ok(Self::Regulate),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn neutral_affect_gives_midpoint_style() {
        let s = Style::from_affect(&AffectVector::ZERO);
        assert!(close(s.warmth, 0.5));
        assert!(close(s.formality, 0.5));
        assert!(close(s.hedging, 0.7));
        assert!(close(s.emoji, 0.3));
        assert!(close(s.pace, 0.5));
    }

    #[test]
    fn extreme_affect_stays_in_unit_range() {
        for affect in [
            AffectVector::new(1.0, 1.0, 1.0),
            AffectVector::new(-1.0, -1.0, -1.0),
            AffectVector::new(1.0, -1.0, -1.0),
        ] {
            let s = Style::from_affect(&affect);
            for v in [s.warmth, s.formality, s.hedging, s.emoji, s.pace] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn overrides_replace_formality_emoji_and_hedging() {
        let base = Style::from_affect(&AffectVector::new(0.4, 0.2, 0.0));
        let out = base.with_overrides(&StyleOverrides::new(0.7, 0.5, 0.2), -0.2);
        assert!(close(out.formality, 0.7));
        assert!(close(out.hedging, 0.5));
        assert!(close(out.emoji, 0.2));
        assert!(close(out.warmth, base.warmth));
        assert!(close(out.pace, 0.5 * base.pace + 0.5 * 0.3));
    }

    #[test]
    fn anger_damping_floors_at_zero() {
        let s = Style {
            warmth: 0.5,
            formality: 0.5,
            hedging: 0.1,
            emoji: 0.6,
            pace: 0.5,
        }
        .damped_for_anger_at_bot();
        assert!(close(s.hedging, 0.0));
        assert!(close(s.emoji, 0.4));
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Mirror".parse::<Strategy>(), Ok(Strategy::Mirror));
        assert!("shout".parse::<Strategy>().is_err());
        assert_eq!(Strategy::default(), Strategy::Regulate);
    }
}
