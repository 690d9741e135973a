//! Persona presets.
//!
//! A persona supplies three things: an additive affect bias applied after
//! the neuro mix, a neuro-state baseline the modulators drift toward, and
//! default style overrides.

use serde::{Deserialize, Serialize};

use crate::error::{AffectError, Result};
use crate::neuro::NeuroState;
use crate::style::StyleOverrides;
use crate::types::AffectVector;

/// A named personality profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaPreset {
    /// Lookup key (`calm_therapist`).
    pub key: String,
    /// Display name (`Calm therapist`).
    pub name: String,
    /// Additive affect offset.
    pub affect_bias: AffectVector,
    /// Baseline the neuro-state drifts toward.
    pub neuro_baseline: NeuroState,
    /// Default formality / directness / emoji.
    pub style: StyleOverrides,
}

impl PersonaPreset {
    fn builtin(
        key: &str,
        name: &str,
        bias: (f32, f32, f32),
        baseline: (f32, f32, f32),
        style: (f32, f32, f32),
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            affect_bias: AffectVector::new(bias.0, bias.1, bias.2),
            neuro_baseline: NeuroState::new(baseline.0, baseline.1, baseline.2),
            style: StyleOverrides::new(style.0, style.1, style.2),
        }
    }

    /// Soft-spoken, steady, slightly formal.
    #[must_use]
    pub fn calm_therapist() -> Self {
        Self::builtin(
            "calm_therapist",
            "Calm therapist",
            (0.2, -0.2, 0.1),
            (0.1, 0.3, -0.2),
            (0.7, 0.5, 0.2),
        )
    }

    /// Warm, casual, playful.
    #[must_use]
    pub fn supportive_friend() -> Self {
        Self::builtin(
            "supportive_friend",
            "Supportive friend",
            (0.3, 0.1, 0.0),
            (0.2, 0.1, 0.0),
            (0.3, 0.6, 0.7),
        )
    }

    /// Precise, direct, formal.
    #[must_use]
    pub fn analytical_scientist() -> Self {
        Self::builtin(
            "analytical_scientist",
            "Analytical scientist",
            (0.1, 0.0, 0.2),
            (0.0, 0.0, 0.0),
            (0.8, 0.8, 0.1),
        )
    }

    /// Every built-in preset, default first.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::calm_therapist(),
            Self::supportive_friend(),
            Self::analytical_scientist(),
        ]
    }

    /// Find a built-in preset by key or display name, ignoring case.
    ///
    /// # Errors
    /// Returns `AffectError::UnknownPersona` if nothing matches.
    pub fn lookup(name: &str) -> Result<Self> {
        let wanted = name.trim();
        Self::builtins()
            .into_iter()
            .find(|p| p.key.eq_ignore_ascii_case(wanted) || p.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AffectError::UnknownPersona(wanted.to_string()))
    }
}

impl Default for PersonaPreset {
    fn default() -> Self {
        Self::calm_therapist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_key_or_name() {
        let by_key = PersonaPreset::lookup("supportive_friend").expect("builtin");
        let by_name = PersonaPreset::lookup("  SUPPORTIVE friend ").expect("builtin");
        assert_eq!(by_key, by_name);
        assert!((by_key.style.emoji - 0.7).abs() < 1e-6);
    }

    #[test]
    fn unknown_persona_is_an_error() {
        let err = PersonaPreset::lookup("pirate").expect_err("should fail");
        assert!(matches!(err, AffectError::UnknownPersona(ref n) if n == "pirate"));
    }

    #[test]
    fn calm_therapist_is_the_default() {
        let p = PersonaPreset::default();
        assert_eq!(p.key, "calm_therapist");
        assert_eq!(p.affect_bias, AffectVector::new(0.2, -0.2, 0.1));
        assert_eq!(p.neuro_baseline, NeuroState::new(0.1, 0.3, -0.2));
    }

    #[test]
    fn builtins_have_unique_keys() {
        let presets = PersonaPreset::builtins();
        let mut keys: Vec<_> = presets.iter().map(|p| p.key.as_str()).collect();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }
}
