//! User-adjustable knobs for one session.
//!
//! Controls start from the active persona and the configuration, and can be
//! moved individually afterwards. Every setter clamps, so the pipeline never
//! sees an out-of-range weight.

use affect_core::config::AffectConfig;
use affect_core::neuro::mix_with_neuro;
use affect_core::{AffectVector, NeuroState, PersonaPreset, Strategy, Style, StyleOverrides, clip_unit};
use serde::Serialize;

/// Largest magnitude of any persona bias component.
pub const PERSONA_BIAS_LIMIT: f32 = 0.5;

/// Per-session tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Controls {
    strategy: Strategy,
    persona_bias: AffectVector,
    persona_weight: f32,
    neuro_influence: f32,
    blend: f32,
    decay_rate: f32,
    style: StyleOverrides,
}

impl Controls {
    /// Controls seeded from a persona and the configured weights.
    #[must_use]
    pub fn from_persona(preset: &PersonaPreset, config: &AffectConfig) -> Self {
        let mut controls = Self {
            strategy: Strategy::default(),
            persona_bias: AffectVector::ZERO,
            persona_weight: clip_unit(config.persona.weight),
            neuro_influence: clip_unit(config.neuro.influence),
            blend: clip_unit(config.mood.blend),
            decay_rate: clip_unit(config.mood.decay_rate),
            style: preset.style,
        };
        controls.set_persona_bias(preset.affect_bias);
        controls
    }

    /// Take bias and style defaults from another persona. Weights are kept.
    pub fn apply_persona(&mut self, preset: &PersonaPreset) {
        self.set_persona_bias(preset.affect_bias);
        self.style = preset.style;
    }

    // -- accessors ----------------------------------------------------------

    /// Reply strategy.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Persona bias, each component in [-0.5, 0.5].
    #[must_use]
    pub fn persona_bias(&self) -> AffectVector {
        self.persona_bias
    }

    /// How strongly the persona bias applies.
    #[must_use]
    pub fn persona_weight(&self) -> f32 {
        self.persona_weight
    }

    /// Weight of the neuro projection in the effective affect.
    #[must_use]
    pub fn neuro_influence(&self) -> f32 {
        self.neuro_influence
    }

    /// Mood blend factor for new deltas.
    #[must_use]
    pub fn blend(&self) -> f32 {
        self.blend
    }

    /// Mood decay per turn.
    #[must_use]
    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// Formality, directness and emoji overrides.
    #[must_use]
    pub fn style(&self) -> StyleOverrides {
        self.style
    }

    // -- setters ------------------------------------------------------------

    /// Set the reply strategy.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    /// Set the persona bias; each component is clamped to [-0.5, 0.5].
    pub fn set_persona_bias(&mut self, bias: AffectVector) {
        let clamp = |x: f32| x.clamp(-PERSONA_BIAS_LIMIT, PERSONA_BIAS_LIMIT);
        self.persona_bias = AffectVector::new(
            clamp(bias.pleasure()),
            clamp(bias.arousal()),
            clamp(bias.dominance()),
        );
    }

    /// Set the persona weight.
    pub fn set_persona_weight(&mut self, weight: f32) {
        self.persona_weight = clip_unit(weight);
    }

    /// Set the neuro influence.
    pub fn set_neuro_influence(&mut self, influence: f32) {
        self.neuro_influence = clip_unit(influence);
    }

    /// Set the mood blend.
    pub fn set_blend(&mut self, blend: f32) {
        self.blend = clip_unit(blend);
    }

    /// Set the mood decay.
    pub fn set_decay_rate(&mut self, decay_rate: f32) {
        self.decay_rate = clip_unit(decay_rate);
    }

    /// Set the style overrides.
    pub fn set_style(&mut self, formality: f32, directness: f32, emoji: f32) {
        self.style = StyleOverrides::new(formality, directness, emoji);
    }

    // -- derived ------------------------------------------------------------

    /// Mood mixed with the neuro projection, then offset by the persona bias.
    #[must_use]
    pub fn effective_affect(&self, mood: AffectVector, neuro: &NeuroState) -> AffectVector {
        mix_with_neuro(mood, neuro, self.neuro_influence).offset(&self.persona_bias, self.persona_weight)
    }

    /// Style for the effective affect with overrides applied.
    #[must_use]
    pub fn style_for(&self, effective: &AffectVector, anger_at_bot: bool) -> Style {
        let style = Style::from_affect(effective).with_overrides(&self.style, self.persona_bias.arousal());
        if anger_at_bot {
            style.damped_for_anger_at_bot()
        } else {
            style
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::from_persona(&PersonaPreset::default(), &AffectConfig::default())
    }
}
