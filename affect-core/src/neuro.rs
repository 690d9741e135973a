//! Simulated neuromodulators.
//!
//! Three bounded scalars run alongside the mood and bias it:
//!
//! - **reward**: motivation and optimism
//! - **safety**: calm, sense of being cared for
//! - **alertness**: arousal and stress
//!
//! A turn drifts the state toward a persona baseline, decays it toward
//! neutral, then applies the turn's affect delta (see [`NeuroState::step`]).
//! The projection back into PAD space is a fixed linear map.

use serde::{Deserialize, Serialize};

use crate::config::NeuroConfig;
use crate::types::{AffectVector, clip_signed, clip_unit};

/// Three neuromodulator levels, each in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNeuro")]
pub struct NeuroState {
    reward: f32,
    safety: f32,
    alertness: f32,
}

#[derive(Deserialize)]
struct RawNeuro {
    reward: f32,
    safety: f32,
    alertness: f32,
}

impl From<RawNeuro> for NeuroState {
    fn from(raw: RawNeuro) -> Self {
        Self::new(raw.reward, raw.safety, raw.alertness)
    }
}

impl NeuroState {
    /// Neutral levels.
    pub const NEUTRAL: Self = Self {
        reward: 0.0,
        safety: 0.0,
        alertness: 0.0,
    };

    /// Create a state, clipping each level to [-1, 1].
    #[must_use]
    pub fn new(reward: f32, safety: f32, alertness: f32) -> Self {
        Self {
            reward: clip_signed(reward),
            safety: clip_signed(safety),
            alertness: clip_signed(alertness),
        }
    }

    /// Reward modulator.
    #[must_use]
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// Safety modulator.
    #[must_use]
    pub fn safety(&self) -> f32 {
        self.safety
    }

    /// Alertness modulator.
    #[must_use]
    pub fn alertness(&self) -> f32 {
        self.alertness
    }

    /// Multiply every level by `factor`, pulling toward neutral.
    #[must_use]
    pub fn decayed(&self, factor: f32) -> Self {
        Self::new(
            self.reward * factor,
            self.safety * factor,
            self.alertness * factor,
        )
    }

    /// React to one turn's affect delta.
    ///
    /// Positive pleasure feeds reward (fully) and safety (half); negative
    /// pleasure feeds alertness. Positive arousal feeds alertness, and
    /// dominance always nudges reward.
    #[must_use]
    pub fn updated_from_delta(&self, delta: AffectVector, learning_rate: f32) -> Self {
        let rate = learning_rate;
        let mut reward = self.reward;
        let mut safety = self.safety;
        let mut alertness = self.alertness;

        if delta.pleasure() >= 0.0 {
            reward += rate * delta.pleasure();
            safety += 0.5 * rate * delta.pleasure();
        } else {
            alertness += 0.4 * rate * delta.pleasure().abs();
        }

        if delta.arousal() > 0.0 {
            alertness += 0.6 * rate * delta.arousal();
        }

        reward += 0.1 * rate * delta.dominance();

        Self::new(reward, safety, alertness)
    }

    /// Linear interpolation toward `baseline` by `strength` (clamped to [0, 1]).
    #[must_use]
    pub fn drifted_toward(&self, baseline: &Self, strength: f32) -> Self {
        let a = clip_unit(strength);
        Self::new(
            self.reward * (1.0 - a) + baseline.reward * a,
            self.safety * (1.0 - a) + baseline.safety * a,
            self.alertness * (1.0 - a) + baseline.alertness * a,
        )
    }

    /// Full per-turn transition: drift, then decay, then update.
    #[must_use]
    pub fn step(&self, baseline: &Self, delta: AffectVector, config: &NeuroConfig) -> Self {
        self.drifted_toward(baseline, config.drift_strength)
            .decayed(config.decay_factor)
            .updated_from_delta(delta, config.learning_rate)
    }

    /// Project to a PAD bias.
    ///
    /// ```text
    /// P = 0.5·reward + 0.6·safety − 0.2·alertness
    /// A = 0.4·reward − 0.2·safety + 0.7·alertness
    /// D = 0.3·reward − 0.3·safety + 0.6·alertness
    /// ```
    #[must_use]
    pub fn to_affect_bias(&self) -> AffectVector {
        let (r, s, n) = (self.reward, self.safety, self.alertness);
        AffectVector::new(
            0.5 * r + 0.6 * s - 0.2 * n,
            0.4 * r - 0.2 * s + 0.7 * n,
            0.3 * r - 0.3 * s + 0.6 * n,
        )
    }
}

/// Blend mood with the neuro bias: `(1 - w)·mood + w·neuro_bias`.
#[must_use]
pub fn mix_with_neuro(mood: AffectVector, neuro: &NeuroState, influence: f32) -> AffectVector {
    mood.mix(&neuro.to_affect_bias(), influence)
}
