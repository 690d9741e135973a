//! Mood: the persistent, decaying running affect.
//!
//! Each update is an exponential blend:
//!
//! ```text
//! mood' = clip(decay_rate · mood + blend · delta)
//! ```
//!
//! Old mood fades geometrically (half-life ≈ `ln 0.5 / ln decay_rate` turns)
//! while new input enters at the fixed weight `blend`. The two knobs are
//! independent: `decay_rate` sets persistence, `blend` sets reactivity.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::MoodConfig;
use crate::types::{AffectVector, clip_unit};

/// Owns the current mood and a bounded history of snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodTracker {
    current: AffectVector,
    decay_rate: f32,
    history: VecDeque<AffectVector>,
    history_limit: usize,
}

impl MoodTracker {
    /// Neutral mood with the given decay rate (clamped to [0, 1]).
    #[must_use]
    pub fn new(decay_rate: f32) -> Self {
        Self {
            current: AffectVector::ZERO,
            decay_rate: clip_unit(decay_rate),
            history: VecDeque::new(),
            history_limit: MoodConfig::default().history_limit,
        }
    }

    /// Neutral mood configured from the `[mood]` section.
    #[must_use]
    pub fn from_config(config: &MoodConfig) -> Self {
        let mut tracker = Self::new(config.decay_rate);
        tracker.history_limit = config.history_limit.max(1);
        tracker
    }

    /// Apply one turn's affect delta and return the new mood.
    ///
    /// The new state is appended to the history; the oldest snapshot is
    /// dropped once the history is at its limit.
    pub fn update(&mut self, delta: AffectVector, blend: f32) -> AffectVector {
        let decayed = self.current.scale(self.decay_rate);
        self.current = decayed + delta.scale(clip_unit(blend));

        if self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(self.current);

        trace!(mood = %self.current, "mood updated");
        self.current
    }

    /// Current mood.
    #[must_use]
    pub fn current(&self) -> AffectVector {
        self.current
    }

    /// Reinitialise to neutral (or `baseline`) and clear the history.
    pub fn reset(&mut self, baseline: Option<AffectVector>) {
        self.current = baseline.unwrap_or_default();
        self.history.clear();
    }

    /// Past snapshots, oldest first. One per [`update`](Self::update) call.
    #[must_use]
    pub fn history(&self) -> &VecDeque<AffectVector> {
        &self.history
    }

    /// The per-turn persistence factor.
    #[must_use]
    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// Change the decay rate without touching the current mood.
    pub fn set_decay_rate(&mut self, decay_rate: f32) {
        self.decay_rate = clip_unit(decay_rate);
    }

    /// Turns for an undisturbed mood to fall to half its magnitude.
    ///
    /// Zero when `decay_rate` is 0 (mood is forgotten immediately) and
    /// infinite when it is 1 (mood never fades).
    #[must_use]
    pub fn half_life_turns(&self) -> f32 {
        if self.decay_rate <= 0.0 {
            0.0
        } else if self.decay_rate >= 1.0 {
            f32::INFINITY
        } else {
            0.5_f32.ln() / self.decay_rate.ln()
        }
    }
}

impl Default for MoodTracker {
    fn default() -> Self {
        Self::from_config(&MoodConfig::default())
    }
}
