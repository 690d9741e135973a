//! Attachment: a bounded rapport signal between user and assistant.
//!
//! | Condition                                         | Δ      |
//! |---------------------------------------------------|--------|
//! | gratitude/joy, not aimed at the bot, compound > 0.2 | +0.04 |
//! | sadness/fear about the user themself              | +0.02  |
//! | anger aimed at the bot                            | −0.05  |
//! | crisis turn handled                               | +0.01  |
//!
//! Deltas are summed, applied, and the result clipped to [0, 1].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::appraisal::Signals;
use crate::config::AttachmentConfig;
use crate::types::{EmotionLabel, Target, clip_unit};

/// Compound sentiment a positive turn needs before it builds rapport.
pub const POSITIVE_COMPOUND_THRESHOLD: f32 = 0.2;

/// Change in attachment produced by one turn, before clipping.
#[must_use]
pub fn attachment_delta(label: &EmotionLabel, target: Target, signals: &Signals) -> f32 {
    let mut delta = 0.0;

    if matches!(label, EmotionLabel::Gratitude | EmotionLabel::Joy)
        && target != Target::Bot
        && signals.compound > POSITIVE_COMPOUND_THRESHOLD
    {
        delta += 0.04;
    }
    if matches!(label, EmotionLabel::Sadness | EmotionLabel::Fear) && target == Target::SelfDirected
    {
        delta += 0.02;
    }
    if *label == EmotionLabel::Anger && target == Target::Bot {
        delta -= 0.05;
    }
    if label.is_crisis() {
        delta += 0.01;
    }

    delta
}

/// Apply one turn to an attachment value.
#[must_use]
pub fn update_attachment(
    current: f32,
    label: &EmotionLabel,
    target: Target,
    signals: &Signals,
) -> f32 {
    clip_unit(current + attachment_delta(label, target, signals))
}

/// Coarse description of an attachment value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentLevel {
    /// Below 0.2.
    VeryLow,
    /// 0.2 up to 0.4.
    Low,
    /// 0.4 up to 0.7.
    Moderate,
    /// 0.7 and above.
    High,
}

impl AttachmentLevel {
    /// Bucket a value.
    #[must_use]
    pub fn from_value(value: f32) -> Self {
        if value < 0.2 {
            Self::VeryLow
        } else if value < 0.4 {
            Self::Low
        } else if value < 0.7 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

impl fmt::Display for AttachmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        })
    }
}

/// Owns the attachment scalar for one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttachmentTracker {
    value: f32,
    initial: f32,
}

impl AttachmentTracker {
    /// Tracker starting at `initial` (clipped to [0, 1]).
    #[must_use]
    pub fn new(initial: f32) -> Self {
        let initial = clip_unit(initial);
        Self {
            value: initial,
            initial,
        }
    }

    /// Tracker configured from the `[attachment]` section.
    #[must_use]
    pub fn from_config(config: &AttachmentConfig) -> Self {
        Self::new(config.initial)
    }

    /// Apply one turn and return the new value.
    pub fn update(&mut self, label: &EmotionLabel, target: Target, signals: &Signals) -> f32 {
        self.value = update_attachment(self.value, label, target, signals);
        self.value
    }

    /// Current value in [0, 1].
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Coarse bucket of the current value.
    #[must_use]
    pub fn level(&self) -> AttachmentLevel {
        AttachmentLevel::from_value(self.value)
    }

    /// Back to the starting value.
    pub fn reset(&mut self) {
        self.value = self.initial;
    }
}

impl Default for AttachmentTracker {
    fn default() -> Self {
        Self::from_config(&AttachmentConfig::default())
    }
}
