//! Core type definitions shared by every affect component.
//!
//! All bounded values are clipped on construction, so a consumer can never
//! observe an out-of-range component, even transiently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Clipping
// ---------------------------------------------------------------------------

/// Clip to the signed unit interval `[-1, 1]`. NaN collapses to 0.
#[must_use]
pub fn clip_signed(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) }
}

/// Clip to the unit interval `[0, 1]`. NaN collapses to 0.
#[must_use]
pub fn clip_unit(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Unique identifier for a memory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryId(pub Uuid);

impl MemoryId {
    /// Create a new random memory ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Affect Vector: PAD (Pleasure-Arousal-Dominance)
// ---------------------------------------------------------------------------

/// A point in PAD space (Russell & Mehrabian, 1977).
///
/// Each axis ranges from -1.0 to 1.0:
/// - **Pleasure**: unhappy (-1) → happy (+1)
/// - **Arousal**: calm (-1) → excited (+1)
/// - **Dominance**: submissive (-1) → dominant (+1)
///
/// Value semantics: every operation returns a new, clipped vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAffect")]
pub struct AffectVector {
    pleasure: f32,
    arousal: f32,
    dominance: f32,
}

/// Unchecked wire shape; converted through [`AffectVector::new`] on load.
#[derive(Deserialize)]
struct RawAffect {
    pleasure: f32,
    arousal: f32,
    dominance: f32,
}

impl From<RawAffect> for AffectVector {
    fn from(raw: RawAffect) -> Self {
        Self::new(raw.pleasure, raw.arousal, raw.dominance)
    }
}

impl AffectVector {
    /// Neutral affect.
    pub const ZERO: Self = Self {
        pleasure: 0.0,
        arousal: 0.0,
        dominance: 0.0,
    };

    /// Create a new vector, clipping each component to [-1, 1].
    #[must_use]
    pub fn new(pleasure: f32, arousal: f32, dominance: f32) -> Self {
        Self {
            pleasure: clip_signed(pleasure),
            arousal: clip_signed(arousal),
            dominance: clip_signed(dominance),
        }
    }

    /// Pleasure (valence) component.
    #[must_use]
    pub fn pleasure(&self) -> f32 {
        self.pleasure
    }

    /// Arousal (energy) component.
    #[must_use]
    pub fn arousal(&self) -> f32 {
        self.arousal
    }

    /// Dominance (sense of control) component.
    #[must_use]
    pub fn dominance(&self) -> f32 {
        self.dominance
    }

    /// `(pleasure, arousal, dominance)` as an array.
    #[must_use]
    pub fn as_array(&self) -> [f32; 3] {
        [self.pleasure, self.arousal, self.dominance]
    }

    /// Multiply every component by `factor`.
    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(
            self.pleasure * factor,
            self.arousal * factor,
            self.dominance * factor,
        )
    }

    /// Weighted average `(1 - w)·self + w·other`, with `w` clamped to [0, 1].
    #[must_use]
    pub fn mix(&self, other: &Self, weight: f32) -> Self {
        let w = clip_unit(weight);
        Self::new(
            (1.0 - w) * self.pleasure + w * other.pleasure,
            (1.0 - w) * self.arousal + w * other.arousal,
            (1.0 - w) * self.dominance + w * other.dominance,
        )
    }

    /// Add `offset` scaled by `weight` (clamped to [0, 1]).
    ///
    /// The offset's components are applied independently, so this is the
    /// additive persona bias rather than an interpolation.
    #[must_use]
    pub fn offset(&self, offset: &Self, weight: f32) -> Self {
        let w = clip_unit(weight);
        Self::new(
            self.pleasure + offset.pleasure * w,
            self.arousal + offset.arousal * w,
            self.dominance + offset.dominance * w,
        )
    }

    /// Euclidean magnitude.
    #[must_use]
    pub fn intensity(&self) -> f32 {
        (self.pleasure * self.pleasure
            + self.arousal * self.arousal
            + self.dominance * self.dominance)
            .sqrt()
    }

    /// Sum of absolute components.
    #[must_use]
    pub fn manhattan(&self) -> f32 {
        self.pleasure.abs() + self.arousal.abs() + self.dominance.abs()
    }

    /// Whether every component is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.pleasure == 0.0 && self.arousal == 0.0 && self.dominance == 0.0
    }
}

impl Default for AffectVector {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for AffectVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.pleasure + rhs.pleasure,
            self.arousal + rhs.arousal,
            self.dominance + rhs.dominance,
        )
    }
}

impl fmt::Display for AffectVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P={:.2} A={:.2} D={:.2}",
            self.pleasure, self.arousal, self.dominance
        )
    }
}

// ---------------------------------------------------------------------------
// Emotion labels
// ---------------------------------------------------------------------------

/// Emotion label produced by the appraisal step.
///
/// The vocabulary is open: anything the classifier emits that is not one of
/// the known labels is carried as [`EmotionLabel::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmotionLabel {
    /// Happiness, delight.
    Joy,
    /// Thanks, appreciation.
    Gratitude,
    /// Pride in an achievement.
    Pride,
    /// Anger, frustration.
    Anger,
    /// Sadness, low mood.
    Sadness,
    /// Fear, panic.
    Fear,
    /// Worry.
    Anxiety,
    /// Shame, embarrassment.
    Shame,
    /// No discernible emotion.
    Neutral,
    /// Crisis turn forced by the safety check.
    Safety,
    /// Any label outside the known vocabulary.
    Other(String),
}

impl EmotionLabel {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Joy => "joy",
            Self::Gratitude => "gratitude",
            Self::Pride => "pride",
            Self::Anger => "anger",
            Self::Sadness => "sadness",
            Self::Fear => "fear",
            Self::Anxiety => "anxiety",
            Self::Shame => "shame",
            Self::Neutral => "neutral",
            Self::Safety => "safety",
            Self::Other(name) => name,
        }
    }

    /// Whether this label denotes a crisis/safety turn.
    #[must_use]
    pub fn is_crisis(&self) -> bool {
        matches!(self, Self::Safety)
    }

    /// Negative labels that make a turn more memorable.
    #[must_use]
    pub fn is_negative_salient(&self) -> bool {
        matches!(
            self,
            Self::Sadness | Self::Anxiety | Self::Anger | Self::Shame | Self::Fear
        )
    }

    /// Positive labels that make a turn more memorable.
    #[must_use]
    pub fn is_positive_salient(&self) -> bool {
        matches!(self, Self::Joy | Self::Gratitude | Self::Pride)
    }

    /// The PAD delta the keyword classifier assigns to this label.
    ///
    /// Labels without a canonical delta map to zero.
    #[must_use]
    pub fn canonical_delta(&self) -> AffectVector {
        match self {
            Self::Joy => AffectVector::new(0.8, 0.2, 0.2),
            Self::Gratitude => AffectVector::new(0.6, 0.1, 0.2),
            Self::Anger => AffectVector::new(-0.7, 0.6, 0.4),
            Self::Sadness => AffectVector::new(-0.7, -0.4, -0.4),
            Self::Fear => AffectVector::new(-0.8, 0.5, -0.6),
            _ => AffectVector::ZERO,
        }
    }
}

impl From<&str> for EmotionLabel {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "joy" => Self::Joy,
            "gratitude" => Self::Gratitude,
            "pride" => Self::Pride,
            "anger" => Self::Anger,
            "sadness" => Self::Sadness,
            "fear" => Self::Fear,
            "anxiety" => Self::Anxiety,
            "shame" => Self::Shame,
            "neutral" => Self::Neutral,
            "safety" => Self::Safety,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EmotionLabel {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<EmotionLabel> for String {
    fn from(label: EmotionLabel) -> Self {
        label.as_str().to_string()
    }
}

impl FromStr for EmotionLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Target of emotion
// ---------------------------------------------------------------------------

/// Inferred referent of negative sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Target {
    /// The user is talking about themself.
    #[serde(rename = "self")]
    SelfDirected,
    /// The user is talking to or about the assistant.
    #[serde(rename = "bot")]
    Bot,
    /// Someone or something else, or unclear.
    #[default]
    #[serde(rename = "other_or_mixed")]
    OtherOrMixed,
}

impl Target {
    /// Wire name (`self`, `bot`, `other_or_mixed`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfDirected => "self",
            Self::Bot => "bot",
            Self::OtherOrMixed => "other_or_mixed",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
