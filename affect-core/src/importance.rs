//! Importance scoring: how noteworthy a turn is.
//!
//! ```text
//! score = 0.2
//!       + 0.2   first-person markers
//!       + 0.2   preference / identity phrasing
//!       + 0.1   plans and time references
//!       + 0.2   negative-salient label  | + 0.15 positive-salient label
//! crisis label → 0.95 (overrides everything above)
//! ```
//!
//! Markers are plain lowercase substring checks, so `"my "` requires the
//! trailing space and a bare `"my"` at the end of a message does not count.

use crate::types::{EmotionLabel, clip_unit};

/// Score every turn starts from.
pub const BASE_SCORE: f32 = 0.2;
/// Score forced for crisis turns.
pub const CRISIS_SCORE: f32 = 0.95;

const FIRST_PERSON: &[&str] = &["i ", "i'm", "im ", "my ", "me ", "mine "];
const PREFERENCES: &[&str] = &["i like", "i love", "i enjoy", "i hate", "i prefer"];
const PLANS: &[&str] = &["tomorrow", "next week", "in a year", "plan", "goal"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Importance of a user utterance in [0, 1].
#[must_use]
pub fn score_importance(text: &str, label: &EmotionLabel) -> f32 {
    if label.is_crisis() {
        return CRISIS_SCORE;
    }

    let lowered = text.to_lowercase();
    let mut score = BASE_SCORE;

    if contains_any(&lowered, FIRST_PERSON) {
        score += 0.2;
    }
    if contains_any(&lowered, PREFERENCES) {
        score += 0.2;
    }
    if contains_any(&lowered, PLANS) {
        score += 0.1;
    }
    if label.is_negative_salient() {
        score += 0.2;
    } else if label.is_positive_salient() {
        score += 0.15;
    }

    clip_unit(score)
}
