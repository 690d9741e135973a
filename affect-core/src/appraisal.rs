//! Appraisal: turning user text into an emotion label and PAD delta.
//!
//! Classification is a two-stage cascade:
//!
//! 1. Ordered keyword rules (case-insensitive, whole-word). First match wins.
//! 2. Otherwise a pluggable [`SentimentScorer`] yields a compound score and
//!    the label is picked from its sign and magnitude, split by the inferred
//!    [`Target`] of the sentiment.
//!
//! The default scorer is [`LexiconScorer`], a small valence lexicon with
//! negation, boosters and exclamation emphasis.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::{AffectVector, EmotionLabel, Target};

// ---------------------------------------------------------------------------
// Output contract
// ---------------------------------------------------------------------------

/// Side-channel scores produced alongside a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    /// Normalised sentiment in [-1, 1].
    pub compound: f32,
    /// Share of positive sentiment mass.
    pub positive: f32,
    /// Share of negative sentiment mass.
    pub negative: f32,
    /// Share of tokens without sentiment.
    pub neutral: f32,
    /// Inferred referent of negative sentiment.
    pub target: Target,
    /// Label of the keyword rule that fired, if any.
    pub matched_rule: Option<EmotionLabel>,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
            target: Target::OtherOrMixed,
            matched_rule: None,
        }
    }
}

/// Result of classifying one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appraisal {
    /// Emotion label.
    pub label: EmotionLabel,
    /// Affect delta for this turn.
    pub delta: AffectVector,
    /// Sentiment scores and target.
    pub signals: Signals,
}

impl Appraisal {
    /// Neutral label, zero delta, default signals.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            label: EmotionLabel::Neutral,
            delta: AffectVector::ZERO,
            signals: Signals::default(),
        }
    }
}

/// Anything that can classify user text.
///
/// Must never fail: malformed or empty input classifies as neutral.
pub trait Classifier: Send + Sync {
    /// Classify one utterance.
    fn classify(&self, text: &str) -> Appraisal;
}

// ---------------------------------------------------------------------------
// Sentiment scoring
// ---------------------------------------------------------------------------

/// Sentiment proportions and the normalised compound score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Polarity {
    /// Normalised sum of valences, in [-1, 1].
    pub compound: f32,
    /// Share of positive sentiment mass.
    pub positive: f32,
    /// Share of negative sentiment mass.
    pub negative: f32,
    /// Share of tokens without sentiment.
    pub neutral: f32,
}

/// Pluggable sentiment scoring.
pub trait SentimentScorer: Send + Sync {
    /// Score `text`.
    fn polarity(&self, text: &str) -> Polarity;
}

/// Normalisation constant for the compound score.
const ALPHA: f32 = 15.0;
/// Multiplier applied to a valence preceded by a negation.
const NEGATION_SCALAR: f32 = -0.74;
/// Intensity added (or removed) by a booster word.
const BOOSTER_INCREMENT: f32 = 0.293;
/// Emphasis added per exclamation mark (up to four).
const EXCLAMATION_INCREMENT: f32 = 0.292;

/// Word valences on a -4..4 scale.
const VALENCES: &[(&str, f32)] = &[
    // positive
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("glad", 2.0),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("awesome", 3.1),
    ("amazing", 2.8),
    ("wonderful", 2.7),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("fun", 2.3),
    ("excited", 1.4),
    ("proud", 2.1),
    ("hope", 1.9),
    ("hopeful", 2.3),
    ("calm", 1.3),
    ("relieved", 1.8),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("appreciate", 1.7),
    ("grateful", 2.0),
    ("helpful", 1.9),
    ("kind", 2.4),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("win", 2.8),
    ("won", 2.7),
    ("safe", 1.9),
    ("smile", 1.5),
    // negative
    ("bad", -2.5),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("worst", -3.1),
    ("hate", -2.7),
    ("hated", -3.2),
    ("sad", -2.1),
    ("unhappy", -1.8),
    ("angry", -2.3),
    ("furious", -2.7),
    ("upset", -1.6),
    ("depressed", -2.3),
    ("lonely", -2.0),
    ("alone", -1.0),
    ("worried", -1.2),
    ("anxious", -1.0),
    ("scared", -1.8),
    ("afraid", -2.0),
    ("fear", -2.2),
    ("panic", -2.0),
    ("stupid", -2.4),
    ("useless", -1.8),
    ("worthless", -1.9),
    ("hopeless", -2.0),
    ("miserable", -2.2),
    ("hurt", -2.4),
    ("pain", -2.3),
    ("cry", -2.1),
    ("crying", -2.1),
    ("stressed", -1.4),
    ("frustrated", -1.5),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("wrong", -2.1),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("broken", -1.9),
    ("problem", -1.7),
    ("lost", -1.3),
    ("ashamed", -1.9),
    ("embarrassed", -1.5),
    ("sucks", -1.5),
    ("ugh", -1.8),
    ("tired", -1.3),
    ("exhausted", -1.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "neither", "nor", "without", "cannot",
    "can't", "dont", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
    "won't", "wouldn't", "shouldn't", "couldn't", "hardly",
];

const BOOSTERS_UP: &[&str] = &[
    "very",
    "really",
    "so",
    "extremely",
    "incredibly",
    "totally",
    "absolutely",
    "completely",
    "truly",
    "super",
    "deeply",
    "hugely",
];

const BOOSTERS_DOWN: &[&str] = &[
    "slightly", "somewhat", "barely", "marginally", "kinda", "sorta", "little",
];

static LEXICON: LazyLock<HashMap<&'static str, f32>> =
    LazyLock::new(|| VALENCES.iter().copied().collect());

/// Default lexicon-based sentiment scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn is_negated(preceding: &[String]) -> bool {
        preceding
            .iter()
            .rev()
            .take(3)
            .any(|w| NEGATIONS.contains(&w.as_str()) || w.ends_with("n't"))
    }

    fn booster(word: &str) -> f32 {
        if BOOSTERS_UP.contains(&word) {
            BOOSTER_INCREMENT
        } else if BOOSTERS_DOWN.contains(&word) {
            -BOOSTER_INCREMENT
        } else {
            0.0
        }
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Polarity {
        let tokens = Self::tokens(text);
        if tokens.is_empty() {
            return Polarity::default();
        }

        let mut valences = Vec::with_capacity(tokens.len());
        for (i, word) in tokens.iter().enumerate() {
            let Some(&base) = LEXICON.get(word.as_str()) else {
                valences.push(0.0);
                continue;
            };
            let mut v = base;
            if i > 0 {
                let boost = Self::booster(&tokens[i - 1]);
                v += boost * v.signum();
            }
            if Self::is_negated(&tokens[..i]) {
                v *= NEGATION_SCALAR;
            }
            valences.push(v);
        }

        let mut sum: f32 = valences.iter().sum();
        if sum != 0.0 {
            #[allow(clippy::cast_precision_loss)]
            let bangs = text.matches('!').count().min(4) as f32;
            sum += bangs * EXCLAMATION_INCREMENT * sum.signum();
        }
        let compound = (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0);

        let positive: f32 = valences.iter().filter(|v| **v > 0.0).sum();
        let negative: f32 = valences.iter().filter(|v| **v < 0.0).map(|v| v.abs()).sum();
        #[allow(clippy::cast_precision_loss)]
        let neutral = valences.iter().filter(|v| **v == 0.0).count() as f32;
        let total = positive + negative + neutral;

        Polarity {
            compound,
            positive: positive / total,
            negative: negative / total,
            neutral: neutral / total,
        }
    }
}

// ---------------------------------------------------------------------------
// Target inference
// ---------------------------------------------------------------------------

static FIRST_PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(i|me|my|mine|i'm|i am|i feel)\b").expect("first-person pattern is valid")
});
static SECOND_PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\byou\b|\byou're\b|\byou are\b").expect("second-person pattern is valid")
});

/// Below this compound score negative sentiment gets a referent.
pub const TARGET_THRESHOLD: f32 = -0.3;

/// Infer who negative sentiment is about.
///
/// Only clearly negative text (`compound <= -0.3`) is interpreted; anything
/// else is [`Target::OtherOrMixed`]. Second person alone means the
/// assistant, first person alone means the user, both or neither is mixed.
#[must_use]
pub fn detect_target(text: &str, compound: f32) -> Target {
    if compound > TARGET_THRESHOLD {
        return Target::OtherOrMixed;
    }
    let lowered = text.to_lowercase();
    let first = FIRST_PERSON.is_match(&lowered);
    let second = SECOND_PERSON.is_match(&lowered);
    match (first, second) {
        (false, true) => Target::Bot,
        (true, false) => Target::SelfDirected,
        _ => Target::OtherOrMixed,
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

static RULES: LazyLock<Vec<(Regex, EmotionLabel)>> = LazyLock::new(|| {
    [
        (r"(?i)\b(thanks|appreciate|grateful)\b", EmotionLabel::Gratitude),
        (r"(?i)\b(angry|furious|pissed)\b", EmotionLabel::Anger),
        (r"(?i)\b(sad|upset|depressed)\b", EmotionLabel::Sadness),
        (r"(?i)\b(scared|afraid|panic|anxious)\b", EmotionLabel::Fear),
        (r"(?i)\b(happy|great|awesome|love it)\b", EmotionLabel::Joy),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("rule pattern is valid"), label))
    .collect()
});

/// Keyword rules with a sentiment fallback.
pub struct Appraiser {
    scorer: Box<dyn SentimentScorer>,
}

impl Appraiser {
    /// Classifier backed by the built-in [`LexiconScorer`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_scorer(LexiconScorer)
    }

    /// Classifier backed by a custom scorer.
    #[must_use]
    pub fn with_scorer(scorer: impl SentimentScorer + 'static) -> Self {
        Self {
            scorer: Box::new(scorer),
        }
    }

    fn signals(polarity: Polarity, target: Target, matched_rule: Option<EmotionLabel>) -> Signals {
        Signals {
            compound: polarity.compound,
            positive: polarity.positive,
            negative: polarity.negative,
            neutral: polarity.neutral,
            target,
            matched_rule,
        }
    }

    /// Label chosen from the compound score when no keyword rule fires.
    #[must_use]
    pub fn label_from_sentiment(compound: f32, target: Target) -> EmotionLabel {
        if compound >= 0.4 {
            EmotionLabel::Joy
        } else if compound < 0.0 {
            if target == Target::Bot {
                EmotionLabel::Anger
            } else {
                EmotionLabel::Sadness
            }
        } else if compound > 0.0 {
            EmotionLabel::Joy
        } else {
            EmotionLabel::Neutral
        }
    }
}

impl Default for Appraiser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Appraiser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Appraiser").finish_non_exhaustive()
    }
}

impl Classifier for Appraiser {
    fn classify(&self, text: &str) -> Appraisal {
        let text = text.trim();
        if text.is_empty() {
            return Appraisal::neutral();
        }

        let polarity = self.scorer.polarity(text);
        let target = detect_target(text, polarity.compound);

        if let Some((_, label)) = RULES.iter().find(|(rx, _)| rx.is_match(text)) {
            trace!(label = %label, "keyword rule matched");
            return Appraisal {
                label: label.clone(),
                delta: label.canonical_delta(),
                signals: Self::signals(polarity, target, Some(label.clone())),
            };
        }

        let label = Self::label_from_sentiment(polarity.compound, target);
        trace!(label = %label, compound = polarity.compound, target = %target, "sentiment fallback");
        Appraisal {
            delta: label.canonical_delta(),
            signals: Self::signals(polarity, target, None),
            label,
        }
    }
}
