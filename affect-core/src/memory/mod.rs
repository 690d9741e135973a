//! Short-term and long-term conversational memory.
//!
//! Every exchange lands in short-term memory verbatim. Exchanges whose
//! importance reaches the promotion threshold are also summarised into
//! long-term memory.
//!
//! | Tier       | Content               | Eviction                     |
//! |------------|-----------------------|------------------------------|
//! | short-term | `User: …\nBot: …`     | oldest first, cap 20         |
//! | long-term  | templated summary     | least important first, cap 12 |

pub mod eviction;
pub mod retrieval;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MemoryConfig;
use crate::importance::score_importance;
use crate::neuro::NeuroState;
use crate::types::{AffectVector, EmotionLabel, MemoryId};

pub use retrieval::{RecallWeights, build_memory_context, most_important, recall};

/// Which tier a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// Recent verbatim exchange.
    ShortTerm,
    /// Promoted summary.
    LongTerm,
}

/// One remembered exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier.
    pub id: MemoryId,
    /// Tier.
    pub kind: MemoryKind,
    /// Verbatim exchange (short-term) or summary (long-term).
    pub text: String,
    /// Emotion label of the user turn.
    pub label: EmotionLabel,
    /// Importance in [0, 1] at the time of recording.
    pub importance: f32,
    /// Affect snapshot when recorded.
    pub affect: AffectVector,
    /// Neuro-state snapshot when recorded.
    pub neuro: NeuroState,
    /// Wall-clock creation time.
    pub timestamp: DateTime<Utc>,
    /// Monotonic insertion counter, shared by both records of a turn.
    pub seq: u64,
}

/// A completed turn, as seen by the memory layer.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    /// What the user said.
    pub user_text: &'a str,
    /// What the assistant answered.
    pub reply: &'a str,
    /// Label the turn was recorded under.
    pub label: &'a EmotionLabel,
    /// Affect at the time of the turn.
    pub affect: AffectVector,
    /// Neuro-state at the time of the turn.
    pub neuro: NeuroState,
}

/// What recording a turn did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryUpdate {
    /// Importance of the turn.
    pub importance: f32,
    /// Whether a long-term summary was created and survived the cap.
    pub promoted: bool,
    /// Records dropped from either tier.
    pub evicted: usize,
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Compact long-term phrasing of a user utterance.
///
/// Whitespace is collapsed and the text is cut at `max_chars` characters
/// with a trailing `…`. The template depends on the label family.
#[must_use]
pub fn summarise_interaction(user_text: &str, label: &EmotionLabel, max_chars: usize) -> String {
    let mut cleaned = user_text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() > max_chars {
        cleaned = cleaned.chars().take(max_chars).collect();
        cleaned.push('…');
    }

    match label {
        EmotionLabel::Safety => {
            format!("The user expressed a crisis/safety concern: \"{cleaned}\"")
        }
        EmotionLabel::Sadness
        | EmotionLabel::Anxiety
        | EmotionLabel::Fear
        | EmotionLabel::Anger => {
            format!("The user felt {label} about: \"{cleaned}\"")
        }
        EmotionLabel::Joy | EmotionLabel::Gratitude | EmotionLabel::Pride => {
            format!("The user shared a positive moment ({label}): \"{cleaned}\"")
        }
        _ => format!("User said: \"{cleaned}\""),
    }
}

/// Slack on the promotion comparison, so that scores summed from `0.2` steps
/// still reach a threshold of exactly `0.6`.
pub const THRESHOLD_TOLERANCE: f32 = 1e-6;

/// Whether `importance` qualifies for long-term promotion.
#[must_use]
pub fn meets_threshold(importance: f32, threshold: f32) -> bool {
    importance + THRESHOLD_TOLERANCE >= threshold
}

fn short_term_record(
    exchange: &Exchange<'_>,
    importance: f32,
    seq: u64,
    now: DateTime<Utc>,
) -> MemoryRecord {
    MemoryRecord {
        id: MemoryId::new(),
        kind: MemoryKind::ShortTerm,
        text: format!("User: {}\nBot: {}", exchange.user_text, exchange.reply),
        label: exchange.label.clone(),
        importance,
        affect: exchange.affect,
        neuro: exchange.neuro,
        timestamp: now,
        seq,
    }
}

fn long_term_record(
    exchange: &Exchange<'_>,
    importance: f32,
    seq: u64,
    now: DateTime<Utc>,
    config: &MemoryConfig,
) -> MemoryRecord {
    MemoryRecord {
        id: MemoryId::new(),
        kind: MemoryKind::LongTerm,
        text: summarise_interaction(exchange.user_text, exchange.label, config.summary_max_chars),
        label: exchange.label.clone(),
        importance,
        affect: exchange.affect,
        neuro: exchange.neuro,
        timestamp: now,
        seq,
    }
}

// ---------------------------------------------------------------------------
// Pure update
// ---------------------------------------------------------------------------

/// Apply one exchange to copies of both tiers and return them.
///
/// The input slices are left untouched.
#[must_use]
pub fn update_memories(
    short_term: &[MemoryRecord],
    long_term: &[MemoryRecord],
    exchange: &Exchange<'_>,
    config: &MemoryConfig,
    now: DateTime<Utc>,
) -> (Vec<MemoryRecord>, Vec<MemoryRecord>) {
    let seq = short_term
        .iter()
        .chain(long_term)
        .map(|r| r.seq + 1)
        .max()
        .unwrap_or(0);
    let mut store = MemoryStore {
        short_term: short_term.to_vec(),
        long_term: long_term.to_vec(),
        config: config.clone(),
        next_seq: seq,
    };
    store.record_turn(exchange, now);
    (store.short_term, store.long_term)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Owns both memory tiers for one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    short_term: Vec<MemoryRecord>,
    long_term: Vec<MemoryRecord>,
    config: MemoryConfig,
    next_seq: u64,
}

impl MemoryStore {
    /// Empty store with the given capacities and threshold.
    #[must_use]
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            short_term: Vec::new(),
            long_term: Vec::new(),
            config,
            next_seq: 0,
        }
    }

    /// Record a completed turn.
    ///
    /// Always appends to short-term (evicting the oldest past the cap).
    /// Promotes to long-term when importance reaches the threshold, then
    /// keeps only the most important records (stable on ties).
    pub fn record_turn(&mut self, exchange: &Exchange<'_>, now: DateTime<Utc>) -> MemoryUpdate {
        let importance = score_importance(exchange.user_text, exchange.label);
        let seq = self.next_seq;
        self.next_seq += 1;

        self.short_term
            .push(short_term_record(exchange, importance, seq, now));
        let mut evicted = eviction::evict_oldest(&mut self.short_term, self.config.max_short_term);

        let mut promoted = false;
        if meets_threshold(importance, self.config.long_term_threshold) {
            self.long_term
                .push(long_term_record(exchange, importance, seq, now, &self.config));
            let dropped =
                eviction::retain_most_important(&mut self.long_term, self.config.max_long_term);
            promoted = !dropped.iter().any(|r| r.seq == seq);
            evicted += dropped.len();
            if promoted {
                info!(
                    label = %exchange.label,
                    importance,
                    long_term = self.long_term.len(),
                    "promoted exchange to long-term memory"
                );
            }
        }

        debug!(
            importance,
            short_term = self.short_term.len(),
            long_term = self.long_term.len(),
            evicted,
            "memory updated"
        );

        MemoryUpdate {
            importance,
            promoted,
            evicted,
        }
    }

    /// Short-term records, oldest first.
    #[must_use]
    pub fn short_term(&self) -> &[MemoryRecord] {
        &self.short_term
    }

    /// Long-term records, most important first.
    #[must_use]
    pub fn long_term(&self) -> &[MemoryRecord] {
        &self.long_term
    }

    /// Prompt context with the configured per-tier limits.
    #[must_use]
    pub fn context(&self) -> String {
        build_memory_context(
            &self.short_term,
            &self.long_term,
            self.config.context_short_term,
            self.config.context_long_term,
        )
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.short_term.clear();
        self.long_term.clear();
    }

    /// Whether both tiers are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.short_term.is_empty() && self.long_term.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange<'a>(text: &'a str, label: &'a EmotionLabel) -> Exchange<'a> {
        Exchange {
            user_text: text,
            reply: "I hear you.",
            label,
            affect: AffectVector::ZERO,
            neuro: NeuroState::NEUTRAL,
        }
    }

    #[test]
    fn short_term_keeps_verbatim_exchange() {
        let mut store = MemoryStore::default();
        let label = EmotionLabel::Neutral;
        store.record_turn(&exchange("hello there", &label), Utc::now());
        assert_eq!(store.short_term()[0].text, "User: hello there\nBot: I hear you.");
        assert_eq!(store.short_term()[0].kind, MemoryKind::ShortTerm);
        assert!(store.long_term().is_empty());
    }

    #[test]
    fn short_term_is_fifo_capped() {
        let mut store = MemoryStore::new(MemoryConfig {
            max_short_term: 3,
            ..MemoryConfig::default()
        });
        let label = EmotionLabel::Neutral;
        for text in ["one", "two", "three", "four", "five"] {
            store.record_turn(&exchange(text, &label), Utc::now());
        }
        let texts: Vec<_> = store.short_term().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "User: three\nBot: I hear you.",
                "User: four\nBot: I hear you.",
                "User: five\nBot: I hear you."
            ]
        );
    }

    #[test]
    fn important_turns_are_promoted() {
        let mut store = MemoryStore::default();
        let label = EmotionLabel::Sadness;
        let update = store.record_turn(&exchange("I miss my dog so much", &label), Utc::now());
        assert!(update.promoted);
        assert_eq!(store.long_term().len(), 1);
        assert_eq!(
            store.long_term()[0].text,
            "The user felt sadness about: \"I miss my dog so much\""
        );
    }

    #[test]
    fn crisis_turns_are_always_promoted() {
        let mut store = MemoryStore::default();
        let label = EmotionLabel::Safety;
        let update = store.record_turn(&exchange("overdose", &label), Utc::now());
        assert!((update.importance - 0.95).abs() < 1e-6);
        assert!(store.long_term()[0].text.starts_with("The user expressed a crisis/safety concern"));
    }

    #[test]
    fn summaries_collapse_whitespace_and_truncate() {
        let long = "word ".repeat(60);
        let summary = summarise_interaction(&long, &EmotionLabel::Neutral, 140);
        let quoted = summary
            .strip_prefix("User said: \"")
            .and_then(|s| s.strip_suffix('"'))
            .expect("generic template");
        assert_eq!(quoted.chars().count(), 141);
        assert!(quoted.ends_with('…'));

        let tidy = summarise_interaction("  so   happy \n today ", &EmotionLabel::Joy, 140);
        assert_eq!(tidy, "The user shared a positive moment (joy): \"so happy today\"");
    }

    #[test]
    fn pure_update_leaves_inputs_untouched() {
        let label = EmotionLabel::Anger;
        let (stm, ltm) = update_memories(
            &[],
            &[],
            &exchange("I hate my job", &label),
            &MemoryConfig::default(),
            Utc::now(),
        );
        assert_eq!(stm.len(), 1);
        assert_eq!(ltm.len(), 1);

        let (stm2, ltm2) = update_memories(
            &stm,
            &ltm,
            &exchange("ok", &EmotionLabel::Neutral),
            &MemoryConfig::default(),
            Utc::now(),
        );
        assert_eq!(stm.len(), 1);
        assert_eq!(stm2.len(), 2);
        assert_eq!(ltm2.len(), 1);
        assert!(stm2[1].seq > stm2[0].seq);
    }
}
