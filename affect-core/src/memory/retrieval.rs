//! Reading memories back out: prompt context and ranked recall.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::MemoryRecord;

/// Header of the long-term block in the prompt context.
pub const LONG_TERM_HEADER: &str = "Important things the user has shared before:";
/// Header of the short-term block in the prompt context.
pub const SHORT_TERM_HEADER: &str = "Recent conversation snippets:";

/// Render memories as a text block to put in front of the user's message.
///
/// Long-term summaries come first, newest first, at most `max_long_term`.
/// Then a blank line and the last `max_short_term` exchanges in
/// chronological order, with newlines flattened to ` / `. Empty when both
/// tiers are empty.
#[must_use]
pub fn build_memory_context(
    short_term: &[MemoryRecord],
    long_term: &[MemoryRecord],
    max_short_term: usize,
    max_long_term: usize,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !long_term.is_empty() {
        parts.push(LONG_TERM_HEADER.to_string());
        let mut newest: Vec<&MemoryRecord> = long_term.iter().collect();
        newest.sort_by_key(|r| Reverse((r.timestamp, r.seq)));
        parts.extend(
            newest
                .into_iter()
                .take(max_long_term)
                .map(|r| format!("- {}", r.text)),
        );
    }

    if !short_term.is_empty() {
        parts.push(String::new());
        parts.push(SHORT_TERM_HEADER.to_string());
        let start = short_term.len().saturating_sub(max_short_term);
        parts.extend(
            short_term[start..]
                .iter()
                .map(|r| format!("- {}", r.text.replace('\n', " / "))),
        );
    }

    parts.join("\n").trim().to_string()
}

/// The `n` most important records, ties in stored order.
#[must_use]
pub fn most_important(long_term: &[MemoryRecord], n: usize) -> Vec<&MemoryRecord> {
    let mut ranked: Vec<&MemoryRecord> = long_term.iter().collect();
    ranked.sort_by_key(|r| Reverse(OrderedFloat(r.importance)));
    ranked.truncate(n);
    ranked
}

/// Weights for [`recall`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecallWeights {
    /// Weight of the stored importance.
    pub importance: f32,
    /// Weight of the recency factor.
    pub recency: f32,
    /// Hours for the recency factor to fall to `1/e`.
    pub half_life_hours: f32,
}

impl Default for RecallWeights {
    fn default() -> Self {
        Self {
            importance: 0.7,
            recency: 0.3,
            half_life_hours: 24.0,
        }
    }
}

/// Recall score of one record at `now`.
///
/// ```text
/// score = w_importance · importance + w_recency · exp(−hours_since / half_life)
/// ```
#[must_use]
pub fn recall_score(record: &MemoryRecord, now: DateTime<Utc>, weights: &RecallWeights) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let hours = (now - record.timestamp).num_seconds().max(0) as f32 / 3600.0;
    let recency = if weights.half_life_hours > 0.0 {
        (-hours / weights.half_life_hours).exp()
    } else {
        0.0
    };
    weights.importance * record.importance + weights.recency * recency
}

/// Top `k` long-term records by [`recall_score`], stable on ties.
#[must_use]
pub fn recall<'a>(
    long_term: &'a [MemoryRecord],
    now: DateTime<Utc>,
    k: usize,
    weights: &RecallWeights,
) -> Vec<&'a MemoryRecord> {
    let mut scored: Vec<(f32, &MemoryRecord)> = long_term
        .iter()
        .map(|r| (recall_score(r, now, weights), r))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(OrderedFloat(*score)));
    scored.into_iter().take(k).map(|(_, r)| r).collect()
}
