//! Turn counters.
//!
//! Lock-free `AtomicU64` counters incremented in the turn path, plus a small
//! latency window behind a `parking_lot::Mutex` that is only touched once per
//! generated reply.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Generation latencies kept for the mean.
pub const LATENCY_WINDOW: usize = 128;

/// Counters shared by every session of a manager.
#[derive(Debug)]
pub struct TurnCounters {
    /// Turns processed.
    pub turns: AtomicU64,
    /// Replies replaced by the fallback text.
    pub fallbacks: AtomicU64,
    /// Turns answered by the crisis message.
    pub crisis_overrides: AtomicU64,
    /// Exchanges promoted to long-term memory.
    pub promotions: AtomicU64,
    latencies_ms: Mutex<VecDeque<u64>>,
}

impl TurnCounters {
    /// Zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            turns: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
            crisis_overrides: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
            latencies_ms: Mutex::new(VecDeque::with_capacity(LATENCY_WINDOW)),
        }
    }

    /// Record how long a generation call took.
    pub fn record_latency(&self, latency_ms: u64) {
        let mut window = self.latencies_ms.lock();
        if window.len() == LATENCY_WINDOW {
            window.pop_front();
        }
        window.push_back(latency_ms);
    }

    /// Mean of the latency window, if any call was recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_latency_ms(&self) -> Option<f64> {
        let window = self.latencies_ms.lock();
        if window.is_empty() {
            return None;
        }
        let total: u64 = window.iter().sum();
        Some(total as f64 / window.len() as f64)
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            turns: self.turns.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            crisis_overrides: self.crisis_overrides.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            mean_latency_ms: self.mean_latency_ms(),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for TurnCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSnapshot {
    /// Turns processed.
    pub turns: u64,
    /// Fallback replies.
    pub fallbacks: u64,
    /// Crisis overrides.
    pub crisis_overrides: u64,
    /// Long-term promotions.
    pub promotions: u64,
    /// Mean generation latency.
    pub mean_latency_ms: Option<f64>,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP affect_turns_total Turns processed\n\
             # TYPE affect_turns_total counter\n\
             affect_turns_total {}\n\
             # HELP affect_fallbacks_total Replies replaced by the fallback text\n\
             # TYPE affect_fallbacks_total counter\n\
             affect_fallbacks_total {}\n\
             # HELP affect_crisis_overrides_total Turns answered by the crisis message\n\
             # TYPE affect_crisis_overrides_total counter\n\
             affect_crisis_overrides_total {}\n\
             # HELP affect_promotions_total Exchanges promoted to long-term memory\n\
             # TYPE affect_promotions_total counter\n\
             affect_promotions_total {}\n\
             # HELP affect_generation_latency_ms_mean Mean generation latency\n\
             # TYPE affect_generation_latency_ms_mean gauge\n\
             affect_generation_latency_ms_mean {:.1}\n",
            self.turns,
            self.fallbacks,
            self.crisis_overrides,
            self.promotions,
            self.mean_latency_ms.unwrap_or(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_window_is_bounded() {
        let counters = TurnCounters::new();
        assert_eq!(counters.mean_latency_ms(), None);
        for _ in 0..LATENCY_WINDOW {
            counters.record_latency(1000);
        }
        for _ in 0..LATENCY_WINDOW {
            counters.record_latency(10);
        }
        assert_eq!(counters.mean_latency_ms(), Some(10.0));
    }

    #[test]
    fn snapshot_reads_counters() {
        let counters = TurnCounters::new();
        TurnCounters::bump(&counters.turns);
        TurnCounters::bump(&counters.turns);
        TurnCounters::bump(&counters.fallbacks);
        let snap = counters.snapshot();
        assert_eq!(snap.turns, 2);
        assert_eq!(snap.fallbacks, 1);
        assert!(snap.to_prometheus().contains("affect_turns_total 2"));
    }
}
