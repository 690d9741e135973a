//! Property-based tests for the affect state components.
//!
//! Every mutator must keep its outputs in range for arbitrary inputs, and
//! both memory tiers must respect their caps and promotion threshold.

use proptest::prelude::*;

use affect_core::appraisal::{Classifier, LexiconScorer, SentimentScorer, Signals};
use affect_core::attachment::update_attachment;
use affect_core::config::{MemoryConfig, NeuroConfig};
use affect_core::importance::score_importance;
use affect_core::memory::{Exchange, MemoryStore, meets_threshold};
use affect_core::mood::MoodTracker;
use affect_core::neuro::NeuroState;
use affect_core::style::Style;
use affect_core::types::{AffectVector, EmotionLabel, Target};
use affect_core::Appraiser;
use chrono::Utc;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_affect() -> impl Strategy<Value = AffectVector> {
    (-5.0..5.0f32, -5.0..5.0f32, -5.0..5.0f32).prop_map(|(p, a, d)| AffectVector::new(p, a, d))
}

fn arb_label() -> impl Strategy<Value = EmotionLabel> {
    prop_oneof![
        Just(EmotionLabel::Joy),
        Just(EmotionLabel::Gratitude),
        Just(EmotionLabel::Pride),
        Just(EmotionLabel::Anger),
        Just(EmotionLabel::Sadness),
        Just(EmotionLabel::Fear),
        Just(EmotionLabel::Anxiety),
        Just(EmotionLabel::Shame),
        Just(EmotionLabel::Neutral),
        Just(EmotionLabel::Safety),
    ]
}

fn arb_target() -> impl Strategy<Value = Target> {
    prop_oneof![
        Just(Target::SelfDirected),
        Just(Target::Bot),
        Just(Target::OtherOrMixed),
    ]
}

fn in_signed(v: AffectVector) -> bool {
    v.as_array().iter().all(|c| (-1.0..=1.0).contains(c))
}

// ---------------------------------------------------------------------------
// Affect and mood
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn affect_construction_is_clipped(p in -100.0..100.0f32, a in -100.0..100.0f32, d in -100.0..100.0f32) {
        prop_assert!(in_signed(AffectVector::new(p, a, d)));
    }

    #[test]
    fn affect_arithmetic_stays_clipped(x in arb_affect(), y in arb_affect(), f in -10.0..10.0f32, w in -2.0..2.0f32) {
        prop_assert!(in_signed(x.scale(f)));
        prop_assert!(in_signed(x.mix(&y, w)));
        prop_assert!(in_signed(x.offset(&y, w)));
        prop_assert!(in_signed(x + y));
    }

    #[test]
    fn mood_updates_stay_clipped(
        decay in 0.0..1.0f32,
        deltas in prop::collection::vec((arb_affect(), 0.0..1.0f32), 1..50),
    ) {
        let mut mood = MoodTracker::new(decay);
        for (delta, blend) in deltas {
            let out = mood.update(delta, blend);
            prop_assert!(in_signed(out));
        }
    }

    #[test]
    fn zero_input_never_grows_mood(start in arb_affect(), decay in 0.0..0.99f32, steps in 1..30usize) {
        let mut mood = MoodTracker::new(decay);
        mood.reset(Some(start));
        let mut previous = mood.current().intensity();
        for _ in 0..steps {
            let next = mood.update(AffectVector::ZERO, 0.0).intensity();
            prop_assert!(next <= previous);
            previous = next;
        }
    }
}

// ---------------------------------------------------------------------------
// Neuro-state and style
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn neuro_step_stays_clipped(
        deltas in prop::collection::vec(arb_affect(), 1..50),
        rate in 0.0..1.0f32,
        factor in 0.0..1.0f32,
    ) {
        let config = NeuroConfig {
            learning_rate: rate,
            decay_factor: factor,
            ..NeuroConfig::default()
        };
        let baseline = NeuroState::new(0.1, 0.3, -0.2);
        let mut neuro = NeuroState::NEUTRAL;
        for delta in deltas {
            neuro = neuro.step(&baseline, delta, &config);
            for v in [neuro.reward(), neuro.safety(), neuro.alertness()] {
                prop_assert!((-1.0..=1.0).contains(&v));
            }
            prop_assert!(in_signed(neuro.to_affect_bias()));
        }
    }

    #[test]
    fn style_knobs_stay_in_unit_range(affect in arb_affect()) {
        let s = Style::from_affect(&affect);
        for v in [s.warmth, s.formality, s.hedging, s.emoji, s.pace] {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }
}

// ---------------------------------------------------------------------------
// Appraisal, importance and attachment
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn classifier_never_panics_and_stays_bounded(text in ".{0,200}") {
        let appraisal = Appraiser::new().classify(&text);
        prop_assert!(in_signed(appraisal.delta));
        prop_assert!((-1.0..=1.0).contains(&appraisal.signals.compound));
    }

    #[test]
    fn compound_is_bounded(words in prop::collection::vec("(good|bad|very|not|great|awful|the|!)", 0..40)) {
        let text = words.join(" ");
        let polarity = LexiconScorer.polarity(&text);
        prop_assert!((-1.0..=1.0).contains(&polarity.compound));
    }

    #[test]
    fn importance_in_unit_range(text in ".{0,200}", label in arb_label()) {
        let score = score_importance(&text, &label);
        prop_assert!((0.0..=1.0).contains(&score));
        if label == EmotionLabel::Safety {
            prop_assert!((score - 0.95).abs() < 1e-6);
        }
    }

    #[test]
    fn attachment_stays_bounded(
        start in 0.0..1.0f32,
        turns in prop::collection::vec((arb_label(), arb_target(), -1.0..1.0f32), 1..100),
    ) {
        let mut value = start;
        for (label, target, compound) in turns {
            let signals = Signals { compound, target, ..Signals::default() };
            value = update_attachment(value, &label, target, &signals);
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }
}

// ---------------------------------------------------------------------------
// Memory caps and promotion threshold
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn memory_caps_and_threshold_hold(
        max_short in 1..10usize,
        max_long in 1..6usize,
        threshold in 0.0..1.0f32,
        turns in prop::collection::vec(("[a-zA-Z ]{0,40}", arb_label()), 1..40),
    ) {
        let config = MemoryConfig {
            max_short_term: max_short,
            max_long_term: max_long,
            long_term_threshold: threshold,
            ..MemoryConfig::default()
        };
        let mut store = MemoryStore::new(config);
        for (text, label) in &turns {
            store.record_turn(
                &Exchange {
                    user_text: text,
                    reply: "ok",
                    label,
                    affect: AffectVector::ZERO,
                    neuro: NeuroState::NEUTRAL,
                },
                Utc::now(),
            );
            prop_assert!(store.short_term().len() <= max_short);
            prop_assert!(store.long_term().len() <= max_long);
            for record in store.long_term() {
                prop_assert!(meets_threshold(record.importance, threshold));
            }
        }
        prop_assert_eq!(store.short_term().len(), turns.len().min(max_short));

        // long-term stays sorted by importance
        let importances: Vec<f32> = store.long_term().iter().map(|r| r.importance).collect();
        prop_assert!(importances.windows(2).all(|w| w[0] >= w[1]));
    }
}
