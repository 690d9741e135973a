//! Integration tests: end-to-end flows through the core components.
//!
//! Covers the reference scenarios (keyword appraisal, mood accumulation,
//! rapport loss, long-term capacity) plus a full turn composed by hand.

use std::io::Write as _;

use affect_core::appraisal::{Appraiser, Classifier, Signals};
use affect_core::attachment::AttachmentTracker;
use affect_core::config::{AffectConfig, MemoryConfig};
use affect_core::memory::{Exchange, MemoryKind, MemoryStore, build_memory_context, eviction};
use affect_core::mood::MoodTracker;
use affect_core::neuro::{NeuroState, mix_with_neuro};
use affect_core::persona::PersonaPreset;
use affect_core::reflection::{ReflectionInput, reflect};
use affect_core::safety::CrisisDetector;
use affect_core::style::{Strategy, Style};
use affect_core::types::{AffectVector, EmotionLabel, Target};
use chrono::Utc;

fn exchange<'a>(text: &'a str, label: &'a EmotionLabel) -> Exchange<'a> {
    Exchange {
        user_text: text,
        reply: "I'm here with you.",
        label,
        affect: AffectVector::ZERO,
        neuro: NeuroState::NEUTRAL,
    }
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn angry_message_is_negative() {
    let appraisal = Appraiser::new().classify("I feel so angry about this!");
    assert!(matches!(
        appraisal.label,
        EmotionLabel::Anger | EmotionLabel::Sadness
    ));
    assert!(appraisal.delta.pleasure() < 0.0);
}

#[test]
fn thankful_message_is_positive() {
    let appraisal = Appraiser::new().classify("Thanks, I really appreciate your help.");
    assert!(matches!(
        appraisal.label,
        EmotionLabel::Gratitude | EmotionLabel::Joy
    ));
    assert!(appraisal.delta.pleasure() > 0.0);
}

#[test]
fn repeated_joy_accumulates_mood() {
    let mut mood = MoodTracker::new(0.8);
    let mut state = AffectVector::ZERO;
    for _ in 0..5 {
        state = mood.update(AffectVector::new(0.8, 0.0, 0.0), 0.25);
    }
    assert!(state.pleasure() > 0.2);
    assert_eq!(mood.history().len(), 5);
}

#[test]
fn anger_at_bot_costs_exactly_five_hundredths() {
    let mut tracker = AttachmentTracker::new(0.6);
    let signals = Signals {
        compound: -0.8,
        target: Target::Bot,
        ..Signals::default()
    };
    let before = tracker.value();
    let after = tracker.update(&EmotionLabel::Anger, Target::Bot, &signals);
    assert!((before - after - 0.05).abs() < 1e-6);
}

fn full_long_term_store() -> MemoryStore {
    let mut store = MemoryStore::new(MemoryConfig::default());
    // 12 anger turns at 0.8 ("i " + "i hate" + anger)
    let label = EmotionLabel::Anger;
    for i in 0..12 {
        let text = format!("I hate this part {i}");
        store.record_turn(&exchange(&text, &label), Utc::now());
    }
    assert_eq!(store.long_term().len(), 12);
    store
}

#[test]
fn thirteenth_record_evicts_minimum_when_more_important() {
    let mut store = full_long_term_store();
    let min_before = eviction::min_importance(store.long_term()).expect("non-empty");
    let last_of_ties = store.long_term().last().expect("non-empty").seq;

    let update = store.record_turn(&exchange("overdose", &EmotionLabel::Safety), Utc::now());
    assert!(update.importance > min_before);
    assert!(update.promoted);
    assert_eq!(store.long_term().len(), 12);
    assert_eq!(store.long_term()[0].label, EmotionLabel::Safety);
    // the last of the tied 0.8 group is the one dropped
    assert!(store.long_term().iter().all(|r| r.seq != last_of_ties));
}

#[test]
fn thirteenth_record_is_dropped_when_not_more_important() {
    let mut store = full_long_term_store();
    let before: Vec<u64> = store.long_term().iter().map(|r| r.seq).collect();

    // same importance as every stored record
    let label = EmotionLabel::Anger;
    let update = store.record_turn(&exchange("I hate the rain", &label), Utc::now());
    assert!(!update.promoted);
    let after: Vec<u64> = store.long_term().iter().map(|r| r.seq).collect();
    assert_eq!(before, after);
}

// ---------------------------------------------------------------------------
// A hand-composed turn
// ---------------------------------------------------------------------------

#[test]
fn full_turn_composition() {
    let config = AffectConfig::default();
    let persona = PersonaPreset::lookup(&config.persona.preset).expect("default persona");
    let appraiser = Appraiser::new();
    let detector = CrisisDetector::from_config(&config.safety);

    let mut mood = MoodTracker::from_config(&config.mood);
    let mut neuro = NeuroState::NEUTRAL;
    let mut memory = MemoryStore::new(config.memory.clone());
    let mut attachment = AttachmentTracker::from_config(&config.attachment);

    let text = "I'm so sad, my plan for next week fell through";
    assert!(detector.check(text).is_none());

    let appraisal = appraiser.classify(text);
    assert_eq!(appraisal.label, EmotionLabel::Sadness);

    let true_mood = mood.update(appraisal.delta, config.mood.blend);
    neuro = neuro.step(&persona.neuro_baseline, appraisal.delta, &config.neuro);
    let mixed = mix_with_neuro(true_mood, &neuro, config.neuro.influence);
    let effective = mixed.offset(&persona.affect_bias, config.persona.weight);
    let style = Style::from_affect(&effective).with_overrides(&persona.style, persona.affect_bias.arousal());

    assert!(true_mood.pleasure() < 0.0);
    assert!((style.formality - 0.7).abs() < 1e-6);
    assert!((style.hedging - 0.5).abs() < 1e-6);

    let reply = "That sounds really disappointing.";
    let update = memory.record_turn(
        &Exchange {
            user_text: text,
            reply,
            label: &appraisal.label,
            affect: effective,
            neuro,
        },
        Utc::now(),
    );
    assert!(update.promoted);
    assert_eq!(memory.long_term()[0].kind, MemoryKind::LongTerm);

    let value = attachment.update(&appraisal.label, appraisal.signals.target, &appraisal.signals);
    assert!((0.0..=1.0).contains(&value));

    let context = memory.context();
    assert!(context.starts_with("Important things the user has shared before:"));
    assert!(context.contains("Bot: That sounds"));
    assert_eq!(
        context,
        build_memory_context(memory.short_term(), memory.long_term(), 4, 6)
    );

    let monologue = reflect(&ReflectionInput {
        label: &appraisal.label,
        affect: effective,
        neuro,
        strategy: Strategy::Regulate,
        target: appraisal.signals.target,
        attachment: value,
        delta: appraisal.delta,
        reply,
        long_term: memory.long_term(),
    });
    assert!(monologue.contains("'sadness'"));
    assert!(monologue.contains("I also recalled"));
}

// ---------------------------------------------------------------------------
// Configuration from disk
// ---------------------------------------------------------------------------

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "[persona]\npreset = \"Supportive friend\"\nweight = 0.8\n\n[memory]\nmax_long_term = 4\n"
    )
    .expect("write config");

    let config = AffectConfig::from_file(file.path()).expect("valid config");
    assert_eq!(config.memory.max_long_term, 4);
    assert!((config.persona.weight - 0.8).abs() < 1e-6);
    let persona = PersonaPreset::lookup(&config.persona.preset).expect("known persona");
    assert_eq!(persona.key, "supportive_friend");
}

#[test]
fn missing_config_file_is_io_error() {
    let err = AffectConfig::from_file(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, affect_core::AffectError::Io(_)));
}
