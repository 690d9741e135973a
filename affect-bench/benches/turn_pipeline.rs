//! Affect layer benchmark suite.
//!
//! Targets:
//!   classify_sentence ................ < 20μs
//!   mood_neuro_style_step ............ < 1μs
//!   memory_record_turn_at_capacity ... < 20μs
//!   memory_context_full_store ........ < 20μs
//!   full_turn_mock_backend ........... < 100μs

use std::hint::black_box;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};

use affect_core::config::{AffectConfig, MemoryConfig, NeuroConfig};
use affect_core::memory::Exchange;
use affect_core::memory::retrieval::{RecallWeights, recall};
use affect_core::{
    AffectVector, Appraiser, Classifier, EmotionLabel, MemoryStore, MoodTracker, NeuroState,
    PersonaPreset,
};
use affect_llm::MockGenerator;
use affect_session::{Controls, ReplyPolicy, SessionState, TurnEngine};

const SENTENCES: &[&str] = &[
    "Thanks, I really appreciate your help.",
    "I feel so angry about this!",
    "I'm not sure the plan for tomorrow is going to work",
    "You are useless and this is the worst answer ever",
    "I love painting and my goal is to open a studio next week",
];

fn full_store() -> MemoryStore {
    let mut store = MemoryStore::new(MemoryConfig::default());
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).single().unwrap_or_else(Utc::now);
    for i in 0..40_i64 {
        let text = format!("I love topic {i} and my plan is to study it");
        store.record_turn(
            &Exchange {
                user_text: &text,
                reply: "Tell me more.",
                label: &EmotionLabel::Joy,
                affect: AffectVector::new(0.3, 0.1, 0.0),
                neuro: NeuroState::NEUTRAL,
            },
            start + Duration::minutes(i),
        );
    }
    store
}

/// Benchmark: keyword rules plus lexicon fallback on short sentences.
fn bench_classify(c: &mut Criterion) {
    let appraiser = Appraiser::new();
    c.bench_function("classify_sentence", |b| {
        let mut i = 0;
        b.iter(|| {
            let appraisal = appraiser.classify(black_box(SENTENCES[i % SENTENCES.len()]));
            i += 1;
            black_box(appraisal);
        });
    });
}

/// Benchmark: the numeric core of a turn.
fn bench_state_step(c: &mut Criterion) {
    let controls = Controls::default();
    let baseline = PersonaPreset::calm_therapist().neuro_baseline;
    let neuro_config = NeuroConfig::default();
    let delta = AffectVector::new(-0.7, 0.6, 0.4);

    c.bench_function("mood_neuro_style_step", |b| {
        let mut mood = MoodTracker::new(0.85);
        let mut neuro = NeuroState::NEUTRAL;
        b.iter(|| {
            let current = mood.update(black_box(delta), 0.25);
            neuro = neuro.step(&baseline, delta, &neuro_config);
            let effective = controls.effective_affect(current, &neuro);
            black_box(controls.style_for(&effective, false));
        });
    });
}

/// Benchmark: short-term eviction plus long-term re-rank at both caps.
fn bench_memory(c: &mut Criterion) {
    let store = full_store();
    let now = Utc::now();

    c.bench_function("memory_record_turn_at_capacity", |b| {
        b.iter_batched(
            || store.clone(),
            |mut store| {
                store.record_turn(
                    &Exchange {
                        user_text: "I hate that my plan for tomorrow fell apart",
                        reply: "That sounds hard.",
                        label: &EmotionLabel::Sadness,
                        affect: AffectVector::new(-0.4, 0.0, -0.2),
                        neuro: NeuroState::NEUTRAL,
                    },
                    now,
                );
                black_box(store);
            },
            criterion::BatchSize::SmallInput,
        );
    });

    c.bench_function("memory_context_full_store", |b| {
        b.iter(|| black_box(store.context()));
    });

    let weights = RecallWeights::default();
    c.bench_function("memory_recall_top3", |b| {
        b.iter(|| black_box(recall(store.long_term(), now, 3, &weights)));
    });
}

/// Benchmark: a whole turn against an in-process backend.
fn bench_full_turn(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap_or_else(|e| panic!("runtime: {e}"));
    let engine = TurnEngine::new(Arc::new(MockGenerator::echo()), ReplyPolicy::default());
    let config = AffectConfig::default();
    let mut state = SessionState::with_persona(&config, PersonaPreset::default());

    c.bench_function("full_turn_mock_backend", |b| {
        let mut i = 0;
        b.iter(|| {
            let text = SENTENCES[i % SENTENCES.len()];
            i += 1;
            black_box(runtime.block_on(engine.process_turn(&mut state, text)));
        });
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_state_step,
    bench_memory,
    bench_full_turn,
);
criterion_main!(benches);
