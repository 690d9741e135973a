//! # Affect Core Library
//!
//! Emotional state tracking for a conversational agent. Every conversation
//! carries:
//!
//! - **Mood**: a decaying running point in PAD space (Russell & Mehrabian, 1977)
//! - **Neuro-state**: three simulated modulators (reward, safety, alertness)
//!   that bias the mood through a fixed linear projection
//! - **Memory**: verbatim short-term exchanges plus importance-gated
//!   long-term summaries
//! - **Attachment**: a bounded rapport signal
//!
//! Around these sit the pure helpers a turn needs: appraisal of user text,
//! crisis detection, style derivation, importance scoring, persona presets
//! and the reflection narrator.
//!
//! ## Invariants
//!
//! Every mutator clips before returning. No affect or neuro component ever
//! leaves [-1, 1]; no importance, style knob or attachment ever leaves [0, 1].
//! State components never fail; only configuration and persona lookup
//! return errors.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod appraisal;
pub mod attachment;
pub mod config;
pub mod error;
pub mod importance;
pub mod memory;
pub mod mood;
pub mod neuro;
pub mod persona;
pub mod reflection;
pub mod safety;
pub mod style;
pub mod types;

pub use appraisal::{Appraisal, Appraiser, Classifier, SentimentScorer, Signals};
pub use attachment::AttachmentTracker;
pub use config::AffectConfig;
pub use error::AffectError;
pub use memory::{MemoryRecord, MemoryStore};
pub use mood::MoodTracker;
pub use neuro::NeuroState;
pub use persona::PersonaPreset;
pub use safety::CrisisDetector;
pub use style::{Strategy, Style, StyleOverrides};
pub use types::*;
