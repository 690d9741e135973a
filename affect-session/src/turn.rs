//! The per-turn pipeline.
//!
//! ```text
//! crisis check → classify → mood update → neuro step → mix + persona bias
//!   → style → memory context → reply (or crisis message / fallback)
//!   → memory write → attachment → reflection → transcript
//! ```
//!
//! Only the reply step awaits. Everything else is a synchronous update of
//! the borrowed [`SessionState`].

use std::sync::Arc;

use affect_core::memory::{Exchange, MemoryUpdate};
use affect_core::reflection::{ReflectionInput, reflect};
use affect_core::{
    AffectVector, Appraiser, Classifier, CrisisDetector, EmotionLabel, NeuroState, Signals,
    Style, Target,
};
use affect_llm::Generator;
use affect_llm::prompt::with_memory_context;
use chrono::Utc;
use tracing::{debug, warn};

use crate::metrics::TurnCounters;
use crate::policy::{Reply, ReplyPolicy, ReplySource};
use crate::state::{Reflection, SessionState, TranscriptEntry};

/// Everything one turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Reply shown to the user.
    pub reply: String,
    /// Where the reply came from.
    pub source: ReplySource,
    /// Label the turn was recorded under (`safety` on a crisis turn).
    pub label: EmotionLabel,
    /// Label the classifier produced.
    pub classified: EmotionLabel,
    /// Affect delta from the classifier.
    pub delta: AffectVector,
    /// Classifier side-channel scores.
    pub signals: Signals,
    /// Mood after the update.
    pub mood: AffectVector,
    /// Neuro-state after the step.
    pub neuro: NeuroState,
    /// Mood mixed with the neuro projection and biased by the persona.
    pub effective: AffectVector,
    /// Style used for the reply.
    pub style: Style,
    /// Attachment after the update.
    pub attachment: f32,
    /// What the memory store did.
    pub memory: MemoryUpdate,
    /// Internal monologue for this turn.
    pub reflection: String,
}

/// Stateless collaborators shared by every session.
pub struct TurnEngine {
    classifier: Arc<dyn Classifier>,
    crisis: CrisisDetector,
    generator: Arc<dyn Generator>,
    policy: ReplyPolicy,
    counters: Arc<TurnCounters>,
}

impl std::fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnEngine")
            .field("generator", &self.generator.describe())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl TurnEngine {
    /// Engine with the default classifier and crisis message.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>, policy: ReplyPolicy) -> Self {
        Self {
            classifier: Arc::new(Appraiser::new()),
            crisis: CrisisDetector::default(),
            generator,
            policy,
            counters: Arc::new(TurnCounters::new()),
        }
    }

    /// Swap the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Swap the crisis detector.
    #[must_use]
    pub fn with_crisis_detector(mut self, crisis: CrisisDetector) -> Self {
        self.crisis = crisis;
        self
    }

    /// Shared turn counters.
    #[must_use]
    pub fn counters(&self) -> &Arc<TurnCounters> {
        &self.counters
    }

    /// Reply policy in use.
    #[must_use]
    pub fn policy(&self) -> &ReplyPolicy {
        &self.policy
    }

    /// Run one user turn against `state`.
    ///
    /// Never fails: a backend error becomes a fallback reply, and empty
    /// input is processed as a neutral turn.
    pub async fn process_turn(&self, state: &mut SessionState, user_text: &str) -> TurnOutcome {
        let crisis = self.crisis.check(user_text).map(str::to_owned);
        let appraisal = self.classifier.classify(user_text);
        let target = appraisal.signals.target;
        let label = if crisis.is_some() {
            EmotionLabel::Safety
        } else {
            appraisal.label.clone()
        };

        // Mood and neuro-state always follow the classifier's delta.
        let controls = state.controls;
        state.mood.set_decay_rate(controls.decay_rate());
        let mood = state.mood.update(appraisal.delta, controls.blend());
        let neuro = state.neuro.step(
            &state.persona().neuro_baseline,
            appraisal.delta,
            &state.config().neuro,
        );
        state.push_neuro(neuro);

        let effective = controls.effective_affect(mood, &neuro);
        let anger_at_bot = appraisal.label == EmotionLabel::Anger && target == Target::Bot;
        let style = controls.style_for(&effective, anger_at_bot);

        debug!(
            session = %state.id(),
            label = %appraisal.label,
            target = %target,
            mood = %mood,
            effective = %effective,
            "turn appraised"
        );

        let reply = match crisis {
            Some(message) => {
                warn!(session = %state.id(), "crisis phrase detected, skipping generation");
                TurnCounters::bump(&self.counters.crisis_overrides);
                Reply {
                    text: message,
                    source: ReplySource::Crisis,
                    latency_ms: None,
                }
            }
            None => {
                let system = self.policy.system_prompt(&effective, &style, &controls);
                let user = with_memory_context(&state.memory.context(), user_text);
                let reply = self.policy.reply(self.generator.as_ref(), &system, &user).await;
                if reply.source == ReplySource::Fallback {
                    TurnCounters::bump(&self.counters.fallbacks);
                }
                if let Some(ms) = reply.latency_ms {
                    self.counters.record_latency(ms);
                }
                reply
            }
        };

        let now = Utc::now();
        let memory = state.memory.record_turn(
            &Exchange {
                user_text,
                reply: &reply.text,
                label: &label,
                affect: mood,
                neuro,
            },
            now,
        );
        if memory.promoted {
            TurnCounters::bump(&self.counters.promotions);
        }

        let attachment = state.attachment.update(&label, target, &appraisal.signals);

        let reflection = reflect(&ReflectionInput {
            label: &label,
            affect: mood,
            neuro,
            strategy: controls.strategy(),
            target,
            attachment,
            delta: appraisal.delta,
            reply: &reply.text,
            long_term: state.memory.long_term(),
        });
        state.push_reflection(Reflection {
            at: now,
            text: reflection.clone(),
        });
        state.push_transcript(TranscriptEntry {
            user: user_text.to_string(),
            reply: reply.text.clone(),
            label: label.clone(),
        });
        state.turns += 1;
        TurnCounters::bump(&self.counters.turns);

        debug!(
            session = %state.id(),
            label = %label,
            source = ?reply.source,
            importance = memory.importance,
            attachment,
            "turn complete"
        );

        TurnOutcome {
            reply: reply.text,
            source: reply.source,
            label,
            classified: appraisal.label,
            delta: appraisal.delta,
            signals: appraisal.signals,
            mood,
            neuro,
            effective,
            style,
            attachment,
            memory,
            reflection,
        }
    }
}
