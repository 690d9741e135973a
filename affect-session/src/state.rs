//! Per-session state bundle.
//!
//! One [`SessionState`] owns every stateful component of a conversation.
//! The turn pipeline borrows it mutably for the duration of a turn; nothing
//! here is global.

use std::collections::VecDeque;
use std::fmt;

use affect_core::attachment::AttachmentLevel;
use affect_core::config::AffectConfig;
use affect_core::{
    AffectVector, AttachmentTracker, EmotionLabel, MemoryStore, MoodTracker, NeuroState,
    PersonaPreset,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::controls::Controls;
use crate::error::Result;

/// Unique session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of the visible conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// What the user said.
    pub user: String,
    /// What the assistant answered.
    pub reply: String,
    /// Label the turn was recorded under.
    pub label: EmotionLabel,
}

/// One internal-monologue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    /// When the turn finished.
    pub at: DateTime<Utc>,
    /// Narrated text.
    pub text: String,
}

/// Everything a conversation remembers between turns.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: SessionId,
    config: AffectConfig,
    persona: PersonaPreset,
    /// User-adjustable knobs.
    pub controls: Controls,
    pub(crate) mood: MoodTracker,
    pub(crate) neuro: NeuroState,
    pub(crate) neuro_history: VecDeque<NeuroState>,
    pub(crate) memory: MemoryStore,
    pub(crate) attachment: AttachmentTracker,
    pub(crate) transcript: VecDeque<TranscriptEntry>,
    pub(crate) reflections: VecDeque<Reflection>,
    pub(crate) turns: u64,
}

impl SessionState {
    /// Fresh state with the persona named in the configuration.
    ///
    /// # Errors
    /// Returns `SessionError::Core` if the configured persona is unknown.
    pub fn new(config: &AffectConfig) -> Result<Self> {
        let persona = PersonaPreset::lookup(&config.persona.preset)?;
        Ok(Self::with_persona(config, persona))
    }

    /// Fresh state with an explicit persona.
    #[must_use]
    pub fn with_persona(config: &AffectConfig, persona: PersonaPreset) -> Self {
        let mut neuro_history = VecDeque::new();
        neuro_history.push_back(NeuroState::NEUTRAL);
        Self {
            id: SessionId::new(),
            controls: Controls::from_persona(&persona, config),
            mood: MoodTracker::from_config(&config.mood),
            neuro: NeuroState::NEUTRAL,
            neuro_history,
            memory: MemoryStore::new(config.memory.clone()),
            attachment: AttachmentTracker::from_config(&config.attachment),
            transcript: VecDeque::new(),
            reflections: VecDeque::new(),
            turns: 0,
            config: config.clone(),
            persona,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Configuration the session was opened with.
    #[must_use]
    pub fn config(&self) -> &AffectConfig {
        &self.config
    }

    /// Active persona.
    #[must_use]
    pub fn persona(&self) -> &PersonaPreset {
        &self.persona
    }

    /// Switch persona by key or display name.
    ///
    /// The persona's bias and style defaults replace the current controls;
    /// mood, memory and attachment are untouched.
    ///
    /// # Errors
    /// Returns `SessionError::Core` for an unknown persona.
    pub fn set_persona(&mut self, name: &str) -> Result<()> {
        let persona = PersonaPreset::lookup(name)?;
        self.controls.apply_persona(&persona);
        info!(session = %self.id, persona = %persona.key, "persona changed");
        self.persona = persona;
        Ok(())
    }

    /// Mood tracker.
    #[must_use]
    pub fn mood(&self) -> &MoodTracker {
        &self.mood
    }

    /// Current neuro-state.
    #[must_use]
    pub fn neuro(&self) -> NeuroState {
        self.neuro
    }

    /// Neuro-state per turn, oldest first, starting with the initial state.
    #[must_use]
    pub fn neuro_history(&self) -> &VecDeque<NeuroState> {
        &self.neuro_history
    }

    /// Both memory tiers.
    #[must_use]
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Attachment tracker.
    #[must_use]
    pub fn attachment(&self) -> &AttachmentTracker {
        &self.attachment
    }

    /// Visible conversation, oldest first, bounded.
    #[must_use]
    pub fn transcript(&self) -> &VecDeque<TranscriptEntry> {
        &self.transcript
    }

    /// Internal monologue, oldest first, bounded.
    #[must_use]
    pub fn reflections(&self) -> &VecDeque<Reflection> {
        &self.reflections
    }

    /// Turns processed since the session opened.
    #[must_use]
    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// What the assistant currently acts like: mood mixed with the neuro
    /// projection and offset by the persona bias.
    #[must_use]
    pub fn effective_affect(&self) -> AffectVector {
        self.controls.effective_affect(self.mood.current(), &self.neuro)
    }

    /// Start over: mood, neuro-state, memories, reflections and attachment
    /// are reinitialised. The transcript and controls are kept.
    pub fn reset_mood(&mut self) {
        self.mood = MoodTracker::from_config(&self.config.mood);
        self.neuro = NeuroState::NEUTRAL;
        self.neuro_history.clear();
        self.neuro_history.push_back(self.neuro);
        self.memory.clear();
        self.reflections.clear();
        self.attachment.reset();
        info!(session = %self.id, "mood reset");
    }

    /// Forget the conversation: transcript, memories, reflections and
    /// attachment are cleared. Mood and neuro-state are kept.
    pub fn clear_chat(&mut self) {
        self.transcript.clear();
        self.memory.clear();
        self.reflections.clear();
        self.attachment.reset();
        info!(session = %self.id, "chat cleared");
    }

    /// Serializable summary for display.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            persona: self.persona.key.clone(),
            turns: self.turns,
            mood: self.mood.current(),
            neuro: self.neuro,
            effective: self.effective_affect(),
            attachment: self.attachment.value(),
            attachment_level: self.attachment.level(),
            short_term: self.memory.short_term().len(),
            long_term: self.memory.long_term().len(),
            controls: self.controls,
        }
    }

    // -- bounded appends ----------------------------------------------------

    pub(crate) fn push_neuro(&mut self, neuro: NeuroState) {
        self.neuro = neuro;
        push_bounded(&mut self.neuro_history, neuro, self.config.neuro.history_limit);
    }

    pub(crate) fn push_transcript(&mut self, entry: TranscriptEntry) {
        push_bounded(&mut self.transcript, entry, self.config.general.transcript_limit);
    }

    pub(crate) fn push_reflection(&mut self, reflection: Reflection) {
        push_bounded(&mut self.reflections, reflection, self.config.general.reflection_limit);
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, limit: usize) {
    queue.push_back(item);
    while queue.len() > limit.max(1) {
        queue.pop_front();
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub id: SessionId,
    /// Active persona key.
    pub persona: String,
    /// Turns processed.
    pub turns: u64,
    /// Mood before neuro mix and persona bias.
    pub mood: AffectVector,
    /// Current neuro-state.
    pub neuro: NeuroState,
    /// Effective affect.
    pub effective: AffectVector,
    /// Attachment value.
    pub attachment: f32,
    /// Attachment bucket.
    pub attachment_level: AttachmentLevel,
    /// Short-term records held.
    pub short_term: usize,
    /// Long-term records held.
    pub long_term: usize,
    /// Current controls.
    pub controls: Controls,
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "session {} ({}), {} turns", self.id, self.persona, self.turns)?;
        writeln!(f, "  mood      {}", self.mood)?;
        writeln!(
            f,
            "  neuro     reward={:.2} safety={:.2} alertness={:.2}",
            self.neuro.reward(),
            self.neuro.safety(),
            self.neuro.alertness()
        )?;
        writeln!(f, "  effective {}", self.effective)?;
        writeln!(f, "  attachment {:.2} ({})", self.attachment, self.attachment_level)?;
        write!(
            f,
            "  memory    {} short-term, {} long-term; strategy {}",
            self.short_term,
            self.long_term,
            self.controls.strategy()
        )
    }
}
