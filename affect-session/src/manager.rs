//! Multi-session manager.
//!
//! Sessions live in a `DashMap` keyed by [`SessionId`]. Each entry is an
//! `Arc<tokio::sync::Mutex<SessionState>>`; the mutex is held for the whole
//! turn, so a session runs at most one turn at a time while different
//! sessions proceed concurrently. The map guard is never held across an
//! await.

use std::sync::Arc;

use affect_core::PersonaPreset;
use affect_core::config::AffectConfig;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{Result, SessionError};
use crate::metrics::CounterSnapshot;
use crate::state::{SessionId, SessionState};
use crate::turn::{TurnEngine, TurnOutcome};

/// Owns every open session and the shared turn engine.
#[derive(Debug)]
pub struct SessionManager {
    sessions: DashMap<SessionId, Arc<Mutex<SessionState>>>,
    engine: TurnEngine,
    config: AffectConfig,
}

impl SessionManager {
    /// Manager opening sessions with `config`.
    #[must_use]
    pub fn new(config: AffectConfig, engine: TurnEngine) -> Self {
        Self {
            sessions: DashMap::new(),
            engine,
            config,
        }
    }

    /// Open a session with the configured persona.
    ///
    /// # Errors
    /// Returns `SessionError::Core` if the configured persona is unknown.
    pub fn open(&self) -> Result<SessionId> {
        let state = SessionState::new(&self.config)?;
        Ok(self.insert(state))
    }

    /// Open a session with a named persona.
    ///
    /// # Errors
    /// Returns `SessionError::Core` for an unknown persona.
    pub fn open_with_persona(&self, persona: &str) -> Result<SessionId> {
        let preset = PersonaPreset::lookup(persona)?;
        Ok(self.insert(SessionState::with_persona(&self.config, preset)))
    }

    fn insert(&self, state: SessionState) -> SessionId {
        let id = state.id();
        info!(session = %id, persona = %state.persona().key, "session opened");
        self.sessions.insert(id, Arc::new(Mutex::new(state)));
        id
    }

    fn session(&self, id: SessionId) -> Result<Arc<Mutex<SessionState>>> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(SessionError::UnknownSession(id))
    }

    /// Process one user turn in session `id`.
    ///
    /// Waits for any turn already running in the same session.
    ///
    /// # Errors
    /// Returns `SessionError::UnknownSession` if `id` is not open.
    pub async fn handle_turn(&self, id: SessionId, user_text: &str) -> Result<TurnOutcome> {
        let session = self.session(id)?;
        let mut state = session.lock().await;
        Ok(self.engine.process_turn(&mut state, user_text).await)
    }

    /// Read from a session.
    ///
    /// # Errors
    /// Returns `SessionError::UnknownSession` if `id` is not open.
    pub async fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&SessionState) -> R) -> Result<R> {
        let session = self.session(id)?;
        let state = session.lock().await;
        Ok(f(&state))
    }

    /// Modify a session between turns (controls, reset, clear).
    ///
    /// # Errors
    /// Returns `SessionError::UnknownSession` if `id` is not open.
    pub async fn with_session_mut<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Result<R> {
        let session = self.session(id)?;
        let mut state = session.lock().await;
        Ok(f(&mut state))
    }

    /// Close a session. A turn already running finishes on its own copy of
    /// the handle.
    ///
    /// # Errors
    /// Returns `SessionError::UnknownSession` if `id` is not open.
    pub fn close(&self, id: SessionId) -> Result<()> {
        self.sessions
            .remove(&id)
            .map(|_| info!(session = %id, "session closed"))
            .ok_or(SessionError::UnknownSession(id))
    }

    /// Number of open sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Turn counters across all sessions.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.engine.counters().snapshot()
    }

    /// The shared engine.
    #[must_use]
    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }
}
