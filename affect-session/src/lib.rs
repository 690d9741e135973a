//! # affect-session: orchestration for the affect layer
//!
//! Composes the pure components of `affect-core` and the generation backend
//! of `affect-llm` into a per-turn pipeline:
//!
//! ```text
//! user text ─► crisis check ─► classify ─► mood ─► neuro ─► mix + persona
//!          ─► style ─► memory context ─► reply ─► memory ─► attachment
//!          ─► reflection
//! ```
//!
//! Each conversation owns an explicit [`SessionState`]; the
//! [`SessionManager`] serialises turns within a session and lets different
//! sessions run concurrently.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controls;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod policy;
pub mod state;
pub mod turn;

pub use controls::Controls;
pub use error::SessionError;
pub use manager::SessionManager;
pub use metrics::{CounterSnapshot, TurnCounters};
pub use policy::{ReplyPolicy, ReplySource};
pub use state::{SessionId, SessionSnapshot, SessionState};
pub use turn::{TurnEngine, TurnOutcome};
