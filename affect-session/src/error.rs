//! Session-layer error types.

use affect_core::AffectError;
use thiserror::Error;

use crate::state::SessionId;

/// Errors from the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No open session has this id.
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    /// Configuration or persona error from the core.
    #[error(transparent)]
    Core(#[from] AffectError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SessionError>;
