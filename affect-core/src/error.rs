//! Error types for the affect core library.

use thiserror::Error;

/// Top-level error type for affect-core operations.
///
/// The state components themselves never fail (every mutator clips); errors
/// only come from configuration, persona lookup and file I/O.
#[derive(Error, Debug)]
pub enum AffectError {
    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A named persona preset does not exist.
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    /// A numeric knob is outside its allowed range.
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter {
        /// Dotted path of the offending setting (e.g. `mood.decay_rate`).
        name: String,
        /// The rejected value, rendered for display.
        value: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, AffectError>;
