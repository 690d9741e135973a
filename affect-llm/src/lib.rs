//! # affect-llm: generation backend for the affect layer
//!
//! Replies are produced by a text-generation backend:
//!   - **Ollama** (local, default)
//!   - **OpenAI-compatible API**
//!
//! All generation goes through the [`Generator`] trait so the turn pipeline
//! can run against [`HttpGenerator`] in production and [`MockGenerator`] in
//! tests. Failures are returned, never panicked on; the caller substitutes
//! [`prompt::fallback_reply`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod generator;
pub mod mock;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use error::LlmError;
pub use generator::{Generator, HttpGenerator};
pub use mock::{MockBehavior, MockGenerator};
pub use prompt::PromptTemplate;
pub use types::{GenerationRequest, GenerationResponse};
