//! cardsmith-inference: the flashcard generator.
//!
//! Wraps Groq's OpenAI-compatible chat-completions endpoint behind the
//! [`CompletionClient`] trait and drives one prompt → completion → parse →
//! validate pass per user request. No retries: a failed generation is
//! reported to the caller, and resubmission is a user action.

pub mod client;
pub mod config;
pub mod generator;

pub use client::{CompletionClient, CompletionError, GroqClient};
pub use config::GroqConfig;
pub use generator::{FlashcardGenerator, GenerationError};
