//! cardsmith-core: domain types and pure logic for flashcard generation.
//!
//! Everything in this crate is I/O-free: the flashcard data model, the
//! generation request value object, prompt construction, model-response
//! parsing, and the card validation pass. The HTTP client and the store
//! adapter live in sibling crates.

pub mod error;
pub mod flashcard;
pub mod parse;
pub mod prompt;
pub mod types;

pub use error::CoreError;
pub use flashcard::{
    sort_summaries, Flashcard, FlashcardSet, FlashcardSetSummary, GenerationLimits,
    GenerationRequest,
};
pub use parse::{parse_flashcard_response, validate_cards, ParsedResponse};
pub use prompt::{build_flashcard_prompt, SYSTEM_PROMPT};
