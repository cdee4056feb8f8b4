//! The flashcard generator: one prompt, one call, one parse, one verdict.

use std::sync::Arc;

use cardsmith_core::parse::{parse_flashcard_response, validate_cards, ParsedResponse};
use cardsmith_core::prompt::{build_flashcard_prompt, SYSTEM_PROMPT};
use cardsmith_core::{Flashcard, GenerationRequest};

use crate::client::{CompletionClient, CompletionError};

/// Failure taxonomy for one generation attempt.
///
/// A missing API key is not represented here: it is detected at startup and
/// the web layer runs without a generator at all ("generation disabled"),
/// so these variants only describe per-request outcomes.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Network failure, timeout, or a 5xx/429 from the endpoint.
    #[error("Inference endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    /// The endpoint rejected the configured credential.
    #[error("Inference endpoint rejected the API credential")]
    AuthFailure,

    /// A response arrived but neither parse path produced cards.
    #[error("Model response could not be parsed into flashcards")]
    ParseFailure(String),

    /// Parsing succeeded but validation left zero cards.
    #[error("Generation produced no valid flashcards")]
    EmptyResult,
}

/// Generates flashcard sets from topics via the inference endpoint.
///
/// Holds no mutable state; a single attempt is made per call and failures
/// propagate to the caller (resubmitting is a user action).
pub struct FlashcardGenerator {
    client: Arc<dyn CompletionClient>,
}

impl FlashcardGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Generate flashcards for a validated request.
    ///
    /// Returns at most `req.count()` cards, each with a non-empty question
    /// and answer. Never returns an empty list: a generation that yields
    /// zero valid cards is [`GenerationError::EmptyResult`].
    pub async fn generate(
        &self,
        req: &GenerationRequest,
    ) -> Result<Vec<Flashcard>, GenerationError> {
        let prompt = build_flashcard_prompt(req);

        let raw = self
            .client
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(classify_completion_error)?;

        tracing::debug!(topic = req.topic(), bytes = raw.len(), "Completion received");

        let extracted = match parse_flashcard_response(&raw) {
            ParsedResponse::Structured(cards) => {
                tracing::debug!(count = cards.len(), "Structured parse succeeded");
                cards
            }
            ParsedResponse::Heuristic(cards) => {
                tracing::info!(
                    count = cards.len(),
                    "Structured parse failed, heuristic extraction used"
                );
                cards
            }
            ParsedResponse::Unparseable => {
                tracing::warn!(topic = req.topic(), "Model response was unparseable");
                return Err(GenerationError::ParseFailure(truncate_for_log(&raw)));
            }
        };

        let cards = validate_cards(extracted, req.count());
        if cards.is_empty() {
            tracing::warn!(topic = req.topic(), "No cards survived validation");
            return Err(GenerationError::EmptyResult);
        }

        tracing::info!(
            topic = req.topic(),
            requested = req.count(),
            produced = cards.len(),
            "Flashcards generated"
        );
        Ok(cards)
    }
}

/// Map a transport-layer error onto the generation taxonomy.
fn classify_completion_error(err: CompletionError) -> GenerationError {
    match err {
        CompletionError::Request(e) if e.is_timeout() => {
            GenerationError::EndpointUnavailable("request timed out".to_string())
        }
        CompletionError::Request(e) => GenerationError::EndpointUnavailable(e.to_string()),
        CompletionError::Api { status: 401, .. } | CompletionError::Api { status: 403, .. } => {
            GenerationError::AuthFailure
        }
        CompletionError::Api { status, .. } => {
            GenerationError::EndpointUnavailable(format!("endpoint returned status {status}"))
        }
        CompletionError::Malformed(msg) => GenerationError::ParseFailure(msg),
    }
}

/// First line of the raw response, capped, for error context without
/// dumping whole completions into error values.
fn truncate_for_log(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or_default();
    first_line.chars().take(120).collect()
}
