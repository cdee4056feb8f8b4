//! Flashcard data model and the generation request value object.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DocId, Timestamp};

/// Default number of cards per generated set.
pub const DEFAULT_CARDS_PER_SET: u32 = 8;
/// Smallest card count a caller may request.
pub const MIN_CARDS_PER_SET: u32 = 1;
/// Largest card count a caller may request.
pub const MAX_CARDS_PER_SET: u32 = 50;
/// Longest accepted topic, in characters.
pub const DEFAULT_MAX_TOPIC_LENGTH: usize = 200;

/// One question/answer pair.
///
/// A flashcard has no identity of its own; it is addressed by position
/// within its parent set's ordered card list. Cards that reach the store
/// always have a non-empty question and answer (see
/// [`crate::parse::validate_cards`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A titled, owned, ordered collection of flashcards produced by one
/// generation call.
///
/// `id` is assigned by the store on insert; `owner_id` never changes after
/// creation. Regeneration produces a new set rather than mutating cards in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub id: DocId,
    pub owner_id: String,
    pub title: String,
    pub created_at: Timestamp,
    pub cards: Vec<Flashcard>,
}

/// Listing projection of a [`FlashcardSet`]: everything but the cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardSetSummary {
    pub id: DocId,
    pub title: String,
    pub card_count: usize,
    pub created_at: Timestamp,
}

impl FlashcardSet {
    pub fn summary(&self) -> FlashcardSetSummary {
        FlashcardSetSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            card_count: self.cards.len(),
            created_at: self.created_at,
        }
    }
}

/// Sort set summaries into listing order: `created_at` descending, ties
/// broken by `id` descending.
///
/// Both store adapters re-sort through this helper rather than trusting
/// backend ordering, so listings are stable for any insertion order.
pub fn sort_summaries(summaries: &mut [FlashcardSetSummary]) {
    summaries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Bounds applied when constructing a [`GenerationRequest`].
#[derive(Debug, Clone, Copy)]
pub struct GenerationLimits {
    pub min_cards: u32,
    pub max_cards: u32,
    pub max_topic_length: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            min_cards: MIN_CARDS_PER_SET,
            max_cards: MAX_CARDS_PER_SET,
            max_topic_length: DEFAULT_MAX_TOPIC_LENGTH,
        }
    }
}

/// Validated input to one generation call. Ephemeral; never persisted.
///
/// Construction is the validation point: the topic is trimmed and must be
/// non-empty and within the length bound, while an out-of-range count is
/// clamped rather than rejected.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    topic: String,
    count: u32,
}

impl GenerationRequest {
    pub fn new(topic: &str, count: u32, limits: &GenerationLimits) -> Result<Self, CoreError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CoreError::Validation(
                "Topic must not be empty".to_string(),
            ));
        }
        if topic.chars().count() > limits.max_topic_length {
            return Err(CoreError::Validation(format!(
                "Topic must be at most {} characters long",
                limits.max_topic_length
            )));
        }
        Ok(Self {
            topic: topic.to_string(),
            count: count.clamp(limits.min_cards, limits.max_cards),
        })
    }

    /// The trimmed topic. Doubles as the title of the resulting set.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The clamped card count.
    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn limits() -> GenerationLimits {
        GenerationLimits::default()
    }

    #[test]
    fn request_trims_topic() {
        let req = GenerationRequest::new("  Photosynthesis  ", 5, &limits()).unwrap();
        assert_eq!(req.topic(), "Photosynthesis");
        assert_eq!(req.count(), 5);
    }

    #[test]
    fn empty_topic_rejected() {
        let result = GenerationRequest::new("   ", 5, &limits());
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn overlong_topic_rejected() {
        let topic = "x".repeat(DEFAULT_MAX_TOPIC_LENGTH + 1);
        let result = GenerationRequest::new(&topic, 5, &limits());
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn count_clamped_not_rejected() {
        let low = GenerationRequest::new("Rust", 0, &limits()).unwrap();
        assert_eq!(low.count(), MIN_CARDS_PER_SET);

        let high = GenerationRequest::new("Rust", 500, &limits()).unwrap();
        assert_eq!(high.count(), MAX_CARDS_PER_SET);
    }

    #[test]
    fn summaries_order_newest_first_ties_by_id() {
        let at = |secs: i64| Utc.timestamp_opt(secs, 0).unwrap();
        let summary = |id: &str, secs: i64| FlashcardSetSummary {
            id: id.to_string(),
            title: "t".to_string(),
            card_count: 1,
            created_at: at(secs),
        };

        let mut summaries = vec![
            summary("a", 100),
            summary("c", 200),
            summary("b", 200),
            summary("d", 50),
        ];
        sort_summaries(&mut summaries);

        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        // 200s first (tie broken by id descending), then 100, then 50.
        assert_eq!(ids, vec!["c", "b", "a", "d"]);
    }
}
