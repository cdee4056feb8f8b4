//! Parsing of raw model output into flashcards.
//!
//! The model is asked for a JSON payload but gets no guarantees from the
//! endpoint, so parsing is a two-path affair: a structured JSON path for
//! well-behaved responses (including responses wrapped in markdown code
//! fences or surrounding prose), and a line-based heuristic fallback for
//! everything else. The outcome is a tagged [`ParsedResponse`] so callers
//! handle all three cases by exhaustive matching.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::flashcard::Flashcard;

/// Opens a question line: `Q:`, `Q1:`, `Q 2.`, `Question:`, `Question 3)`.
static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^q(?:uestion)?\s*\d*\s*[:.)]\s*").expect("valid regex"));

/// Opens an answer line: `A:`, `A1:`, `Answer:`, `Answer 3)`.
static ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^a(?:nswer)?\s*\d*\s*[:.)]\s*").expect("valid regex"));

/// Outcome of parsing one raw model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// The response carried the requested JSON shape.
    Structured(Vec<Flashcard>),
    /// JSON parsing failed but the line heuristic recovered pairs.
    Heuristic(Vec<Flashcard>),
    /// Neither path produced anything usable.
    Unparseable,
}

/// Parse a raw model response into flashcards.
///
/// Tries the structured JSON path first, then the line heuristic. Cards
/// returned here are raw extraction results; run them through
/// [`validate_cards`] before treating them as a usable set.
pub fn parse_flashcard_response(raw: &str) -> ParsedResponse {
    let text = strip_code_fences(raw.trim());

    if let Some(cards) = parse_structured(&text) {
        return ParsedResponse::Structured(cards);
    }

    let pairs = heuristic_pairs(&text);
    if pairs.is_empty() {
        ParsedResponse::Unparseable
    } else {
        ParsedResponse::Heuristic(pairs)
    }
}

/// Final validation pass over extracted cards.
///
/// Trims both sides, drops cards with an empty question or answer, drops
/// repeated questions (first occurrence wins), and truncates to `max` when
/// the model over-produces. An empty result here means the generation
/// failed; callers must not persist it as an empty set.
pub fn validate_cards(cards: Vec<Flashcard>, max: u32) -> Vec<Flashcard> {
    let mut seen: Vec<String> = Vec::new();
    let mut valid = Vec::new();

    for card in cards {
        let question = card.question.trim();
        let answer = card.answer.trim();
        if question.is_empty() || answer.is_empty() {
            continue;
        }
        let key = question.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        valid.push(Flashcard::new(question, answer));
        if valid.len() == max as usize {
            break;
        }
    }

    valid
}

/// Remove a surrounding markdown code fence, if present.
///
/// Handles ` ```json `, a bare ` ``` ` with an optional language tag on the
/// first line, and responses without any fence (returned unchanged).
fn strip_code_fences(text: &str) -> String {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim().to_string();
        }
    }
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.rfind("```") {
            if end > 0 {
                let inner = rest[..end].trim();
                // Drop a leading language tag line (e.g. "json").
                if let Some(first_newline) = inner.find('\n') {
                    let first_line = inner[..first_newline].trim();
                    if !first_line.starts_with('{') && !first_line.starts_with('[') {
                        return inner[first_newline + 1..].trim().to_string();
                    }
                }
                return inner.to_string();
            }
        }
    }
    text.to_string()
}

/// Structured path: parse the text (or an embedded JSON object/array) and
/// extract the flashcard array.
fn parse_structured(text: &str) -> Option<Vec<Flashcard>> {
    let value = parse_json_candidate(text)?;

    let items = match &value {
        Value::Object(map) => map.get("flashcards")?.as_array()?.clone(),
        Value::Array(items) => items.clone(),
        _ => return None,
    };

    let cards: Vec<Flashcard> = items.iter().filter_map(card_from_value).collect();
    if cards.is_empty() {
        None
    } else {
        Some(cards)
    }
}

/// Try the whole text as JSON, then the outermost `{..}` slice, then the
/// outermost `[..]` slice. The model frequently wraps its JSON in prose.
fn parse_json_candidate(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    if let Some(slice) = delimited_slice(text, '{', '}') {
        if let Ok(value) = serde_json::from_str::<Value>(slice) {
            return Some(value);
        }
    }
    if let Some(slice) = delimited_slice(text, '[', ']') {
        if let Ok(value) = serde_json::from_str::<Value>(slice) {
            return Some(value);
        }
    }
    None
}

/// The slice from the first `open` to the last `close`, if both exist in
/// order.
fn delimited_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Accept an object carrying string `question` and `answer` fields.
fn card_from_value(value: &Value) -> Option<Flashcard> {
    let question = value.get("question")?.as_str()?;
    let answer = value.get("answer")?.as_str()?;
    Some(Flashcard::new(question, answer))
}

/// Line-based fallback extraction of Q/A pairs.
///
/// A line matching [`QUESTION_RE`] opens a question; a line matching
/// [`ANSWER_RE`] switches to collecting the answer; unprefixed lines extend
/// whichever side is currently open. A pair is emitted when the next
/// question opens or the input ends.
fn heuristic_pairs(text: &str) -> Vec<Flashcard> {
    enum Side {
        None,
        Question,
        Answer,
    }

    let mut pairs = Vec::new();
    let mut question = String::new();
    let mut answer = String::new();
    let mut side = Side::None;

    let mut flush = |question: &mut String, answer: &mut String| {
        if !question.trim().is_empty() && !answer.trim().is_empty() {
            pairs.push(Flashcard::new(question.trim(), answer.trim()));
        }
        question.clear();
        answer.clear();
    };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(m) = QUESTION_RE.find(line) {
            flush(&mut question, &mut answer);
            question.push_str(&line[m.end()..]);
            side = Side::Question;
        } else if let Some(m) = ANSWER_RE.find(line) {
            if !answer.is_empty() {
                answer.push(' ');
            }
            answer.push_str(&line[m.end()..]);
            side = Side::Answer;
        } else {
            let target = match side {
                Side::Question => &mut question,
                Side::Answer => &mut answer,
                Side::None => continue,
            };
            if !target.is_empty() {
                target.push(' ');
            }
            target.push_str(line);
        }
    }
    flush(&mut question, &mut answer);

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn cards_of(parsed: ParsedResponse) -> Vec<Flashcard> {
        match parsed {
            ParsedResponse::Structured(cards) | ParsedResponse::Heuristic(cards) => cards,
            ParsedResponse::Unparseable => panic!("expected cards"),
        }
    }

    #[test]
    fn plain_json_object() {
        let raw = r#"{"flashcards": [{"question": "What is ATP?", "answer": "Cellular energy currency."}]}"#;
        let parsed = parse_flashcard_response(raw);
        assert_matches!(&parsed, ParsedResponse::Structured(cards) if cards.len() == 1);
        assert_eq!(cards_of(parsed)[0].question, "What is ATP?");
    }

    #[test]
    fn fenced_json_with_language_tag() {
        let raw = "Here you go:\n```json\n{\"flashcards\": [{\"question\": \"Q\", \"answer\": \"A\"}]}\n```\nEnjoy!";
        assert_matches!(
            parse_flashcard_response(raw),
            ParsedResponse::Structured(cards) if cards.len() == 1
        );
    }

    #[test]
    fn generic_fence_with_tag_line() {
        let raw = "```\njson\n{\"flashcards\": [{\"question\": \"Q\", \"answer\": \"A\"}]}\n```";
        assert_matches!(
            parse_flashcard_response(raw),
            ParsedResponse::Structured(cards) if cards.len() == 1
        );
    }

    #[test]
    fn json_embedded_in_prose() {
        let raw = "Sure! {\"flashcards\": [{\"question\": \"Q\", \"answer\": \"A\"}]} Hope that helps.";
        assert_matches!(
            parse_flashcard_response(raw),
            ParsedResponse::Structured(cards) if cards.len() == 1
        );
    }

    #[test]
    fn bare_array_accepted() {
        let raw = r#"[{"question": "Q1", "answer": "A1"}, {"question": "Q2", "answer": "A2"}]"#;
        assert_matches!(
            parse_flashcard_response(raw),
            ParsedResponse::Structured(cards) if cards.len() == 2
        );
    }

    #[test]
    fn qa_lines_fall_back_to_heuristic() {
        let raw = "Q: What is the powerhouse of the cell?\nA: The mitochondrion.\n\nQ2: What is DNA?\nA2: Deoxyribonucleic acid.";
        let parsed = parse_flashcard_response(raw);
        assert_matches!(&parsed, ParsedResponse::Heuristic(cards) if cards.len() == 2);
        let cards = cards_of(parsed);
        assert_eq!(cards[0].answer, "The mitochondrion.");
        assert_eq!(cards[1].question, "What is DNA?");
    }

    #[test]
    fn numbered_question_answer_lines() {
        let raw = "Question 1: Why is the sky blue?\nAnswer 1: Rayleigh scattering\nof sunlight.\nQuestion 2) What causes tides?\nAnswer 2) The Moon's gravity.";
        let parsed = parse_flashcard_response(raw);
        let cards = cards_of(parsed);
        assert_eq!(cards.len(), 2);
        // Continuation lines extend the open side.
        assert_eq!(cards[0].answer, "Rayleigh scattering of sunlight.");
    }

    #[test]
    fn prose_lines_before_first_question_ignored() {
        let raw = "Here are your flashcards!\nQ: One?\nA: Yes.";
        let cards = cards_of(parse_flashcard_response(raw));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "One?");
    }

    #[test]
    fn garbage_is_unparseable() {
        assert_eq!(
            parse_flashcard_response("I cannot help with that request."),
            ParsedResponse::Unparseable
        );
        assert_eq!(parse_flashcard_response(""), ParsedResponse::Unparseable);
    }

    #[test]
    fn question_without_answer_not_a_pair() {
        assert_eq!(
            parse_flashcard_response("Q: Orphaned question with no answer"),
            ParsedResponse::Unparseable
        );
    }

    #[test]
    fn cards_missing_fields_skipped() {
        let raw = r#"{"flashcards": [{"question": "Q"}, {"question": "Q2", "answer": "A2"}]}"#;
        let cards = cards_of(parse_flashcard_response(raw));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "Q2");
    }

    #[test]
    fn validate_drops_empty_and_duplicate() {
        let cards = vec![
            Flashcard::new("  Q1  ", "  A1  "),
            Flashcard::new("Q1", "different answer"),
            Flashcard::new("", "A"),
            Flashcard::new("Q2", "   "),
            Flashcard::new("Q3", "A3"),
        ];
        let valid = validate_cards(cards, 10);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0], Flashcard::new("Q1", "A1"));
        assert_eq!(valid[1], Flashcard::new("Q3", "A3"));
    }

    #[test]
    fn validate_truncates_overproduction() {
        let cards: Vec<Flashcard> = (0..10)
            .map(|i| Flashcard::new(format!("Q{i}"), format!("A{i}")))
            .collect();
        let valid = validate_cards(cards, 3);
        assert_eq!(valid.len(), 3);
        assert_eq!(valid[2].question, "Q2");
    }

    #[test]
    fn validate_empty_input_stays_empty() {
        assert!(validate_cards(Vec::new(), 5).is_empty());
    }
}
