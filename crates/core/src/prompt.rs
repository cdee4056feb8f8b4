//! Prompt construction for the flashcard generation call.

use crate::flashcard::GenerationRequest;

/// System message sent with every generation call. Pins the model to a JSON
/// response shape so the structured parse path is the common case.
pub const SYSTEM_PROMPT: &str = "You are an expert educator who creates high-quality \
educational flashcards. Always respond with valid JSON format containing an array of \
flashcard objects.";

/// Build the user message for one generation request.
///
/// The prompt is deterministic: the same topic and count always produce the
/// same string. It requests the exact JSON shape the structured parser in
/// [`crate::parse`] accepts.
pub fn build_flashcard_prompt(req: &GenerationRequest) -> String {
    let topic = req.topic();
    let count = req.count();
    format!(
        r#"Create {count} educational flashcards about "{topic}".

Requirements:
- Each flashcard should have a clear, concise question and a comprehensive answer
- Questions should test understanding, not just memorization
- Answers should be informative but not too lengthy
- Cover different aspects of the topic
- Use varied question types (what, how, why, when, where)
- Ensure questions are appropriate for learning and studying

Return the flashcards in this exact JSON format:
{{
  "flashcards": [
    {{
      "question": "Clear, specific question about the topic",
      "answer": "Comprehensive but concise answer"
    }}
  ]
}}

Topic: {topic}
Generate {count} flashcards now."#
    )
}
