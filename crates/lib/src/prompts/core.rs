//! # Prompt Rendering
//!
//! Helpers that turn a [`GenerationRequest`] into the single instruction string
//! sent to the AI provider.

use crate::types::{Difficulty, GenerationRequest};

/// The default character budget for document text embedded in a prompt.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 100_000;

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
///
/// Truncation counts `char`s rather than bytes, so the cut always lands on a
/// UTF-8 boundary. It is a plain prefix cut and does not look for sentence ends.
pub fn truncate_to_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Substitutes the MCQ placeholders into `template`.
///
/// `{text}` is substituted last so that placeholder-like sequences inside the
/// document are left untouched.
pub fn render_mcq_prompt(
    template: &str,
    text: &str,
    difficulty: Difficulty,
    num_questions: u32,
) -> String {
    template
        .replace("{num_questions}", &num_questions.to_string())
        .replace("{difficulty}", difficulty.label())
        .replace("{text}", text)
}

/// Builds the full MCQ instruction for a request, truncating its text to `max_context_chars`.
pub fn build_mcq_prompt(
    template: &str,
    request: &GenerationRequest,
    max_context_chars: usize,
) -> String {
    let text = truncate_to_chars(&request.text, max_context_chars);
    render_mcq_prompt(template, text, request.difficulty, request.num_questions)
}
