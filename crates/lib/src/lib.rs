//! # MCQ Generation
//!
//! This crate turns document text into multiple-choice questions using a configurable
//! AI provider. It covers the three steps after text extraction:
//!
//! 1. **Prompt construction** ([`prompts`]): a fixed template that pins down the
//!    per-question output shape, with the document text truncated to a character budget.
//! 2. **Invocation** ([`providers`]): exactly one call to Gemini or an OpenAI-compatible API.
//! 3. **Parsing** ([`mcq`]): a deterministic split of the reply on the `Question:` marker.
//!
//! [`McqGenerator`] wires the three together.

pub mod errors;
pub mod generator;
pub mod mcq;
pub mod prompts;
pub mod providers;
pub mod types;

pub use errors::PromptError;
pub use generator::{GenerationOutcome, McqGenerator, McqGeneratorBuilder, NO_TEXT_MESSAGE};
pub use mcq::{parse_mcq_output, McqFieldParser, McqFields, McqRecord, QUESTION_MARKER};
pub use types::{Difficulty, GenerationRequest, ProviderConfig};
