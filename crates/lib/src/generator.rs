//! # MCQ Generator
//!
//! [`McqGenerator`] renders the MCQ prompt, makes exactly one call to the
//! configured [`AiProvider`] and splits the reply into [`McqRecord`]s.
//!
//! Failures never escape as errors: empty input and provider errors are turned
//! into a [`GenerationOutcome`] whose messages keep the `{"mcqs": [...]}` shape
//! intact for callers.

use crate::{
    errors::PromptError,
    mcq::{parse_mcq_output, McqRecord},
    prompts::{
        core::{build_mcq_prompt, DEFAULT_MAX_CONTEXT_CHARS},
        tasks::{MCQ_GENERATION_SYSTEM_PROMPT, MCQ_GENERATION_USER_PROMPT},
    },
    providers::ai::AiProvider,
    types::GenerationRequest,
};
use tracing::{debug, error, info, instrument, warn};

/// The single message returned when the document produced no text.
pub const NO_TEXT_MESSAGE: &str = "No text extracted from the PDF or file not found.";

/// The prefix of the single message returned when the provider call fails.
pub const GENERATION_ERROR_PREFIX: &str = "Error generating MCQs";

/// The result of one generation attempt.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The provider answered; the records may be fewer than requested, or none.
    Generated(Vec<McqRecord>),
    /// There was no text to generate from. The provider was not called.
    NoText,
    /// The provider call failed.
    Failed(PromptError),
}

impl GenerationOutcome {
    /// The parsed records, or an empty slice for the sentinel outcomes.
    pub fn records(&self) -> &[McqRecord] {
        match self {
            GenerationOutcome::Generated(records) => records.as_slice(),
            _ => &[],
        }
    }

    /// Flattens the outcome into the list of strings returned to API clients.
    pub fn into_messages(self) -> Vec<String> {
        match self {
            GenerationOutcome::Generated(records) => {
                records.into_iter().map(McqRecord::into_inner).collect()
            }
            GenerationOutcome::NoText => vec![NO_TEXT_MESSAGE.to_string()],
            GenerationOutcome::Failed(err) => vec![format!("{GENERATION_ERROR_PREFIX}: {err}")],
        }
    }
}

/// Generates MCQs from document text through a single AI provider call.
#[derive(Debug, Clone)]
pub struct McqGenerator {
    ai_provider: Box<dyn AiProvider>,
    system_prompt: String,
    user_prompt_template: String,
    max_context_chars: usize,
}

impl McqGenerator {
    pub fn builder() -> McqGeneratorBuilder {
        McqGeneratorBuilder::new()
    }

    pub fn max_context_chars(&self) -> usize {
        self.max_context_chars
    }

    /// Renders the user prompt for a request, with its text truncated.
    pub fn build_prompt(&self, request: &GenerationRequest) -> String {
        build_mcq_prompt(&self.user_prompt_template, request, self.max_context_chars)
    }

    /// Runs prompt construction, the provider call and response parsing.
    ///
    /// Blank text short-circuits to [`GenerationOutcome::NoText`] without a call.
    #[instrument(skip(self, request), fields(difficulty = %request.difficulty, num_questions = request.num_questions))]
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationOutcome {
        if request.text.trim().is_empty() {
            warn!("No text to generate MCQs from. Skipping AI provider call.");
            return GenerationOutcome::NoText;
        }

        let user_prompt = self.build_prompt(request);
        info!(
            prompt_chars = user_prompt.chars().count(),
            "Generating {} {} MCQs in a single AI call.",
            request.num_questions,
            request.difficulty
        );
        debug!(system_prompt = %self.system_prompt, user_prompt = %user_prompt, "--> Sending prompts to AI Provider");

        let raw_response = match self
            .ai_provider
            .generate(&self.system_prompt, &user_prompt)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                error!("AI provider call failed: {e}");
                return GenerationOutcome::Failed(e);
            }
        };

        debug!("<-- MCQ response from AI: {}", &raw_response);

        let records = parse_mcq_output(&raw_response);
        if records.is_empty() {
            warn!("AI response contained no question markers.");
        } else if records.len() < request.num_questions as usize {
            warn!(
                "AI returned {} of {} requested questions.",
                records.len(),
                request.num_questions
            );
        }
        GenerationOutcome::Generated(records)
    }
}

/// A builder for creating `McqGenerator` instances.
#[derive(Default)]
pub struct McqGeneratorBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    system_prompt: Option<String>,
    user_prompt_template: Option<String>,
    max_context_chars: Option<usize>,
}

impl McqGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    /// Overrides [`MCQ_GENERATION_SYSTEM_PROMPT`].
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Overrides [`MCQ_GENERATION_USER_PROMPT`]. The template should keep the
    /// `{text}`, `{difficulty}` and `{num_questions}` placeholders.
    pub fn user_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.user_prompt_template = Some(template.into());
        self
    }

    pub fn max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = Some(max_context_chars);
        self
    }

    /// Builds the generator. An AI provider is required.
    pub fn build(self) -> Result<McqGenerator, PromptError> {
        let ai_provider = self.ai_provider.ok_or_else(|| {
            PromptError::InvalidProviderConfig("an AI provider is required".to_string())
        })?;
        Ok(McqGenerator {
            ai_provider,
            system_prompt: self
                .system_prompt
                .unwrap_or_else(|| MCQ_GENERATION_SYSTEM_PROMPT.to_string()),
            user_prompt_template: self
                .user_prompt_template
                .unwrap_or_else(|| MCQ_GENERATION_USER_PROMPT.to_string()),
            max_context_chars: self.max_context_chars.unwrap_or(DEFAULT_MAX_CONTEXT_CHARS),
        })
    }
}
