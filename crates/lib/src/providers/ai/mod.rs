pub mod gemini;
pub mod local;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;
use std::time::Duration;

/// The default sampling temperature for MCQ generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// The default upper bound on a single provider round-trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface for sending a system and user prompt to
/// different Large Language Models (e.g., Gemini, OpenAI-compatible servers).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// The result should be a string containing the AI's response.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// Per-request tuning shared by all providers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestOptions {
    pub temperature: f32,
    /// Applied to the whole request, connect through body.
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub(crate) fn build_http_client(
    options: &RequestOptions,
) -> Result<reqwest::Client, PromptError> {
    reqwest::Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(PromptError::ReqwestClientBuild)
}
