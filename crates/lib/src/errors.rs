use thiserror::Error;

/// Custom error types for the MCQ generation library.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("Invalid AI provider configuration: {0}")]
    InvalidProviderConfig(String),
    #[error("API key is missing for provider '{0}'. Set AI_API_KEY before starting the server")]
    MissingApiKey(String),
    #[error("Unsupported difficulty '{0}'. Expected one of: easy, medium, hard, mixed")]
    InvalidDifficulty(String),
    #[error("Invalid number of questions '{value}'. Expected an integer between 1 and {max}")]
    InvalidQuestionCount { value: String, max: u32 },
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
