use crate::errors::PromptError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The difficulty level requested for a batch of questions.
///
/// Parsing is case-insensitive and ignores surrounding whitespace, so `"HARD"`,
/// `" hard "` and `"Hard"` all resolve to [`Difficulty::Hard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Mixed,
}

impl Difficulty {
    /// The capitalized label substituted into the prompt (e.g. `Medium`).
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "mixed" => Ok(Difficulty::Mixed),
            _ => Err(PromptError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// Parses a requested question count, enforcing `1..=max`.
pub fn parse_question_count(raw: &str, max: u32) -> Result<u32, PromptError> {
    let invalid = || PromptError::InvalidQuestionCount {
        value: raw.to_string(),
        max,
    };
    let count: u32 = raw.trim().parse().map_err(|_| invalid())?;
    if count == 0 || count > max {
        return Err(invalid());
    }
    Ok(count)
}

/// The parameters of a single generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The extracted document text. It is truncated when the prompt is rendered.
    pub text: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
}

impl GenerationRequest {
    pub fn new(text: impl Into<String>, difficulty: Difficulty, num_questions: u32) -> Self {
        Self {
            text: text.into(),
            difficulty,
            num_questions,
        }
    }
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProviderConfig {
    /// The type of provider (`"gemini"` or `"local"`).
    pub provider: String,
    /// The API URL. Optional for Gemini, where it is derived from the model name.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key. Required for Gemini, optional for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Upper bound on one provider round-trip, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}
