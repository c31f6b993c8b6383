use mcqgen::McqFields;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query flags accepted by `/generate_quiz`.
#[derive(Debug, Deserialize, Default)]
pub struct QuizParams {
    pub debug: Option<bool>,
    pub structured: Option<bool>,
}

/// The `/generate_quiz` response body.
///
/// `mcqs` is always present. It holds the question records, or a single
/// diagnostic string when no text was extracted or generation failed.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub mcqs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<McqFields>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}
