use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use mcqgen::PromptError;
use mcqgen_pdf::PdfExtractError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// Each variant maps to an HTTP status and a `{"error": "..."}` body.
#[derive(Debug)]
pub enum AppError {
    /// The request is malformed; the message is returned verbatim with a 400.
    BadRequest(String),
    /// The multipart body could not be read, e.g. it exceeds the upload limit.
    Multipart(MultipartError),
    /// Errors originating from `mcqgen`.
    Prompt(PromptError),
    /// Generic internal server errors, reported as a failed generation.
    Internal(anyhow::Error),
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<PdfExtractError> for AppError {
    fn from(err: PdfExtractError) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => {
                warn!("Rejected request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Multipart(err) => {
                warn!("Rejected multipart body: {err}");
                (err.status(), err.body_text())
            }
            AppError::Prompt(err) => match err {
                PromptError::InvalidDifficulty(_) | PromptError::InvalidQuestionCount { .. } => {
                    warn!("Rejected request: {err}");
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                other => {
                    error!("PromptError: {:?}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to generate MCQs: {other}"),
                    )
                }
            },
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate MCQs: {err}"),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
