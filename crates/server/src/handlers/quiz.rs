//! # Quiz Generation Handler
//!
//! `POST /generate_quiz` accepts a multipart form with a `pdf_file` upload and
//! the optional `difficulty` and `numQuestions` fields, and answers with
//! `{"mcqs": [...]}`.

use super::{AppError, AppState};
use crate::types::{QuizParams, QuizResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::Multipart;
use mcqgen::{types::parse_question_count, Difficulty};
use mcqgen_pdf::{run_quiz_pipeline, QuizOptions};
use serde_json::json;
use tracing::{info, warn};

/// The raw form fields of a quiz request.
#[derive(Debug, Default)]
struct QuizForm {
    /// The upload's file name and bytes.
    pdf_file: Option<(String, Vec<u8>)>,
    difficulty: Option<String>,
    num_questions: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<QuizForm, AppError> {
    let mut form = QuizForm::default();

    while let Some(field) = multipart.next_field().await.map_err(AppError::Multipart)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf_file" => {
                // A plain text part under this name is not a file upload.
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    warn!("Ignoring 'pdf_file' part without a file name.");
                    continue;
                };
                let data = field.bytes().await.map_err(AppError::Multipart)?.to_vec();
                info!("Received upload '{}' ({} bytes).", file_name, data.len());
                form.pdf_file = Some((file_name, data));
            }
            "difficulty" => {
                form.difficulty = Some(field.text().await.map_err(AppError::Multipart)?);
            }
            "numQuestions" => {
                form.num_questions = Some(field.text().await.map_err(AppError::Multipart)?);
            }
            _ => warn!("Ignoring unknown multipart field: {}", name),
        }
    }

    Ok(form)
}

/// Treats absent and blank form values alike.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn has_pdf_extension(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
}

/// The handler for `POST /generate_quiz`.
///
/// Request problems are answered with 400. Once a valid PDF is accepted the
/// response is 200, even when no text was extracted or the AI call failed; in
/// those cases `mcqs` holds a single diagnostic string.
pub async fn generate_quiz_handler(
    State(app_state): State<AppState>,
    Query(params): Query<QuizParams>,
    multipart: Multipart,
) -> Result<Json<QuizResponse>, AppError> {
    let form = read_form(multipart).await?;
    let generation = &app_state.config.generation;

    let (file_name, pdf_data) = form
        .pdf_file
        .ok_or_else(|| AppError::BadRequest("No PDF file provided".to_string()))?;
    if file_name.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }
    if !has_pdf_extension(&file_name) {
        return Err(AppError::BadRequest(
            "Invalid file type. Please upload a PDF.".to_string(),
        ));
    }

    let difficulty = match non_blank(form.difficulty.as_deref()) {
        Some(raw) => raw.parse::<Difficulty>()?,
        None => generation.default_difficulty,
    };
    let num_questions = match non_blank(form.num_questions.as_deref()) {
        Some(raw) => parse_question_count(raw, generation.max_questions)?,
        None => generation.default_num_questions,
    };

    info!(
        file = %file_name,
        %difficulty,
        num_questions,
        "Generating quiz."
    );

    let report = run_quiz_pipeline(
        &app_state.generator,
        &pdf_data,
        QuizOptions {
            difficulty,
            num_questions,
        },
    )
    .await?;

    let record_count = report.outcome.records().len();
    let questions = params.structured.unwrap_or(false).then(|| {
        report
            .outcome
            .records()
            .iter()
            .map(|record| app_state.field_parser.parse(record.as_str()))
            .collect()
    });
    let debug = params.debug.unwrap_or(false).then(|| {
        json!({
            "file_name": file_name,
            "extracted_chars": report.extracted_chars,
            "truncated": report.truncated,
            "record_count": record_count,
            "difficulty": difficulty,
            "num_questions": num_questions,
        })
    });

    Ok(Json(QuizResponse {
        mcqs: report.outcome.into_messages(),
        questions,
        debug,
    }))
}
