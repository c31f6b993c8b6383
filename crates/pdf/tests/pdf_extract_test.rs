//! # PDF Extraction and Pipeline Tests
//!
//! These tests build real PDFs in memory, extract them with the `pdf` crate and
//! run the quiz pipeline against a mock AI provider.

use anyhow::Result;
use mcqgen::{Difficulty, GenerationOutcome, McqGenerator, NO_TEXT_MESSAGE};
use mcqgen_pdf::{
    extract_text, extract_text_from_bytes, run_quiz_pipeline, write_scratch_pdf,
    PdfExtractError, QuizOptions,
};
use mcqgen_test_utils::{
    helpers::{
        generate_empty_pdf, generate_pdf_pages, generate_positioned_text_pdf, generate_test_pdf,
        TextItem,
    },
    MockAiProvider,
};
use std::sync::Once;

static INIT: Once = Once::new();

fn setup_tracing() {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

fn generator_with(mock: &MockAiProvider) -> Result<McqGenerator> {
    Ok(McqGenerator::builder()
        .ai_provider(Box::new(mock.clone()))
        .build()?)
}

const OPTIONS: QuizOptions = QuizOptions {
    difficulty: Difficulty::Medium,
    num_questions: 2,
};

#[test]
fn test_extracts_single_page_text() -> Result<()> {
    let pdf_data = generate_test_pdf("The magic number is 42.")?;
    let text = extract_text_from_bytes(&pdf_data)?;
    assert_eq!(text, "The magic number is 42.\n");
    Ok(())
}

#[test]
fn test_pages_are_concatenated_in_order_and_blank_pages_skipped() -> Result<()> {
    let first: &[&str] = &["Chapter one.", "Cells divide."];
    let blank: &[&str] = &[];
    let last: &[&str] = &["Chapter two."];
    let pdf_data = generate_pdf_pages(&[first, blank, last])?;

    let text = extract_text_from_bytes(&pdf_data)?;
    assert_eq!(text, "Chapter one.\nCells divide.\nChapter two.\n");
    Ok(())
}

#[test]
fn test_tj_word_gaps_become_spaces() -> Result<()> {
    let pdf_data = generate_positioned_text_pdf(&[
        TextItem::Text(b"Mitochondria"),
        TextItem::Adjust(-333.0),
        TextItem::Text(b"produce"),
        TextItem::Adjust(-333.0),
        TextItem::Text(b"ATP"),
    ])?;
    assert_eq!(extract_text_from_bytes(&pdf_data)?, "Mitochondria produce ATP\n");
    Ok(())
}

#[test]
fn test_tj_kerning_does_not_split_words() -> Result<()> {
    let pdf_data = generate_positioned_text_pdf(&[
        TextItem::Text(b"W"),
        TextItem::Adjust(80.0),
        TextItem::Text(b"A"),
        TextItem::Adjust(-40.0),
        TextItem::Text(b"VE "),
        TextItem::Adjust(-400.0),
        TextItem::Text(b"form"),
    ])?;
    assert_eq!(extract_text_from_bytes(&pdf_data)?, "WAVE form\n");
    Ok(())
}

#[test]
fn test_win_ansi_text_is_decoded() -> Result<()> {
    let pdf_data = generate_positioned_text_pdf(&[
        TextItem::Text(b"caf\xe9 "),
        TextItem::Text(b"\x93na\xefve\x94 \x96 \x80"),
    ])?;
    assert_eq!(
        extract_text_from_bytes(&pdf_data)?,
        "caf\u{e9} \u{201c}na\u{ef}ve\u{201d} \u{2013} \u{20ac}\n"
    );
    Ok(())
}

#[test]
fn test_page_text_is_kept_verbatim() -> Result<()> {
    let first: &[&str] = &["  Indented", "Trailing   "];
    let blank: &[&str] = &["   "];
    let pdf_data = generate_pdf_pages(&[first, blank])?;

    let text = extract_text_from_bytes(&pdf_data)?;
    assert_eq!(text, "  Indented\nTrailing   \n");
    Ok(())
}

#[test]
fn test_pdf_without_text_yields_empty_string() -> Result<()> {
    let text = extract_text_from_bytes(&generate_empty_pdf()?)?;
    assert!(text.is_empty());
    Ok(())
}

#[test]
fn test_garbage_bytes_fail_to_parse() {
    let err = extract_text_from_bytes(b"this is not a pdf").unwrap_err();
    assert!(matches!(err, PdfExtractError::PdfParse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_missing_file_is_reported_as_not_found() {
    setup_tracing();
    let path = std::env::temp_dir().join("mcqgen-definitely-missing.pdf");
    let err = extract_text(path.clone()).await.unwrap_err();
    assert!(matches!(err, PdfExtractError::NotFound(ref p) if *p == path));
}

#[test]
fn test_scratch_file_is_removed_on_drop() -> Result<()> {
    let scratch = write_scratch_pdf(b"%PDF-1.7")?;
    let path = scratch.path().to_path_buf();
    assert!(path.exists());
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
    assert_eq!(std::fs::read(&path)?, b"%PDF-1.7");

    drop(scratch);
    assert!(!path.exists());
    Ok(())
}

#[tokio::test]
async fn test_pipeline_sends_extracted_text_to_provider() -> Result<()> {
    setup_tracing();
    let mock = MockAiProvider::always("Question: Q1...\nQuestion: Q2...");
    let generator = generator_with(&mock)?;
    let pdf_data = generate_test_pdf("Photosynthesis converts light into chemical energy.")?;

    let report = run_quiz_pipeline(&generator, &pdf_data, OPTIONS).await?;

    assert_eq!(
        report.outcome.into_messages(),
        vec!["Question: Q1...".to_string(), "Question: Q2...".to_string()]
    );
    assert!(!report.truncated);
    assert_eq!(
        report.extracted_chars,
        "Photosynthesis converts light into chemical energy.\n".len()
    );

    let calls = mock.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0]
        .1
        .contains("Photosynthesis converts light into chemical energy."));
    assert!(calls[0].1.contains("difficulty level of Medium"));
    Ok(())
}

#[tokio::test]
async fn test_pipeline_without_text_skips_provider() -> Result<()> {
    setup_tracing();
    let mock = MockAiProvider::always("Question: unused");
    let generator = generator_with(&mock)?;

    let report = run_quiz_pipeline(&generator, &generate_empty_pdf()?, OPTIONS).await?;

    assert!(matches!(report.outcome, GenerationOutcome::NoText));
    assert_eq!(report.extracted_chars, 0);
    assert_eq!(
        report.outcome.into_messages(),
        vec![NO_TEXT_MESSAGE.to_string()]
    );
    assert!(mock.get_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_pipeline_treats_unreadable_pdf_as_no_text() -> Result<()> {
    setup_tracing();
    let mock = MockAiProvider::always("Question: unused");
    let generator = generator_with(&mock)?;

    let report = run_quiz_pipeline(&generator, b"not a pdf at all", OPTIONS).await?;

    assert!(matches!(report.outcome, GenerationOutcome::NoText));
    assert!(mock.get_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_pipeline_reports_truncation() -> Result<()> {
    setup_tracing();
    let mock = MockAiProvider::always("Question: x");
    let generator = McqGenerator::builder()
        .ai_provider(Box::new(mock.clone()))
        .max_context_chars(10)
        .build()?;
    let pdf_data = generate_test_pdf("abcdefghijklmnopqrstuvwxyz")?;

    let report = run_quiz_pipeline(&generator, &pdf_data, OPTIONS).await?;

    assert!(report.truncated);
    assert_eq!(report.extracted_chars, 27);
    let calls = mock.get_calls();
    assert!(calls[0].1.contains("abcdefghij"));
    assert!(!calls[0].1.contains("abcdefghijk"));
    Ok(())
}
