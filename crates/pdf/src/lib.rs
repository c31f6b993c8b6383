//! # mcqgen-pdf: PDF Extraction and Quiz Pipeline
//!
//! This crate turns an uploaded PDF into MCQs. It provides:
//!
//! - Local text extraction with the `pdf` crate, page by page, in page order,
//!   with `TJ` word gaps kept and WinAnsi text decoded.
//! - A scoped scratch file for uploads, removed when it goes out of scope.
//! - [`run_quiz_pipeline`], which chains extraction and [`McqGenerator`].
//!
//! Extraction failures never abort the pipeline: they are logged and reported as
//! the "no text" outcome, so callers always receive a well-formed result.

use mcqgen::{Difficulty, GenerationOutcome, GenerationRequest, McqGenerator};
use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use pdf::primitive::PdfString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("The file at {0} was not found.")]
    NotFound(PathBuf),
    #[error("Failed to read PDF file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
    #[error("PDF extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

// --- Text Extraction ---

/// A `TJ` adjustment at or beyond this many thousandths of a text unit (to the
/// right) is read as a word gap rather than kerning.
const WORD_GAP_THRESHOLD: f32 = 200.0;

/// WinAnsiEncoding for bytes 0x80..=0x9F. The rest of the table matches
/// Latin-1.
const WIN_ANSI_HIGH: [char; 32] = [
    '\u{20AC}', '\u{FFFD}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{FFFD}', '\u{017D}', '\u{FFFD}',
    '\u{FFFD}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{FFFD}', '\u{017E}', '\u{0178}',
];

/// Decodes a shown string. Strings with a UTF-16 byte order mark are UTF-16BE,
/// anything else is read as WinAnsiEncoding.
fn decode_shown(drawn: &PdfString) -> String {
    let bytes = drawn.as_bytes();
    if bytes.starts_with(&[0xfe, 0xff]) {
        return drawn.to_string_lossy();
    }
    bytes
        .iter()
        .map(|&byte| match byte {
            0x80..=0x9f => WIN_ANSI_HIGH[usize::from(byte - 0x80)],
            _ => char::from(byte),
        })
        .collect()
}

/// The text drawn on one page.
///
/// Line breaks are deferred until more text follows, so the page's own text is
/// never followed by a synthetic newline.
#[derive(Default)]
struct PageText {
    text: String,
    pending_break: bool,
}

impl PageText {
    fn push(&mut self, drawn: &str) {
        if drawn.is_empty() {
            return;
        }
        if self.pending_break {
            self.text.push('\n');
            self.pending_break = false;
        }
        self.text.push_str(drawn);
    }

    fn break_line(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.pending_break = true;
        }
    }

    fn word_gap(&mut self) {
        let at_word_end = !self.text.is_empty() && !self.text.ends_with(char::is_whitespace);
        if at_word_end && !self.pending_break {
            self.text.push(' ');
        }
    }
}

/// Extracts the text of a single page's content operations.
fn page_text(operations: &[Op]) -> String {
    let mut page = PageText::default();

    for op in operations {
        match op {
            Op::TextDraw { text } => page.push(&decode_shown(text)),
            Op::TextDrawAdjusted { array } => {
                for item in array {
                    match item {
                        TextDrawAdjusted::Text(text) => page.push(&decode_shown(text)),
                        TextDrawAdjusted::Spacing(amount) if -amount >= WORD_GAP_THRESHOLD => {
                            page.word_gap()
                        }
                        TextDrawAdjusted::Spacing(_) => {}
                    }
                }
            }
            Op::TextNewline | Op::MoveTextPosition { .. } | Op::EndText => page.break_line(),
            _ => {}
        }
    }
    page.text
}

/// Extracts text from all pages of an in-memory PDF.
///
/// Each page with text contributes its text followed by a line break. Pages
/// without text are skipped with a warning.
pub fn extract_text_from_bytes(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;

        let text = match &page.contents {
            Some(content) => {
                let operations = content
                    .operations(&resolver)
                    .map_err(|e| PdfExtractError::PdfParse(e.to_string()))?;
                page_text(&operations)
            }
            None => String::new(),
        };

        if text.trim().is_empty() {
            warn!("Page {} has no extractable text.", page_num + 1);
            continue;
        }
        full_text.push_str(&text);
        full_text.push('\n');
    }

    Ok(full_text)
}

/// Reads a PDF from disk and extracts its text.
pub fn extract_text_from_file(path: &Path) -> Result<String, PdfExtractError> {
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PdfExtractError::NotFound(path.to_path_buf()),
        _ => PdfExtractError::Io(e),
    })?;
    extract_text_from_bytes(&data)
}

/// Extracts text from a PDF file on a blocking thread, as parsing is CPU-bound.
pub async fn extract_text(path: PathBuf) -> Result<String, PdfExtractError> {
    info!("Extracting text from PDF...");
    let text = tokio::task::spawn_blocking(move || extract_text_from_file(&path)).await??;
    info!(
        "Extracted text from PDF. Total length: {} characters.",
        text.chars().count()
    );
    Ok(text)
}

// --- Scratch Storage ---

/// Persists uploaded bytes to a uniquely named temporary `.pdf` file.
///
/// The file is deleted when the returned handle is dropped, on every exit path.
pub fn write_scratch_pdf(pdf_data: &[u8]) -> Result<NamedTempFile, PdfExtractError> {
    let mut scratch = tempfile::Builder::new()
        .prefix("mcqgen-upload-")
        .suffix(".pdf")
        .tempfile()?;
    scratch.write_all(pdf_data)?;
    scratch.flush()?;
    debug!(path = %scratch.path().display(), "Wrote upload to scratch file.");
    Ok(scratch)
}

// --- Pipeline Orchestration ---

/// The parameters a caller chooses for one quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOptions {
    pub difficulty: Difficulty,
    pub num_questions: u32,
}

/// The result of [`run_quiz_pipeline`], with the figures used for diagnostics.
#[derive(Debug)]
pub struct QuizReport {
    pub outcome: GenerationOutcome,
    /// Characters extracted from the document, before truncation.
    pub extracted_chars: usize,
    /// Whether the text was cut to fit the generator's context budget.
    pub truncated: bool,
}

/// Runs the full upload → extract → generate pipeline.
///
/// The upload lives in a scratch file only for the duration of extraction. An
/// extraction failure yields [`GenerationOutcome::NoText`] and the AI provider is
/// not called. The only error returned is a failure to write the scratch file.
#[instrument(skip(generator, pdf_data), fields(size = pdf_data.len()))]
pub async fn run_quiz_pipeline(
    generator: &McqGenerator,
    pdf_data: &[u8],
    options: QuizOptions,
) -> Result<QuizReport, PdfExtractError> {
    let scratch = write_scratch_pdf(pdf_data)?;

    let extracted = extract_text(scratch.path().to_path_buf()).await;
    // Release the scratch file before the (slow) provider call.
    drop(scratch);

    let text = match extracted {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF extraction failed: {e}");
            String::new()
        }
    };

    let extracted_chars = text.chars().count();
    let truncated = extracted_chars > generator.max_context_chars();
    if truncated {
        info!(
            "Document text ({} chars) exceeds the context budget of {} chars and will be truncated.",
            extracted_chars,
            generator.max_context_chars()
        );
    }

    let request = GenerationRequest::new(text, options.difficulty, options.num_questions);
    let outcome = generator.generate(&request).await;

    Ok(QuizReport {
        outcome,
        extracted_chars,
        truncated,
    })
}
