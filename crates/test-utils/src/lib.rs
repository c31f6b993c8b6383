use async_trait::async_trait;
use mcqgen::errors::PromptError;
use mcqgen::providers::ai::AiProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

/// An in-process AI provider that records every call.
///
/// Responses are keyed by a substring of the user prompt, so one mock can serve
/// several documents. When no key matches, the fallback response is used, and
/// without a fallback the call fails like an unreachable provider would.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    fallback: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that answers every prompt with `response`.
    pub fn always(response: &str) -> Self {
        let mock = Self::new();
        mock.set_fallback(response);
        mock
    }

    /// Pre-programs a response for prompts whose user prompt contains `key`.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    pub fn set_fallback(&self, response: &str) {
        *self.fallback.lock().unwrap() = Some(response.to_string());
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if user_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        self.fallback.lock().unwrap().clone().ok_or_else(|| {
            PromptError::AiApi("MockAiProvider: No response programmed for prompt.".to_string())
        })
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod helpers {
    use anyhow::Result;
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    const FONT_NAME: Name<'static> = Name(b"F1");

    /// One element of a `TJ` array: raw string bytes or a spacing adjustment in
    /// thousandths of a text unit.
    #[derive(Debug, Clone, Copy)]
    pub enum TextItem<'a> {
        Text(&'a [u8]),
        Adjust(f32),
    }

    /// Assembles a document with one page per content stream. Every page uses a
    /// Helvetica with WinAnsiEncoding as `F1`.
    fn build_pdf(contents: Vec<Content>) -> Result<Vec<u8>> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let mut next_id = 4;

        let page_ids: Vec<(Ref, Ref)> = contents
            .iter()
            .map(|_| {
                let ids = (Ref::new(next_id), Ref::new(next_id + 1));
                next_id += 2;
                ids
            })
            .collect();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(i32::try_from(contents.len())?);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        for ((page_id, content_id), content) in page_ids.iter().zip(contents) {
            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
            page.parent(page_tree_id);
            page.contents(*content_id);
            page.resources().fonts().pair(FONT_NAME, font_id);
            page.finish();

            pdf.stream(*content_id, &content.finish());
        }

        Ok(pdf.finish())
    }

    /// Builds a PDF with one page per entry of `pages`, each page showing its
    /// lines in Helvetica. An empty line list produces a page without text.
    pub fn generate_pdf_pages(pages: &[&[&str]]) -> Result<Vec<u8>> {
        let contents = pages
            .iter()
            .map(|lines| {
                let mut content = Content::new();
                if !lines.is_empty() {
                    content.begin_text();
                    content.set_font(FONT_NAME, 12.0);
                    content.next_line(72.0, 770.0);
                    for (idx, line) in lines.iter().enumerate() {
                        if idx > 0 {
                            content.next_line(0.0, -16.0);
                        }
                        content.show(Str(line.as_bytes()));
                    }
                    content.end_text();
                }
                content
            })
            .collect();
        build_pdf(contents)
    }

    /// Generates a single-page PDF showing `text` on one line.
    pub fn generate_test_pdf(text: &str) -> Result<Vec<u8>> {
        let lines: &[&str] = &[text];
        generate_pdf_pages(&[lines])
    }

    /// Generates a single-page PDF with no text at all, like a scanned image.
    pub fn generate_empty_pdf() -> Result<Vec<u8>> {
        let lines: &[&str] = &[];
        generate_pdf_pages(&[lines])
    }

    /// Generates a single-page PDF that draws `items` with one `TJ` operator,
    /// the way typesetters such as LaTeX position words.
    pub fn generate_positioned_text_pdf(items: &[TextItem]) -> Result<Vec<u8>> {
        let mut content = Content::new();
        content.begin_text();
        content.set_font(FONT_NAME, 12.0);
        content.next_line(72.0, 770.0);
        {
            let mut shown = content.show_positioned();
            let mut array = shown.items();
            for item in items {
                match *item {
                    TextItem::Text(bytes) => array.show(Str(bytes)),
                    TextItem::Adjust(amount) => array.adjust(amount),
                };
            }
        }
        content.end_text();
        build_pdf(vec![content])
    }
}
