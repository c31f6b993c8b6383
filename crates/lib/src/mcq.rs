//! # MCQ Response Parsing
//!
//! The AI provider returns one free-form string. This module splits it into
//! [`McqRecord`]s on the literal [`QUESTION_MARKER`], which is the entire output
//! contract the prompt asks the model to honour.
//!
//! Records are kept as undifferentiated text. [`McqFieldParser`] offers an
//! optional best-effort structured view of a record; a record that does not
//! follow the template still parses, just with missing fields.

use crate::errors::PromptError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The delimiter that starts every question in the model output.
pub const QUESTION_MARKER: &str = "Question:";

/// One question block, starting with [`QUESTION_MARKER`] and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct McqRecord(String);

impl McqRecord {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for McqRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for McqRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Splits a raw model response into question records.
///
/// Every fragment following a marker becomes one record with the marker
/// re-attached. Whatever precedes the first marker is preamble and is dropped,
/// as are fragments that are blank after trimming. A response without the
/// marker yields an empty list.
pub fn parse_mcq_output(raw: &str) -> Vec<McqRecord> {
    raw.split(QUESTION_MARKER)
        .skip(1)
        .filter(|part| !part.trim().is_empty())
        .map(|part| McqRecord(format!("{QUESTION_MARKER}{part}").trim().to_string()))
        .collect()
}

/// A structured view of an [`McqRecord`]. Fields the model omitted are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqFields {
    pub question: Option<String>,
    /// Option letter (`"A"`..`"D"`) to option text.
    pub options: BTreeMap<String, String>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
    pub difficulty: Option<String>,
    pub topic: Option<String>,
}

/// Extracts [`McqFields`] from records that follow the prompt template.
#[derive(Debug, Clone)]
pub struct McqFieldParser {
    label_re: Regex,
    option_re: Regex,
    answer_re: Regex,
}

impl McqFieldParser {
    pub fn new() -> Result<Self, PromptError> {
        Ok(Self {
            label_re: Regex::new(
                r"(?m)^[ \t]*(Question|Options|Answer|Explanation|Difficulty|Topic)[ \t]*:",
            )?,
            option_re: Regex::new(r"(?m)^[ \t]*([A-Da-d])[.)][ \t]*")?,
            answer_re: Regex::new(r"^\(?([A-Da-d])\b")?,
        })
    }

    /// Parses the labelled sections of a record.
    ///
    /// A label's value runs until the next label at the start of a line. The first
    /// occurrence of each label wins.
    pub fn parse(&self, record: &str) -> McqFields {
        let labels: Vec<(&str, usize, usize)> = self
            .label_re
            .captures_iter(record)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?.as_str();
                Some((name, whole.start(), whole.end()))
            })
            .collect();

        let mut sections: BTreeMap<&str, &str> = BTreeMap::new();
        for (idx, (name, _, value_start)) in labels.iter().enumerate() {
            let value_end = labels
                .get(idx + 1)
                .map(|(_, next_start, _)| *next_start)
                .unwrap_or(record.len());
            sections
                .entry(*name)
                .or_insert_with(|| record[*value_start..value_end].trim());
        }

        let non_empty = |name: &str| {
            sections
                .get(name)
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string())
        };

        McqFields {
            question: non_empty("Question"),
            options: sections
                .get("Options")
                .map(|block| self.parse_options(block))
                .unwrap_or_default(),
            answer: sections.get("Answer").and_then(|value| {
                self.answer_re
                    .captures(value)
                    .and_then(|caps| caps.get(1))
                    .map(|letter| letter.as_str().to_uppercase())
            }),
            explanation: non_empty("Explanation"),
            difficulty: non_empty("Difficulty"),
            topic: non_empty("Topic"),
        }
    }

    fn parse_options(&self, block: &str) -> BTreeMap<String, String> {
        let markers: Vec<(String, usize, usize)> = self
            .option_re
            .captures_iter(block)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let letter = caps.get(1)?.as_str().to_uppercase();
                Some((letter, whole.start(), whole.end()))
            })
            .collect();

        let mut options = BTreeMap::new();
        for (idx, (letter, _, text_start)) in markers.iter().enumerate() {
            let text_end = markers
                .get(idx + 1)
                .map(|(_, next_start, _)| *next_start)
                .unwrap_or(block.len());
            let text = block[*text_start..text_end].trim();
            if !text.is_empty() {
                options.entry(letter.clone()).or_insert_with(|| text.to_string());
            }
        }
        options
    }
}
