//! Field extractors.
//!
//! Every extractor reports through [`FieldResult`]: `Ok(None)` is an ordinary
//! miss, `Err` is a failure that gets logged and collapsed to `None` by
//! [`settle`] so the rest of the document keeps extracting.

mod clinic;
mod exam;
mod lab;
mod medication;
mod pet;
mod vaccination;
mod visit;

pub use clinic::*;
pub use exam::*;
pub use lab::*;
pub use medication::*;
pub use pet::*;
pub use vaccination::*;
pub use visit::*;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ConfigError;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Extraction engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Extractor for {field} failed: {cause}")]
    SubExtractor { field: &'static str, cause: String },

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<regex::Error> for ExtractionError {
    fn from(e: regex::Error) -> Self {
        ExtractionError::EngineUnavailable(e.to_string())
    }
}

impl From<vet_records_ner::AnnotateError> for ExtractionError {
    fn from(e: vet_records_ner::AnnotateError) -> Self {
        ExtractionError::EngineUnavailable(e.to_string())
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Outcome of a single field extractor.
pub type FieldResult<T> = ExtractionResult<Option<T>>;

/// Collapse a field result to an optional value, logging failures.
pub fn settle<T>(field: &'static str, result: FieldResult<T>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(ExtractionError::InvalidDateFormat(raw)) => {
            debug!(field, raw = %raw, "unparsable date, leaving field empty");
            None
        }
        Err(e) => {
            warn!(field, error = %e, "field extractor failed, leaving field empty");
            None
        }
    }
}

/// Compile a pattern; failures make the engine unavailable.
pub(crate) fn compile(pattern: &str) -> ExtractionResult<Regex> {
    Ok(Regex::new(pattern)?)
}

pub(crate) fn compile_all(patterns: &[&str]) -> ExtractionResult<Vec<Regex>> {
    patterns.iter().map(|p| compile(p)).collect()
}

/// First capture group of the first pattern that yields a non-empty value.
pub(crate) fn first_capture(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        let caps = re.captures(text)?;
        let value = caps.get(1)?.as_str().trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Parse the first capture of `patterns` as a decimal-comma-tolerant number.
pub(crate) fn capture_number(field: &'static str, text: &str, patterns: &[Regex]) -> FieldResult<f64> {
    let Some(raw) = first_capture(text, patterns) else {
        return Ok(None);
    };
    crate::normalizer::parse_decimal(&raw)
        .map(Some)
        .map_err(|e| ExtractionError::SubExtractor {
            field,
            cause: format!("{raw:?}: {e}"),
        })
}

/// A labeled block: a header keyword followed by `:` or a line break, running
/// until the next stop-header or the end of the text.
pub(crate) struct SectionPattern {
    regex: Regex,
}

impl SectionPattern {
    /// `headers` and `stops` are regex alternations, matched case-insensitively
    /// on word boundaries. An empty `stops` captures to the end of the text.
    pub(crate) fn new(headers: &str, stops: &str) -> ExtractionResult<Self> {
        let pattern = if stops.is_empty() {
            format!(r"(?is)\b(?:{headers})[ \t]*[:\n](.*)")
        } else {
            format!(r"(?is)\b(?:{headers})[ \t]*[:\n](.*?)(?:\b(?:{stops})\b|\z)")
        };
        Ok(Self {
            regex: compile(&pattern)?,
        })
    }

    /// Trimmed block text, `None` when the header is absent or the block is blank.
    pub(crate) fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let block = self.regex.captures(text)?.get(1)?.as_str().trim();
        (!block.is_empty()).then_some(block)
    }
}

/// Strip list markers and surrounding whitespace from a line.
pub(crate) fn strip_bullet(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '•'))
}

/// Every non-empty line of a block, bullet-stripped.
pub(crate) fn block_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
