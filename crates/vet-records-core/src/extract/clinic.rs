//! Clinic identity from the document header.

use regex::Regex;

use super::{compile, compile_all, first_capture, ExtractionResult};
use crate::config::EngineConfig;
use crate::models::VeterinaryInfo;

const PHONE_PATTERNS: &[&str] = &[
    r"(?i)\b(?:tel[eé]fono|telf?|tfno|phone)\.?[ \t]*:?[ \t]*(\+?\d[\d .-]{5,}\d)",
];

/// Visit headers: `= 08/12/19`, `Visita 2`, `VISITA DEL DIA ...`, `VISIT ON ...`
const VISIT_HEADER_LINE: &str = r"(?i)^(?:[=-]\s*\d|(?:visita|consulta|visit|consultation)\s+\d|visita\b.*\bdel\s+d[ií]a\b|visit\s+on\b)";

/// `Label: value` lines such as `Paciente: Kira` or `Tel: 955 123 456`
const FIELD_LINE: &str = r"^\p{L}[\p{L} .]{0,30}:(?:\s|$)";

/// Clinic extractor.
///
/// The first qualifying header line is the clinic name, the second its address.
/// Visit headers and labeled fields never qualify.
pub struct ClinicExtractor {
    header_lines: usize,
    skip_keywords: Vec<String>,
    visit_header: Regex,
    field: Regex,
    phone_patterns: Vec<Regex>,
}

impl ClinicExtractor {
    pub fn new(config: &EngineConfig) -> ExtractionResult<Self> {
        Ok(Self {
            header_lines: config.clinic_header_lines,
            skip_keywords: config
                .clinic_skip_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            visit_header: compile(VISIT_HEADER_LINE)?,
            field: compile(FIELD_LINE)?,
            phone_patterns: compile_all(PHONE_PATTERNS)?,
        })
    }

    pub fn extract(&self, text: &str) -> VeterinaryInfo {
        let mut header = text
            .split('\n')
            .take(self.header_lines)
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.is_skipped(line));

        VeterinaryInfo {
            clinic_name: header.next().map(str::to_string),
            clinic_address: header.next().map(str::to_string),
            clinic_phone: first_capture(text, &self.phone_patterns),
        }
    }

    fn is_skipped(&self, line: &str) -> bool {
        if self.visit_header.is_match(line) || self.field.is_match(line) {
            return true;
        }
        let lower = line.to_lowercase();
        self.skip_keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}
