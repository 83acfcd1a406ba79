//! Laboratory and imaging tests.

use regex::Regex;

use super::{compile, settle, ExtractionError, ExtractionResult, FieldResult};
use crate::models::{LaboratoryTest, TestResults};
use crate::normalizer::parse_date;

const TEST_KEYWORDS: &str = r"Stool analysis|Tests?|Anal[ií]tica|An[aá]lisis|Analysis|Radiograf[ií]as?|X-rays?|Ecograf[ií]as?|Ultrasound|Coprol[oó]gico";

const TEST_DATE_PATTERN: &str = r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}";

/// Plural headers that introduce a list of tests rather than name one.
const GROUP_HEADER_PATTERN: &str = r"(?i)^(?:Tests|Pruebas)$";

/// Lab test extractor. Every keyword match yields one [`LaboratoryTest`].
pub struct LabTestExtractor {
    line: Regex,
    /// A results line that is itself a labeled test
    nested: Regex,
    group: Regex,
    date: Regex,
}

impl LabTestExtractor {
    pub fn new() -> ExtractionResult<Self> {
        Ok(Self {
            line: compile(&format!(
                r"(?i)\b(?P<name>(?:{TEST_KEYWORDS})\b[^:\n]*?)[ \t]*[:\n][ \t]*(?P<results>[^\n]*)"
            ))?,
            nested: compile(&format!(r"(?i)^[-*•\s]*(?:{TEST_KEYWORDS})\b[^:\n]*:"))?,
            group: compile(GROUP_HEADER_PATTERN)?,
            date: compile(TEST_DATE_PATTERN)?,
        })
    }

    pub fn extract(&self, section: &str) -> Vec<LaboratoryTest> {
        let mut tests = Vec::new();
        let mut at = 0;

        while let Some(caps) = self.line.captures_at(section, at) {
            let (Some(whole), Some(label)) = (caps.get(0), caps.name("name")) else {
                break;
            };
            let results = caps.name("results");
            let text = results.map(|m| m.as_str().trim()).unwrap_or("");

            if self.nested.is_match(text) {
                // the label heads a list; resume at its first entry
                at = results.map_or(whole.end(), |m| m.start());
                continue;
            }
            if !(text.is_empty() && self.group.is_match(label.as_str().trim())) {
                tests.push(self.build(label.as_str(), text));
            }
            at = whole.end();
        }
        tests
    }

    /// A date written in the test label becomes the test date.
    fn build(&self, label: &str, results: &str) -> LaboratoryTest {
        let date = self.date.find(label);
        let test_name = match date {
            Some(m) => format!("{} {}", &label[..m.start()], &label[m.end()..]),
            None => label.to_string(),
        };
        let test_date = date.and_then(|m| settle("test_date", date_field(m.as_str())));

        LaboratoryTest {
            test_name: test_name.split_whitespace().collect::<Vec<_>>().join(" "),
            test_date,
            results: (!results.is_empty()).then(|| TestResults::Text(results.to_string())),
            findings: Vec::new(),
        }
    }
}

fn date_field(raw: &str) -> FieldResult<chrono::NaiveDate> {
    parse_date(raw)
        .map(Some)
        .ok_or_else(|| ExtractionError::InvalidDateFormat(raw.to_string()))
}
