//! Physical examination.

use regex::Regex;

use super::{
    block_lines, capture_number, compile_all, first_capture, settle, ExtractionResult, SectionPattern,
};
use crate::models::PhysicalExamination;

const EXAM_HEADERS: &str =
    r"Exploraci[oó]n(?: f[ií]sica)?|Examen(?: f[ií]sico)?|Physical exam(?:ination)?|EFG|Exam";
const EXAM_STOPS: &str = r"Tratamiento|Treatment|Tx|Pruebas|Tests?|Anal[ií]tica|An[aá]lisis|Analysis|Radiograf[ií]as?|X-rays?|Ecograf[ií]as?|Ultrasound|Coprol[oó]gico|Diagn[oó]sticos?|Diagnosis|Dx|Plan|Observaciones|Observations|Vacunas?|Vaccines?";

const WEIGHT_PATTERNS: &[&str] = &[r"(?i)(\d+(?:[.,]\d+)?)[ \t]*kgs?\b"];

const TEMPERATURE_PATTERNS: &[&str] = &[
    r"(?i)(\d+(?:[.,]\d+)?)[ \t]*[°º][ \t]*C\b",
    r"(?i)\b(?:T[ªº]|Temp(?:eratura)?|Temperature)[ \t]*:?[ \t]*(\d+(?:[.,]\d+)?)",
];

const HEART_RATE_PATTERNS: &[&str] = &[r"(?i)(\d+(?:[.,]\d+)?)[ \t]*(?:lpm|ppm|bpm)\b"];

const RESPIRATORY_RATE_PATTERNS: &[&str] = &[r"(?i)(\d+(?:[.,]\d+)?)[ \t]*rpm\b"];

const MUCOUS_PATTERNS: &[&str] = &[r"(?i)\b(?:Mucosas?|Mucous membranes)[ \t]*:?[ \t]*([^\n,;]+)"];

const CRT_PATTERNS: &[&str] = &[r"(?i)\b(?:TRC|TLLC|CRT)\b[ \t]*:?[ \t]*([^\n,;]+)"];

const HYDRATION_PATTERNS: &[&str] = &[r"(?i)\b(?:Hidrataci[oó]n|Hydration)[ \t]*:?[ \t]*([^\n,;]+)"];

const CONDITION_PATTERNS: &[&str] =
    &[r"(?i)\b(?:Estado general|General condition)[ \t]*:?[ \t]*([^\n,;]+)"];

const PALPATION_PATTERNS: &[&str] =
    &[r"(?i)\b(?:Palpaci[oó]n abdominal|Abdominal palpation)[ \t]*:?[ \t]*([^\n,;]+)"];

/// Physical exam extractor.
///
/// Vitals and named findings come from the exam block. A weight written
/// anywhere in the visit fills the exam when the block had none.
pub struct PhysicalExamExtractor {
    block: SectionPattern,
    weight: Vec<Regex>,
    temperature: Vec<Regex>,
    heart_rate: Vec<Regex>,
    respiratory_rate: Vec<Regex>,
    mucous: Vec<Regex>,
    crt: Vec<Regex>,
    hydration: Vec<Regex>,
    condition: Vec<Regex>,
    palpation: Vec<Regex>,
}

impl PhysicalExamExtractor {
    pub fn new() -> ExtractionResult<Self> {
        Ok(Self {
            block: SectionPattern::new(EXAM_HEADERS, EXAM_STOPS)?,
            weight: compile_all(WEIGHT_PATTERNS)?,
            temperature: compile_all(TEMPERATURE_PATTERNS)?,
            heart_rate: compile_all(HEART_RATE_PATTERNS)?,
            respiratory_rate: compile_all(RESPIRATORY_RATE_PATTERNS)?,
            mucous: compile_all(MUCOUS_PATTERNS)?,
            crt: compile_all(CRT_PATTERNS)?,
            hydration: compile_all(HYDRATION_PATTERNS)?,
            condition: compile_all(CONDITION_PATTERNS)?,
            palpation: compile_all(PALPATION_PATTERNS)?,
        })
    }

    pub fn extract(&self, section: &str) -> Option<PhysicalExamination> {
        let mut exam = self.block.capture(section).map(|block| self.parse_block(block));

        if exam.as_ref().and_then(|e| e.weight).is_none() {
            if let Some(weight) = settle("weight", capture_number("weight", section, &self.weight)) {
                exam.get_or_insert_with(PhysicalExamination::default).weight = Some(weight);
            }
        }
        exam
    }

    fn parse_block(&self, block: &str) -> PhysicalExamination {
        PhysicalExamination {
            weight: settle("weight", capture_number("weight", block, &self.weight)),
            temperature: settle(
                "temperature",
                capture_number("temperature", block, &self.temperature),
            ),
            heart_rate: settle("heart_rate", capture_number("heart_rate", block, &self.heart_rate)),
            respiratory_rate: settle(
                "respiratory_rate",
                capture_number("respiratory_rate", block, &self.respiratory_rate),
            ),
            mucous_membranes: first_capture(block, &self.mucous),
            crt: first_capture(block, &self.crt),
            hydration_status: first_capture(block, &self.hydration),
            general_condition: first_capture(block, &self.condition),
            abdominal_palpation: first_capture(block, &self.palpation),
            findings: block_lines(block),
        }
    }
}
