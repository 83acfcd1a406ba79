//! Pet identity from the whole document.

use regex::Regex;
use tracing::debug;
use vet_records_ner::{first_with_label, Label, Span};

use super::{compile_all, first_capture, settle, ExtractionError, ExtractionResult, FieldResult};
use crate::models::PetInfo;
use crate::normalizer::{parse_date_with, parse_decimal, Normalizer, BIRTH_DATE_FORMAT};

const NAME_PATTERNS: &[&str] = &[
    r"(?im)\b(?:Nombre|Paciente|Mascota|Name|Patient|Pet)[ \t]*:\s*(\p{L}+)",
    r"(?im)^(\p{L}+)\s*[-–]\s*(?:perro|perra|gato|gata|conejo|dog|cat|rabbit)\b",
    r"(?im)^(\p{Lu}+)\s*-\s*(?:Nacimiento|Birth)",
];

const SPECIES_PATTERNS: &[&str] = &[
    r"(?i)\b(?:Especie|Species)[ \t]*:\s*(\p{L}+)",
    r"(?i)\b(perro|perra|gato|gata|conejo|hurón|loro|dog|cat|rabbit)\b",
    r"(?i)\b(CANINA|CANINO|FELINA|FELINO)\b",
];

const BREED_PATTERNS: &[&str] = &[
    r"(?i)\b(?:Raza|Breed)[ \t]*:[ \t]*([^\n]+)",
    r"(?i)\b(?:CANINA|FELINA)[ \t]*-[ \t]*([^\n]+)",
];

const BIRTH_DATE_PATTERNS: &[&str] = &[
    r"(?i)\b(?:Fecha de nacimiento|Nacimiento|Date of birth|Birth date|Birth)[ \t]*:\s*(\d{2}/\d{2}/\d{4})",
];

const SEX_PATTERNS: &[&str] = &[r"(?i)\b(?:Sexo|Sex)[ \t]*:\s*(\w+)"];

const STATUS_PATTERNS: &[&str] = &[r"(?i)\b(?:Estado reproductivo|Estado|Status)[ \t]*:\s*(\w+)"];

const MICROCHIP_PATTERNS: &[&str] = &[
    r"(?i)\b(?:Microchip|Chip)[ \t]*:[ \t]*(\d[\d ]*\d)",
    r"(?i)\b(?:Microchip|Chip)[ \t]*:[ \t]*([0-9A-Z]+)",
];

const HAIR_PATTERNS: &[&str] = &[r"(?i)\b(?:Pelo|Hair)[ \t]*:\s*(\w+)"];

const COAT_PATTERNS: &[&str] = &[r"(?i)\b(?:Capa|Coat|Color)[ \t]*:\s*(\w+)"];

/// Pet info extractor.
pub struct PetInfoExtractor {
    normalizer: Normalizer,
    name: Vec<Regex>,
    species: Vec<Regex>,
    breed: Vec<Regex>,
    birth_date: Vec<Regex>,
    sex: Vec<Regex>,
    status: Vec<Regex>,
    microchip: Vec<Regex>,
    hair: Vec<Regex>,
    coat: Vec<Regex>,
}

impl PetInfoExtractor {
    pub fn new() -> ExtractionResult<Self> {
        Ok(Self {
            normalizer: Normalizer::new(),
            name: compile_all(NAME_PATTERNS)?,
            species: compile_all(SPECIES_PATTERNS)?,
            breed: compile_all(BREED_PATTERNS)?,
            birth_date: compile_all(BIRTH_DATE_PATTERNS)?,
            sex: compile_all(SEX_PATTERNS)?,
            status: compile_all(STATUS_PATTERNS)?,
            microchip: compile_all(MICROCHIP_PATTERNS)?,
            hair: compile_all(HAIR_PATTERNS)?,
            coat: compile_all(COAT_PATTERNS)?,
        })
    }

    /// Extract pet identity. `spans` are the document's annotations.
    pub fn extract(&self, spans: &[Span], text: &str) -> PetInfo {
        PetInfo {
            name: self.name(spans, text),
            species: self.species(spans, text),
            breed: first_capture(text, &self.breed),
            birth_date: settle("birth_date", self.birth_date(text)),
            sex: first_capture(text, &self.sex),
            reproductive_status: first_capture(text, &self.status),
            weight: settle("pet_weight", self.weight(spans)),
            microchip: first_capture(text, &self.microchip),
            hair_type: first_capture(text, &self.hair),
            coat_color: first_capture(text, &self.coat),
        }
    }

    /// Annotated name header first, then the regex templates.
    fn name(&self, spans: &[Span], text: &str) -> Option<String> {
        let annotated = spans
            .iter()
            .filter(|s| s.label == Label::PetName)
            .map(|s| s.value_or_text().trim())
            .find(|v| !v.is_empty());

        if let Some(name) = annotated {
            return Some(name.to_string());
        }
        first_capture(text, &self.name)
    }

    /// Annotated species term first, then the regex fallbacks; always canonicalized.
    fn species(&self, spans: &[Span], text: &str) -> Option<String> {
        let raw = first_with_label(spans, Label::Species)
            .map(|s| s.text.clone())
            .or_else(|| first_capture(text, &self.species))?;
        let canonical = self.normalizer.canonicalize_species(&raw);
        debug!(raw = %raw, canonical = %canonical, "species");
        Some(canonical)
    }

    fn birth_date(&self, text: &str) -> FieldResult<chrono::NaiveDate> {
        let Some(raw) = first_capture(text, &self.birth_date) else {
            return Ok(None);
        };
        parse_date_with(&raw, &[BIRTH_DATE_FORMAT])
            .map(Some)
            .ok_or(ExtractionError::InvalidDateFormat(raw))
    }

    fn weight(&self, spans: &[Span]) -> FieldResult<f64> {
        let Some(span) = first_with_label(spans, Label::Weight) else {
            return Ok(None);
        };
        let raw = span.value_or_text();
        parse_decimal(raw)
            .map(Some)
            .map_err(|e| ExtractionError::SubExtractor {
                field: "pet_weight",
                cause: format!("{raw:?}: {e}"),
            })
    }
}
