//! Annotation rule tables.
//!
//! Vocabularies cover the Spanish terms found in clinic exports plus their
//! English equivalents.

use serde::{Deserialize, Serialize};

/// Entity label attached to an annotated span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Species,
    Symptom,
    Medication,
    PetName,
    Weight,
    Date,
}

/// How a rule matches text.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Whole-word, case-insensitive match against any listed term.
    Keywords(&'static [&'static str]),
    /// Regular expression. A named group `value` becomes the span value.
    Pattern(&'static str),
}

/// A single annotation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub label: Label,
    pub kind: RuleKind,
}

impl Rule {
    pub const fn keywords(label: Label, terms: &'static [&'static str]) -> Self {
        Self {
            label,
            kind: RuleKind::Keywords(terms),
        }
    }

    pub const fn pattern(label: Label, pattern: &'static str) -> Self {
        Self {
            label,
            kind: RuleKind::Pattern(pattern),
        }
    }
}

/// Species vocabulary.
pub const SPECIES_TERMS: &[&str] = &[
    "perro", "perra", "gato", "gata", "conejo", "hurón", "loro", "dog", "cat", "rabbit",
    "ferret", "parrot",
];

/// Symptom vocabulary.
pub const SYMPTOM_TERMS: &[&str] = &[
    "vómitos",
    "vomitos",
    "diarrea",
    "fiebre",
    "tos",
    "cojera",
    "decaimiento",
    "inapetencia",
    "vomiting",
    "diarrhea",
    "fever",
    "cough",
    "lameness",
    "lethargy",
];

/// Medication vocabulary.
pub const MEDICATION_TERMS: &[&str] = &[
    "amoxicilina",
    "meloxicam",
    "prednisona",
    "metronidazol",
    "enrofloxacino",
    "amoxicillin",
    "prednisone",
    "metronidazole",
    "enrofloxacin",
];

/// Label token, punctuation, then one or more alphabetic tokens on the same line.
pub const PET_NAME_PATTERN: &str = r"(?i)\b(?:nombre|paciente|name|patient)[ \t]*[[:punct:]][ \t]*(?P<value>\p{Alphabetic}+(?:[ \t]+\p{Alphabetic}+)*)";

/// `Peso: 4,1 kg` style weight expressions.
pub const WEIGHT_PATTERN: &str =
    r"(?i)\b(?:peso|weight)[ \t]*[[:punct:]][ \t]*(?P<value>\d+(?:[.,]\d+)?)[ \t]*(?:kgs?|kilos)\b";

/// `Fecha: 08/12/2019` style date headers.
pub const DATE_PATTERN: &str =
    r"(?i)\b(?:fecha|date)[ \t]*[[:punct:]][ \t]*(?P<value>\d{2}[/-]\d{2}[/-]\d{4})\b";

/// The default rule table.
pub const DEFAULT_RULES: &[Rule] = &[
    Rule::keywords(Label::Species, SPECIES_TERMS),
    Rule::keywords(Label::Symptom, SYMPTOM_TERMS),
    Rule::keywords(Label::Medication, MEDICATION_TERMS),
    Rule::pattern(Label::PetName, PET_NAME_PATTERN),
    Rule::pattern(Label::Weight, WEIGHT_PATTERN),
    Rule::pattern(Label::Date, DATE_PATTERN),
];
