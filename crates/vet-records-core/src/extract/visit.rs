//! Per-visit extractor chain.

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::debug;

use super::{
    block_lines, compile_all, first_capture, settle, ExtractionError, ExtractionResult, FieldResult,
    LabTestExtractor, PhysicalExamExtractor, SectionPattern, TreatmentExtractor,
    VaccinationExtractor,
};
use crate::models::Visit;
use crate::normalizer::{parse_date, parse_time};
use crate::segmenter::VisitSection;

const REASON_PATTERNS: &[&str] = &[
    r"(?i)\b(?:Motivo(?: de (?:la )?consulta)?|Raz[oó]n|Consulta por|Reason(?: for visit)?)[ \t]*:[ \t]*([^\n]+)",
    r"(?i)\b(?:Consulta|Consultation)[ \t]*:[ \t]*([^\n]+)",
    r"(?i)\bAcude (?:a consulta )?(?:para|por|de)[ \t]*([^\n.]+)",
    r"(?i)\bComes in (?:for|because of)[ \t]*([^\n.]+)",
    r"(?i)\bVienen? de urgencias porque[ \t]*([^\n.]+)",
];

const ANAMNESIS_HEADERS: &str = r"Anamnesis|History";
const ANAMNESIS_STOPS: &str = r"Exploraci[oó]n|Examen|Exam|Physical exam|EFG|Tratamiento|Treatment|Pruebas|Tests?|Diagn[oó]sticos?|Diagnosis";

const DIAGNOSIS_HEADERS: &str = r"Diagn[oó]sticos?|Diagnosis|Dx";
const DIAGNOSIS_STOPS: &str = r"Tratamiento|Treatment|Tx|Receta|Prescription|Plan|Observaciones|Observations|Vacunas?|Vaccines?|Pruebas|Tests?|Anal[ií]tica|An[aá]lisis|Analysis|Radiograf[ií]as?|X-rays?|Ecograf[ií]as?|Ultrasound|Coprol[oó]gico";

const PLAN_HEADERS: &str = r"Plan|Revisi[oó]n|Follow-up";
const PLAN_STOPS: &str = r"Observaciones|Observations";

const OBSERVATION_HEADERS: &str = r"Observaciones|Observations";

/// Runs every per-visit field extractor over one visit section.
pub struct VisitExtractor {
    reason: Vec<Regex>,
    anamnesis: SectionPattern,
    diagnosis: SectionPattern,
    plan: SectionPattern,
    observations: SectionPattern,
    exam: PhysicalExamExtractor,
    treatment: TreatmentExtractor,
    labs: LabTestExtractor,
    vaccinations: VaccinationExtractor,
}

impl VisitExtractor {
    pub fn new() -> ExtractionResult<Self> {
        Ok(Self {
            reason: compile_all(REASON_PATTERNS)?,
            anamnesis: SectionPattern::new(ANAMNESIS_HEADERS, ANAMNESIS_STOPS)?,
            diagnosis: SectionPattern::new(DIAGNOSIS_HEADERS, DIAGNOSIS_STOPS)?,
            plan: SectionPattern::new(PLAN_HEADERS, PLAN_STOPS)?,
            observations: SectionPattern::new(OBSERVATION_HEADERS, "")?,
            exam: PhysicalExamExtractor::new()?,
            treatment: TreatmentExtractor::new()?,
            labs: LabTestExtractor::new()?,
            vaccinations: VaccinationExtractor::new()?,
        })
    }

    /// Build a visit from its section, or `None` when the section carries no
    /// clinical content.
    pub fn extract(&self, section: &VisitSection<'_>) -> Option<Visit> {
        let text = section.text;
        let visit = Visit {
            visit_date: settle("visit_date", self.visit_date(section)),
            reason: first_capture(text, &self.reason),
            anamnesis: self.anamnesis.capture(text).map(str::to_string),
            physical_examination: self.exam.extract(text),
            diagnosis: self.diagnosis.capture(text).map(block_lines).unwrap_or_default(),
            treatment: self.treatment.extract(text),
            plan: self.plan.capture(text).map(str::to_string),
            laboratory_tests: self.labs.extract(text),
            vaccinations: self.vaccinations.extract(text),
            observations: self.observations.capture(text).map(str::to_string),
            ..Default::default()
        };

        if !visit.has_clinical_content() {
            debug!(
                at = section.boundary.start,
                kind = ?section.boundary.kind,
                "visit section has no clinical content, discarding"
            );
            return None;
        }
        Some(visit)
    }

    /// Header date with its time, midnight when the header had none.
    fn visit_date(&self, section: &VisitSection<'_>) -> FieldResult<NaiveDateTime> {
        let Some(raw) = section.boundary.date.as_deref() else {
            return Ok(None);
        };
        let date = parse_date(raw).ok_or_else(|| ExtractionError::InvalidDateFormat(raw.to_string()))?;
        let time = section
            .boundary
            .time
            .as_deref()
            .and_then(parse_time)
            .unwrap_or(NaiveTime::MIN);
        Ok(Some(date.and_time(time)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::VisitSegmenter;
    use chrono::NaiveDate;

    fn visits(text: &str) -> Vec<Visit> {
        let segmenter = VisitSegmenter::new().unwrap();
        let extractor = VisitExtractor::new().unwrap();
        segmenter
            .sections(text)
            .iter()
            .filter_map(|s| extractor.extract(s))
            .collect()
    }

    #[test]
    fn test_date_time_header() {
        let visits = visits("= 08/12/19 - 16:12 -\nMotivo: vomitos\nPeso: 4.1 kg");

        assert_eq!(visits.len(), 1);
        let expected = NaiveDate::from_ymd_opt(2019, 12, 8)
            .unwrap()
            .and_hms_opt(16, 12, 0)
            .unwrap();
        assert_eq!(visits[0].visit_date, Some(expected));
        assert_eq!(visits[0].reason.as_deref(), Some("vomitos"));
        assert_eq!(
            visits[0].physical_examination.as_ref().and_then(|e| e.weight),
            Some(4.1)
        );
    }

    #[test]
    fn test_full_visit() {
        let text = "VISITA DEL DIA 10/12/2019\n\
                    Motivo de consulta: cojera extremidad posterior\n\
                    Anamnesis: cojea desde hace 3 días\n\
                    Exploración: 38,5 ºC, dolor en rodilla\n\
                    Diagnóstico:\n- Rotura ligamento cruzado\n- Sobrepeso\n\
                    Tratamiento:\n- Meloxicam\n\
                    Plan: revisión en 15 días\n\
                    Observaciones: propietario colaborador";
        let visits = visits(text);
        assert_eq!(visits.len(), 1);
        let visit = &visits[0];

        assert_eq!(
            visit.visit_date.map(|d| d.date()),
            NaiveDate::from_ymd_opt(2019, 12, 10)
        );
        assert_eq!(visit.visit_date.map(|d| d.time()), Some(NaiveTime::MIN));
        assert_eq!(visit.reason.as_deref(), Some("cojera extremidad posterior"));
        assert_eq!(visit.anamnesis.as_deref(), Some("cojea desde hace 3 días"));
        assert_eq!(visit.physical_examination.as_ref().and_then(|e| e.temperature), Some(38.5));
        assert_eq!(visit.diagnosis, vec!["Rotura ligamento cruzado", "Sobrepeso"]);
        assert_eq!(visit.treatment.len(), 1);
        assert_eq!(visit.treatment[0].name, "Meloxicam");
        assert_eq!(visit.plan.as_deref(), Some("revisión en 15 días"));
        assert_eq!(visit.observations.as_deref(), Some("propietario colaborador"));
    }

    #[test]
    fn test_empty_sections_are_discarded() {
        let visits = visits("= 01/02/2020\nsin incidencias\n= 03/02/2020\nMotivo: control");
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].reason.as_deref(), Some("control"));
    }

    #[test]
    fn test_vaccination_only_visit_is_discarded() {
        assert!(visits("= 01/02/2020\nVacuna: Rabia 01/02/2020").is_empty());
    }

    #[test]
    fn test_english_visit_with_tests() {
        let text = "VISIT ON 08/12/2019\nReason: cough\n\
                    Ultrasound: normal\nAnalysis: ok\nTest: negative\n\
                    Stool analysis: clean\nX-ray: clear";
        let visits = visits(text);

        assert_eq!(visits.len(), 1);
        assert_eq!(
            visits[0].visit_date.map(|d| d.date()),
            NaiveDate::from_ymd_opt(2019, 12, 8)
        );
        assert_eq!(visits[0].reason.as_deref(), Some("cough"));
        let names: Vec<&str> = visits[0]
            .laboratory_tests
            .iter()
            .map(|t| t.test_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ultrasound", "Analysis", "Test", "Stool analysis", "X-ray"]);
    }

    #[test]
    fn test_tests_header_alone_is_discarded() {
        assert!(visits("= 01/02/2020\nPruebas:").is_empty());
        assert!(visits("= 01/02/2020\nTests:").is_empty());
    }

    #[test]
    fn test_plan_only_visit_is_kept() {
        let visits = visits("= 01/02/2020\nPlan: dieta blanda");
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].plan.as_deref(), Some("dieta blanda"));
        assert_eq!(visits[0].treatment.len(), 1);
        assert_eq!(visits[0].treatment[0].name, "dieta blanda");
    }

    #[test]
    fn test_follow_up_only_visit_is_discarded() {
        assert!(visits("= 01/02/2020\nRevisión: en 15 días").is_empty());
    }

    #[test]
    fn test_numbered_visit_has_no_date() {
        let visits = visits("Visita 2\nReason: cough");
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].visit_date, None);
        assert_eq!(visits[0].reason.as_deref(), Some("cough"));
    }

    #[test]
    fn test_invalid_header_date_keeps_visit() {
        let visits = visits("= 31/02/2020\nMotivo: tos");
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].visit_date, None);
    }
}
