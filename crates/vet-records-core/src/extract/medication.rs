//! Treatment lists.

use super::{block_lines, ExtractionResult, SectionPattern};
use crate::models::Medication;

const TREATMENT_HEADERS: &str = r"Tratamiento|Treatment|Tx|Receta|Prescription|Plan";
const TREATMENT_STOPS: &str = r"Plan|Revisi[oó]n|Follow-up|Observaciones|Observations|Vacunas?|Vaccines?|Pruebas|Tests?|Anal[ií]tica|An[aá]lisis|Analysis|Radiograf[ií]as?|X-rays?|Ecograf[ií]as?|Ultrasound|Coprol[oó]gico";

/// Treatment extractor: one [`Medication`] per line of the treatment block.
pub struct TreatmentExtractor {
    block: SectionPattern,
}

impl TreatmentExtractor {
    pub fn new() -> ExtractionResult<Self> {
        Ok(Self {
            block: SectionPattern::new(TREATMENT_HEADERS, TREATMENT_STOPS)?,
        })
    }

    pub fn extract(&self, section: &str) -> Vec<Medication> {
        self.block
            .capture(section)
            .map(block_lines)
            .unwrap_or_default()
            .into_iter()
            .map(Medication::named)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_medication_per_line() {
        let section = "Tratamiento:\n- Meloxicam 0,1 mg/kg cada 24h\n- Dieta gastrointestinal\nRevisión en 7 días";
        let treatment = TreatmentExtractor::new().unwrap().extract(section);

        let names: Vec<&str> = treatment.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Meloxicam 0,1 mg/kg cada 24h", "Dieta gastrointestinal"]);
        assert!(treatment.iter().all(|m| m.dosage.is_none() && m.route.is_none()));
    }

    #[test]
    fn test_english_header() {
        let treatment = TreatmentExtractor::new()
            .unwrap()
            .extract("Treatment: amoxicillin 250 mg BID\nFollow-up: 10 days");
        assert_eq!(treatment, vec![Medication::named("amoxicillin 250 mg BID")]);
    }

    #[test]
    fn test_no_treatment() {
        assert!(TreatmentExtractor::new().unwrap().extract("Motivo: control").is_empty());
    }
}
