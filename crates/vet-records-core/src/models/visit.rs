//! Visit models: exams, treatments, lab tests and vaccinations.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One clinical visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Date from the visit header; carries the header time when one was written
    pub visit_date: Option<NaiveDateTime>,
    pub visit_type: Option<String>,
    pub clinic_name: Option<String>,
    /// Reason for consultation
    pub reason: Option<String>,
    pub anamnesis: Option<String>,
    pub physical_examination: Option<PhysicalExamination>,
    /// One entry per diagnosis line
    #[serde(default)]
    pub diagnosis: Vec<String>,
    #[serde(default)]
    pub treatment: Vec<Medication>,
    pub plan: Option<String>,
    #[serde(default)]
    pub laboratory_tests: Vec<LaboratoryTest>,
    #[serde(default)]
    pub vaccinations: Vec<Vaccination>,
    pub observations: Option<String>,
}

/// Physical examination findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PhysicalExamination {
    /// Weight in kg
    pub weight: Option<f64>,
    /// Temperature in °C
    pub temperature: Option<f64>,
    /// Beats per minute
    pub heart_rate: Option<f64>,
    /// Breaths per minute
    pub respiratory_rate: Option<f64>,
    pub mucous_membranes: Option<String>,
    /// Capillary refill time
    pub crt: Option<String>,
    pub hydration_status: Option<String>,
    pub general_condition: Option<String>,
    pub abdominal_palpation: Option<String>,
    /// Every non-empty line of the exam block
    #[serde(default)]
    pub findings: Vec<String>,
}

/// A prescribed or administered medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub route: Option<String>,
    pub observations: Option<String>,
}

impl Medication {
    /// Medication with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dosage: None,
            frequency: None,
            duration: None,
            route: None,
            observations: None,
        }
    }
}

/// Lab test results: free text or a structured map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TestResults {
    Text(String),
    Structured(serde_json::Map<String, serde_json::Value>),
}

/// A laboratory or imaging test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaboratoryTest {
    pub test_name: String,
    pub test_date: Option<NaiveDate>,
    pub results: Option<TestResults>,
    #[serde(default)]
    pub findings: Vec<String>,
}

/// A vaccination entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vaccination {
    pub vaccine_name: String,
    pub date_administered: Option<NaiveDate>,
    pub next_dose_date: Option<NaiveDate>,
    #[serde(default)]
    pub applied: bool,
}

impl Visit {
    /// True when the visit carries clinical content worth keeping.
    ///
    /// Date, plan, observations and vaccinations alone do not count.
    pub fn has_clinical_content(&self) -> bool {
        self.reason.is_some()
            || !self.diagnosis.is_empty()
            || !self.treatment.is_empty()
            || self.physical_examination.is_some()
            || !self.laboratory_tests.is_empty()
            || self.anamnesis.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clinical_content() {
        let mut visit = Visit::default();
        assert!(!visit.has_clinical_content());

        visit.plan = Some("Revisión en 7 días".into());
        assert!(!visit.has_clinical_content());

        visit.diagnosis.push("Gastritis".into());
        assert!(visit.has_clinical_content());
    }

    #[test]
    fn test_results_untagged() {
        let text: TestResults = serde_json::from_str(r#""normal""#).unwrap();
        assert_eq!(text, TestResults::Text("normal".into()));

        let structured: TestResults = serde_json::from_str(r#"{"hematocrit":45}"#).unwrap();
        assert!(matches!(structured, TestResults::Structured(ref m) if m.contains_key("hematocrit")));
    }

    #[test]
    fn test_vaccination_applied_defaults_false() {
        let vaccination: Vaccination =
            serde_json::from_str(r#"{"vaccine_name":"Rabia","date_administered":null,"next_dose_date":null}"#)
                .unwrap();
        assert!(!vaccination.applied);
    }

    #[test]
    fn test_visit_date_iso_8601() {
        let visit = Visit {
            visit_date: NaiveDate::from_ymd_opt(2019, 12, 8).and_then(|d| d.and_hms_opt(16, 12, 0)),
            ..Default::default()
        };
        let json = serde_json::to_value(&visit).unwrap();
        assert_eq!(json["visit_date"], "2019-12-08T16:12:00");
        assert_eq!(json["treatment"], serde_json::json!([]));
    }
}
