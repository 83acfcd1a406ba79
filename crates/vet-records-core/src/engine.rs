//! Record assembler.
//!
//! Annotates the document once, then runs clinic extraction, pet extraction
//! and segmentation with per-visit extraction, in that order.

use std::path::Path;

use tracing::{debug, info, info_span};
use vet_records_ner::{Annotator, Span};

use crate::config::EngineConfig;
use crate::extract::{ClinicExtractor, ExtractionResult, PetInfoExtractor, VisitExtractor};
use crate::models::{MedicalRecord, Visit};
use crate::segmenter::VisitSegmenter;

/// Anything that turns clinical text into a [`MedicalRecord`].
pub trait MedicalRecordExtractor: Send + Sync {
    /// Extract a record. Never fails: missing facts are left empty.
    fn extract(&self, text: &str) -> MedicalRecord;
}

/// The extraction engine.
///
/// Built once; every pattern is compiled up front and nothing is mutated
/// afterwards, so one instance can be shared across threads.
pub struct RecordExtractor {
    config: EngineConfig,
    annotator: Annotator,
    clinic: ClinicExtractor,
    pet: PetInfoExtractor,
    segmenter: VisitSegmenter,
    visits: VisitExtractor,
}

impl RecordExtractor {
    /// Build the engine. Fails only if a rule or pattern does not compile.
    pub fn new(config: EngineConfig) -> ExtractionResult<Self> {
        let annotator = Annotator::with_default_rules()?;
        debug!(rules = annotator.rule_count(), "annotator ready");

        Ok(Self {
            clinic: ClinicExtractor::new(&config)?,
            pet: PetInfoExtractor::new()?,
            segmenter: VisitSegmenter::new()?,
            visits: VisitExtractor::new()?,
            annotator,
            config,
        })
    }

    pub fn with_defaults() -> ExtractionResult<Self> {
        Self::new(EngineConfig::default())
    }

    /// Defaults with `VET_RECORDS_*` environment overrides.
    pub fn from_env() -> ExtractionResult<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    /// Config file, then `VET_RECORDS_*` environment overrides on top.
    pub fn from_config_file(path: impl AsRef<Path>) -> ExtractionResult<Self> {
        Self::new(EngineConfig::from_json_file(path)?.with_env_overrides()?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Annotator spans for `text`, as used by the pet extractor.
    pub fn annotate(&self, text: &str) -> Vec<Span> {
        self.annotator.annotate(text)
    }

    pub fn extract(&self, text: &str) -> MedicalRecord {
        if text.trim().is_empty() {
            debug!("blank input, returning empty record");
            return MedicalRecord::empty();
        }

        let span = info_span!("extract_record", bytes = text.len());
        let _guard = span.enter();

        let spans = self.annotator.annotate(text);
        debug!(spans = spans.len(), "annotated");

        let clinic = self.clinic.extract(text);
        let pet = self.pet.extract(&spans, text);
        let visits = self.extract_visits(text);

        let record = MedicalRecord {
            pet_info: (!pet.is_empty()).then_some(pet),
            veterinary_info: (!clinic.is_empty()).then_some(clinic),
            visits,
        };

        info!(
            pet = record.pet_info.is_some(),
            clinic = record.veterinary_info.is_some(),
            visits = record.visits.len(),
            "record extracted"
        );
        record
    }

    fn extract_visits(&self, text: &str) -> Vec<Visit> {
        let sections = self.segmenter.sections(text);
        debug!(sections = sections.len(), "segmented");

        sections
            .iter()
            .filter_map(|section| self.visits.extract(section))
            .collect()
    }
}

impl MedicalRecordExtractor for RecordExtractor {
    fn extract(&self, text: &str) -> MedicalRecord {
        RecordExtractor::extract(self, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::extract::ExtractionError;
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn test_blank_input() {
        let engine = RecordExtractor::with_defaults().unwrap();
        for text in ["", "   ", "\n\t\n"] {
            let record = engine.extract(text);
            assert!(record.pet_info.is_none());
            assert!(record.veterinary_info.is_none());
            assert!(record.visits.is_empty());
        }
    }

    #[test]
    fn test_no_markers_keeps_pet_and_clinic() {
        let engine = RecordExtractor::with_defaults().unwrap();
        let record = engine.extract("Clínica Veterinaria Sol\nPaciente: Toby\nEspecie: perro\nMotivo: vacunación");

        assert!(record.visits.is_empty());
        let pet = record.pet_info.unwrap();
        assert_eq!(pet.name.as_deref(), Some("Toby"));
        assert_eq!(pet.species.as_deref(), Some("Canine"));
        assert_eq!(
            record.veterinary_info.unwrap().clinic_name.as_deref(),
            Some("Clínica Veterinaria Sol")
        );
    }

    #[test]
    fn test_config_is_used() {
        let config = EngineConfig {
            clinic_skip_keywords: vec!["clínica".into()],
            ..Default::default()
        };
        let engine = RecordExtractor::new(config).unwrap();
        let record = engine.extract("Clínica Sol\nHospital Luna");
        assert_eq!(
            record.veterinary_info.unwrap().clinic_name.as_deref(),
            Some("Hospital Luna")
        );
    }

    #[test]
    fn test_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clinic_header_lines": 1}}"#).unwrap();

        let engine = RecordExtractor::from_config_file(file.path()).unwrap();
        assert_eq!(engine.config().clinic_header_lines, 1);

        let record = engine.extract("Clínica Norte\nCalle Sol 1");
        let clinic = record.veterinary_info.unwrap();
        assert_eq!(clinic.clinic_name.as_deref(), Some("Clínica Norte"));
        assert_eq!(clinic.clinic_address, None);
    }

    #[test]
    fn test_bad_config_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clinic_header_lines": 0}}"#).unwrap();
        assert!(matches!(
            RecordExtractor::from_config_file(file.path()),
            Err(ExtractionError::Config(ConfigError::InvalidValue { .. }))
        ));

        assert!(matches!(
            RecordExtractor::from_config_file("/nonexistent/vet-records.json"),
            Err(ExtractionError::Config(ConfigError::Io { .. }))
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let engine: Arc<dyn MedicalRecordExtractor> = Arc::new(RecordExtractor::with_defaults().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.extract("= 08/12/19\nMotivo: tos").visits.len())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
