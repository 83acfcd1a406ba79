//! Vet-Records Core Library
//!
//! Turns free-form veterinary clinical text into a structured medical record.
//!
//! # Architecture
//!
//! ```text
//!                         plain text
//!                             │
//!                     Entity Annotator (once)
//!                             │
//!          ┌──────────────────┼──────────────────┐
//!          │                  │                  │
//!          ▼                  ▼                  ▼
//!   Clinic extractor    Pet extractor     Visit segmenter
//!    (header lines)     (whole text)     (markers → sections)
//!          │                  │                  │
//!          │                  │        per-visit extractor chain
//!          │                  │                  │
//!          └──────────────────┼──────────────────┘
//!                             ▼
//!                       MedicalRecord
//! ```
//!
//! # Failure model
//!
//! Absence of a fact is not an error. A field extractor that fails leaves its
//! field empty and logs the cause; no failure aborts a document. Only engine
//! construction can fail.
//!
//! # Modules
//!
//! - [`config`]: Engine settings from defaults, JSON files and environment
//! - [`engine`]: Record assembler
//! - [`extract`]: Pet, clinic and per-visit field extractors
//! - [`models`]: Domain types (MedicalRecord, PetInfo, Visit, etc.)
//! - [`normalizer`]: Species, decimal and date normalization
//! - [`segmenter`]: Visit boundary detection

pub mod config;
pub mod engine;
pub mod extract;
pub mod models;
pub mod normalizer;
pub mod segmenter;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use engine::{MedicalRecordExtractor, RecordExtractor};
pub use extract::{ExtractionError, ExtractionResult, FieldResult};
pub use models::{
    LaboratoryTest, MedicalRecord, Medication, PetInfo, PhysicalExamination, TestResults,
    Vaccination, VeterinaryInfo, Visit,
};
pub use normalizer::Normalizer;
pub use segmenter::{MarkerKind, VisitBoundary, VisitSection, VisitSegmenter};
