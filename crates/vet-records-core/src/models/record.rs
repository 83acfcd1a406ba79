//! Top-level medical record.

use serde::{Deserialize, Serialize};

use super::pet::PetInfo;
use super::visit::Visit;

/// Clinic identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VeterinaryInfo {
    pub clinic_name: Option<String>,
    pub clinic_address: Option<String>,
    pub clinic_phone: Option<String>,
}

impl VeterinaryInfo {
    /// True when no field was populated.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Structured record extracted from one document.
///
/// Visits keep document order, which is not necessarily chronological.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    pub pet_info: Option<PetInfo>,
    pub veterinary_info: Option<VeterinaryInfo>,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl MedicalRecord {
    /// Record with nothing extracted.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.pet_info.is_none() && self.veterinary_info.is_none() && self.visits.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
