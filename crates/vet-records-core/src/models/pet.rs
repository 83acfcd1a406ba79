//! Pet identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pet identity extracted from the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PetInfo {
    /// Pet name
    pub name: Option<String>,
    /// Canonical species category (e.g., "Canine", "Feline")
    pub species: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<String>,
    /// Neutered/intact status as written in the document
    pub reproductive_status: Option<String>,
    /// Weight in kg
    pub weight: Option<f64>,
    pub microchip: Option<String>,
    pub hair_type: Option<String>,
    pub coat_color: Option<String>,
}

impl PetInfo {
    /// True when no field was populated.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(PetInfo::default().is_empty());
    }

    #[test]
    fn test_any_field_makes_non_empty() {
        let pet = PetInfo {
            weight: Some(4.1),
            ..Default::default()
        };
        assert!(!pet.is_empty());
    }

    #[test]
    fn test_missing_fields_serialize_as_null() {
        let json = serde_json::to_value(PetInfo::default()).unwrap();
        assert!(json["name"].is_null());
        assert!(json["birth_date"].is_null());
        assert!(json["weight"].is_null());
    }
}
