//! Value normalizer.
//!
//! Handles:
//! - Species canonicalization (perra→Canine, FELINA→Feline, hurón→Hurón)
//! - Decimal-comma numbers ("4,1" → 4.1)
//! - Day/month/year dates with two- or four-digit years

use std::collections::HashMap;
use std::num::ParseFloatError;

use chrono::{NaiveDate, NaiveTime};

/// Accepted date layouts, tried in order. Two-digit years come first so that
/// `08/12/19` is read as 2019 rather than year 19.
pub const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Layout used for birth dates.
pub const BIRTH_DATE_FORMAT: &str = "%d/%m/%Y";

/// Normalizer for extracted values. Immutable once built.
pub struct Normalizer {
    /// Species map: lowercase vocabulary term → canonical category
    species_map: HashMap<String, String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a normalizer with the default species table.
    pub fn new() -> Self {
        Self {
            species_map: Self::default_species(),
        }
    }

    /// Map a raw species token to its canonical category.
    ///
    /// Unknown tokens are title-cased as written.
    pub fn canonicalize_species(&self, raw: &str) -> String {
        let lower = raw.trim().to_lowercase();
        self.species_map
            .get(&lower)
            .cloned()
            .unwrap_or_else(|| title_case(&lower))
    }

    /// Default species mappings.
    fn default_species() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Canine
        map.insert("perro".into(), "Canine".into());
        map.insert("perra".into(), "Canine".into());
        map.insert("canina".into(), "Canine".into());
        map.insert("canino".into(), "Canine".into());
        map.insert("canine".into(), "Canine".into());
        map.insert("dog".into(), "Canine".into());

        // Feline
        map.insert("gato".into(), "Feline".into());
        map.insert("gata".into(), "Feline".into());
        map.insert("felina".into(), "Feline".into());
        map.insert("felino".into(), "Feline".into());
        map.insert("feline".into(), "Feline".into());
        map.insert("cat".into(), "Feline".into());

        map
    }
}

/// Parse a number that may use a decimal comma.
pub fn parse_decimal(raw: &str) -> Result<f64, ParseFloatError> {
    raw.trim().replace(',', ".").parse::<f64>()
}

/// Parse a date against [`DATE_FORMATS`].
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_date_with(raw, DATE_FORMATS)
}

/// Parse a date against the given layouts, first success wins.
pub fn parse_date_with(raw: &str, formats: &[&str]) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse an `HH:MM` clock time.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Uppercase the first character, lowercase the rest.
pub fn title_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_species() {
        let normalizer = Normalizer::new();

        assert_eq!(normalizer.canonicalize_species("CANINA"), "Canine");
        assert_eq!(normalizer.canonicalize_species("perra"), "Canine");
        assert_eq!(normalizer.canonicalize_species("Perro"), "Canine");
        assert_eq!(normalizer.canonicalize_species("FELINA"), "Feline");
        assert_eq!(normalizer.canonicalize_species("gata"), "Feline");

        // Unknown species pass through title-cased
        assert_eq!(normalizer.canonicalize_species("hurón"), "Hurón");
        assert_eq!(normalizer.canonicalize_species("HURÓN"), "Hurón");
        assert_eq!(normalizer.canonicalize_species("conejo"), "Conejo");
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_decimal("4,1").unwrap(), 4.1);
        assert_eq!(parse_decimal("4.1").unwrap(), 4.1);
        assert_eq!(parse_decimal(" 38 ").unwrap(), 38.0);
        assert!(parse_decimal("4,1,2").is_err());
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("08/12/19"), NaiveDate::from_ymd_opt(2019, 12, 8));
        assert_eq!(parse_date("8-12-19"), NaiveDate::from_ymd_opt(2019, 12, 8));
    }

    #[test]
    fn test_four_digit_year() {
        assert_eq!(parse_date("08/12/2019"), NaiveDate::from_ymd_opt(2019, 12, 8));
        assert_eq!(parse_date("08-12-2019"), NaiveDate::from_ymd_opt(2019, 12, 8));
        assert_eq!(parse_date("2019-12-08"), NaiveDate::from_ymd_opt(2019, 12, 8));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_date("31/02/2019"), None);
        assert_eq!(parse_date("hoy"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_birth_date_layout_is_strict() {
        assert_eq!(
            parse_date_with("15/03/2018", &[BIRTH_DATE_FORMAT]),
            NaiveDate::from_ymd_opt(2018, 3, 15)
        );
        assert_eq!(parse_date_with("2018-03-15", &[BIRTH_DATE_FORMAT]), None);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("16:12"), NaiveTime::from_hms_opt(16, 12, 0));
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("loro"), "Loro");
        assert_eq!(title_case("LORO"), "Loro");
        assert_eq!(title_case(""), "");
    }
}
