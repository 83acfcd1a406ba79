//! Vaccination lines.

use regex::Regex;

use super::{compile, settle, ExtractionError, ExtractionResult, FieldResult};
use crate::models::Vaccination;
use crate::normalizer::parse_date;

const LINE_PATTERN: &str = r"(?im)^[ \t\-•*]*(?:Vacunaci[oó]n|Vacunas?|Vaccination|Vaccines?)\b[ \t]*:?[ \t]*(?P<rest>[^\n]+)$";

const DATE_PATTERN: &str = r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}";

const NEXT_DOSE_PATTERN: &str = r"(?i)(?:pr[oó]xima(?:[ \t]+dosis)?|revacunaci[oó]n|next(?:[ \t]+dose)?)[ \t]*:?[ \t]*(?P<date>\d{1,2}[/-]\d{1,2}[/-]\d{2,4})";

const APPLIED_PATTERN: &str = r"(?i)\b(?:aplicada|administrada|puesta|applied|given)\b";

/// Vaccination extractor: one [`Vaccination`] per `Vacuna:` / `Vaccine:` line.
pub struct VaccinationExtractor {
    line: Regex,
    date: Regex,
    next_dose: Regex,
    applied: Regex,
}

impl VaccinationExtractor {
    pub fn new() -> ExtractionResult<Self> {
        Ok(Self {
            line: compile(LINE_PATTERN)?,
            date: compile(DATE_PATTERN)?,
            next_dose: compile(NEXT_DOSE_PATTERN)?,
            applied: compile(APPLIED_PATTERN)?,
        })
    }

    pub fn extract(&self, section: &str) -> Vec<Vaccination> {
        self.line
            .captures_iter(section)
            .filter_map(|caps| self.parse_line(caps.name("rest")?.as_str()))
            .collect()
    }

    fn parse_line(&self, rest: &str) -> Option<Vaccination> {
        let next_dose = self.next_dose.captures(rest);
        let next_dose_start = next_dose
            .as_ref()
            .and_then(|c| c.get(0))
            .map_or(rest.len(), |m| m.start());

        let administered = self
            .date
            .find(rest)
            .filter(|m| m.start() < next_dose_start);
        let applied_mark = self.applied.find(rest);

        // the name runs up to whichever annotation comes first
        let name_end = [
            Some(next_dose_start),
            administered.map(|m| m.start()),
            applied_mark.map(|m| m.start()),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());

        let name = rest[..name_end]
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ',' | '.' | ';' | ':' | '('));
        if name.is_empty() {
            return None;
        }

        let date_administered =
            administered.and_then(|m| settle("date_administered", date_field(m.as_str())));
        let next_dose_date = next_dose
            .as_ref()
            .and_then(|c| c.name("date"))
            .and_then(|m| settle("next_dose_date", date_field(m.as_str())));

        Some(Vaccination {
            vaccine_name: name.to_string(),
            applied: date_administered.is_some() || applied_mark.is_some(),
            date_administered,
            next_dose_date,
        })
    }
}

fn date_field(raw: &str) -> FieldResult<chrono::NaiveDate> {
    parse_date(raw)
        .map(Some)
        .ok_or_else(|| ExtractionError::InvalidDateFormat(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn extractor() -> VaccinationExtractor {
        VaccinationExtractor::new().unwrap()
    }

    #[test]
    fn test_dated_vaccination_with_next_dose() {
        let vaccinations = extractor().extract("Vacuna: Rabia 10/12/2019, próxima dosis 10/12/2020");

        assert_eq!(vaccinations.len(), 1);
        let rabies = &vaccinations[0];
        assert_eq!(rabies.vaccine_name, "Rabia");
        assert_eq!(rabies.date_administered, NaiveDate::from_ymd_opt(2019, 12, 10));
        assert_eq!(rabies.next_dose_date, NaiveDate::from_ymd_opt(2020, 12, 10));
        assert!(rabies.applied);
    }

    #[test]
    fn test_applied_keyword() {
        let vaccinations = extractor().extract("- Vaccine: DHPPi applied\n- Vaccine: Leptospira");

        assert_eq!(vaccinations.len(), 2);
        assert_eq!(vaccinations[0].vaccine_name, "DHPPi");
        assert!(vaccinations[0].applied);
        assert_eq!(vaccinations[1].vaccine_name, "Leptospira");
        assert!(!vaccinations[1].applied);
        assert_eq!(vaccinations[1].date_administered, None);
    }

    #[test]
    fn test_next_dose_only() {
        let vaccinations = extractor().extract("Vacunación: Leishmania, next dose 01/06/2021");

        assert_eq!(vaccinations[0].vaccine_name, "Leishmania");
        assert_eq!(vaccinations[0].date_administered, None);
        assert_eq!(vaccinations[0].next_dose_date, NaiveDate::from_ymd_opt(2021, 6, 1));
        assert!(!vaccinations[0].applied);
    }

    #[test]
    fn test_line_without_name_is_skipped() {
        assert!(extractor().extract("Vacuna: 10/12/2019").is_empty());
        assert!(extractor().extract("Motivo: vacunación anual").is_empty());
    }
}
