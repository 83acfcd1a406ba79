//! Visit segmentation.
//!
//! Finds visit headers in a whole document, resolves competing matches for the
//! same boundary and cuts the text into one section per visit.
//!
//! ```text
//! = 08/12/19 - 16:12 -          ← boundary 1 (date + time)
//! Motivo: vómitos               ┐
//! Peso: 4,1 kg                  ┘ section 1
//! VISITA DEL DIA 10/12/2019     ← boundary 2 (explicit header)
//! Revisión, evoluciona bien     ] section 2 (to end of text)
//! ```

use regex::Regex;
use tracing::debug;

use crate::extract::{compile, ExtractionResult};

const DATE: &str = r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}";

/// Family of header that produced a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `= 08/12/19 - 16:12 -`
    DateTime,
    /// `= 08/12/19`
    DateOnly,
    /// `VISITA DEL DIA 08/12/2019`, `VISIT ON 08/12/2019`
    Explicit,
    /// `Visita 2`, `Consultation 3`
    Numbered,
}

/// A visit header found in the document. Offsets are byte offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitBoundary {
    pub kind: MarkerKind,
    /// Start of the header line
    pub start: usize,
    /// End of the header; the section text begins here
    pub header_end: usize,
    /// Raw date text from the header
    pub date: Option<String>,
    /// Raw `HH:MM` time from the header
    pub time: Option<String>,
}

impl VisitBoundary {
    pub fn header_len(&self) -> usize {
        self.header_end - self.start
    }
}

/// One visit's slice of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitSection<'t> {
    pub boundary: VisitBoundary,
    pub text: &'t str,
}

struct Marker {
    kind: MarkerKind,
    regex: Regex,
}

/// Visit segmenter. Immutable once built.
pub struct VisitSegmenter {
    markers: Vec<Marker>,
}

impl VisitSegmenter {
    pub fn new() -> ExtractionResult<Self> {
        let families = [
            (
                MarkerKind::DateTime,
                format!(r"(?i)(?:^|\n)\s*[=-]\s*(?P<date>{DATE})\s*-\s*(?P<time>\d{{1,2}}:\d{{2}})"),
            ),
            (
                MarkerKind::DateOnly,
                format!(r"(?i)(?:^|\n)\s*[=-]\s*(?P<date>{DATE})"),
            ),
            (
                MarkerKind::Explicit,
                format!(
                    r"(?i)(?:^|\n)\s*(?:VISITA[^\n]*?DEL\s+D[IÍ]A|VISIT\s+ON)\s+(?P<date>{DATE})"
                ),
            ),
            (
                MarkerKind::Numbered,
                r"(?i)(?:^|\n)\s*(?:Visita|Consulta|Visit|Consultation)\s+(?P<number>\d+)".to_string(),
            ),
        ];

        let markers = families
            .into_iter()
            .map(|(kind, pattern)| {
                Ok(Marker {
                    kind,
                    regex: compile(&pattern)?,
                })
            })
            .collect::<ExtractionResult<Vec<_>>>()?;

        Ok(Self { markers })
    }

    /// Every header match from every family, sorted by start offset.
    pub fn find_markers(&self, text: &str) -> Vec<VisitBoundary> {
        let mut found = Vec::new();

        for marker in &self.markers {
            for caps in marker.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                // the header starts after the line break and any indentation
                let header = whole.as_str();
                let start = whole.start() + (header.len() - header.trim_start().len());

                found.push(VisitBoundary {
                    kind: marker.kind,
                    start,
                    header_end: whole.end(),
                    date: caps.name("date").map(|m| m.as_str().to_string()),
                    time: caps.name("time").map(|m| m.as_str().to_string()),
                });
            }
        }

        // stable: on equal starts the earlier family stays first
        found.sort_by_key(|b| b.start);
        found
    }

    /// Confirmed boundaries after overlap resolution.
    ///
    /// A match starting inside the current header competes with it; the longer
    /// header wins and the other is dropped.
    pub fn boundaries(&self, text: &str) -> Vec<VisitBoundary> {
        let mut found = self.find_markers(text).into_iter();
        let Some(mut current) = found.next() else {
            return Vec::new();
        };

        let mut confirmed = Vec::new();
        for next in found {
            if next.start < current.header_end {
                if next.header_len() > current.header_len() {
                    debug!(dropped = ?current.kind, kept = ?next.kind, at = next.start, "competing visit headers");
                    current = next;
                } else {
                    debug!(dropped = ?next.kind, kept = ?current.kind, at = current.start, "competing visit headers");
                }
            } else {
                confirmed.push(current);
                current = next;
            }
        }
        confirmed.push(current);
        confirmed
    }

    /// One section per confirmed boundary: from its header end to the next
    /// boundary's start, or to the end of the text.
    pub fn sections<'t>(&self, text: &'t str) -> Vec<VisitSection<'t>> {
        let boundaries = self.boundaries(text);
        let ends: Vec<usize> = boundaries
            .iter()
            .skip(1)
            .map(|b| b.start)
            .chain(std::iter::once(text.len()))
            .collect();

        boundaries
            .into_iter()
            .zip(ends)
            .map(|(boundary, end)| {
                let section = &text[boundary.header_end..end];
                VisitSection {
                    boundary,
                    text: section,
                }
            })
            .collect()
    }
}
