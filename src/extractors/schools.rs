// src/extractors/schools.rs

// --- Imports ---
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dataset::School;
use crate::pdf::PageText;
use crate::utils::error::ExtractError;

// --- Regex Patterns for Line Classification (Lazy Static) ---

// A district header line: all-uppercase name, optionally suffixed with the
// word DISTRICT, e.g. "KAMPALA" or "KAMPALA DISTRICT".
static DISTRICT_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Z .'\-/]{2,}$").expect("Failed to compile DISTRICT_HEADER_RE")
});

// The inline district column carried by listing rows, e.g. the "KAMPALA"
// in "12 Kololo SS KAMPALA 123456". A single uppercase token, long enough
// not to swallow abbreviations like "SS".
static INLINE_DISTRICT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Z'\-]{2,}$").expect("Failed to compile INLINE_DISTRICT_RE")
});

// Page footer lines such as "12", "Page 3" or "3 of 57".
static PAGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:page\s+)?\d+(?:\s+of\s+\d+)?$").expect("Failed to compile PAGE_NUMBER_RE")
});

// --- Data Structures ---

/// Result of scanning the whole document.
#[derive(Debug)]
pub struct Extraction {
    /// District name -> schools in source order. BTreeMap keeps the
    /// district ordering alphabetical for serialization.
    pub districts: BTreeMap<String, Vec<School>>,
    /// Lines that looked like data but matched no known pattern. Reported
    /// so data-quality problems in the source are visible, not silent.
    pub skipped_lines: usize,
}

impl Extraction {
    pub fn total_schools(&self) -> usize {
        self.districts.values().map(Vec::len).sum()
    }
}

/// One line of page text, classified.
#[derive(Debug, PartialEq)]
enum Line {
    /// Repeated headers, footers and blank lines; not worth counting
    Boilerplate,
    /// A district header, already uppercased and stripped of "DISTRICT"
    DistrictHeader(String),
    /// A school listing row
    Row {
        name: String,
        district: Option<String>,
        emis: String,
    },
    /// Anything else; counted as skipped
    Unrecognized,
}

// --- Main Extractor Structure ---
pub struct SchoolExtractor;

impl SchoolExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Scans all pages in order and builds the district -> schools map.
    ///
    /// District state is threaded through the scan: a district header line
    /// (or a row's inline district column) sets the current district, and
    /// subsequent rows without their own district column are appended to it.
    /// Fails when the document yields no recognizable districts at all.
    pub fn extract(&self, pages: &[PageText], source: &str) -> Result<Extraction, ExtractError> {
        let lines = pages.iter().flat_map(|page| page.text.lines());
        self.scan(lines, source)
    }

    fn scan<'a>(
        &self,
        lines: impl Iterator<Item = &'a str>,
        source: &str,
    ) -> Result<Extraction, ExtractError> {
        let mut districts: BTreeMap<String, Vec<School>> = BTreeMap::new();
        let mut current_district: Option<String> = None;
        let mut skipped_lines = 0usize;

        for raw_line in lines {
            match classify_line(raw_line) {
                Line::Boilerplate => {}
                Line::DistrictHeader(name) => {
                    tracing::trace!("District header: {}", name);
                    districts.entry(name.clone()).or_default();
                    current_district = Some(name);
                }
                Line::Row {
                    name,
                    district,
                    emis,
                } => {
                    // A row's own district column wins over the running state
                    // and updates it for the rows that follow.
                    if let Some(district) = district {
                        districts.entry(district.clone()).or_default();
                        current_district = Some(district);
                    }

                    match &current_district {
                        Some(district) => {
                            districts
                                .entry(district.clone())
                                .or_default()
                                .push(School { name, emis });
                        }
                        None => {
                            tracing::trace!("Row before any district, skipping: {:?}", raw_line);
                            skipped_lines += 1;
                        }
                    }
                }
                Line::Unrecognized => {
                    tracing::trace!("Unrecognized line, skipping: {:?}", raw_line);
                    skipped_lines += 1;
                }
            }
        }

        if districts.is_empty() {
            return Err(ExtractError::NoDistricts(source.to_string()));
        }

        if skipped_lines > 0 {
            tracing::warn!("Skipped {} unrecognized lines in {}", skipped_lines, source);
        }

        Ok(Extraction {
            districts,
            skipped_lines,
        })
    }
}

/// Classifies a single line of page text.
fn classify_line(raw_line: &str) -> Line {
    let line = raw_line.trim();
    if line.is_empty() {
        return Line::Boilerplate;
    }

    // Repeated table headers and the document title.
    let lowered = line.to_lowercase();
    if lowered.contains("school district emis")
        || lowered.contains("government secondary schools")
        || line.starts_with("SN")
        || PAGE_NUMBER_RE.is_match(line)
    {
        return Line::Boilerplate;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();

    // Listing rows start with a serial number.
    if tokens.len() >= 2 && is_all_digits(tokens[0]) {
        return match parse_row(&tokens[1..]) {
            Some(row) => row,
            None => Line::Unrecognized,
        };
    }

    if let Some(name) = parse_district_header(line) {
        return Line::DistrictHeader(name);
    }

    Line::Unrecognized
}

/// Parses the tokens after the serial number of a listing row:
/// `NAME... [DISTRICT] [EMIS]`, where the EMIS code is a trailing all-digit
/// token and the district column is a trailing uppercase token.
fn parse_row(tokens: &[&str]) -> Option<Line> {
    let mut rest = tokens;

    let mut emis = String::new();
    if !rest.is_empty() && is_all_digits(rest[rest.len() - 1]) {
        emis = rest[rest.len() - 1].to_string();
        rest = &rest[..rest.len() - 1];
    }

    let mut district = None;
    if rest.len() >= 2 && INLINE_DISTRICT_RE.is_match(rest[rest.len() - 1]) {
        district = Some(rest[rest.len() - 1].to_string());
        rest = &rest[..rest.len() - 1];
    }

    if rest.is_empty() {
        return None; // A row with no school name is not a valid entry
    }

    Some(Line::Row {
        name: rest.join(" "),
        district,
        emis,
    })
}

/// Recognizes district header lines, stripping a trailing "DISTRICT" token.
fn parse_district_header(line: &str) -> Option<String> {
    if !DISTRICT_HEADER_RE.is_match(line) {
        return None;
    }

    let name = line
        .strip_suffix("DISTRICT")
        .map(str::trim_end)
        .unwrap_or(line);

    if name.is_empty() || !name.contains(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(name.to_string())
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn extract_text(text: &str) -> Result<Extraction, ExtractError> {
        SchoolExtractor::new().scan(text.lines(), "test input")
    }

    #[test]
    fn header_driven_rows_with_and_without_emis() {
        let text = "\
Government Secondary Schools
SN School District EMIS
KAMPALA
1 A 123456
2 B
";
        let extraction = extract_text(text).unwrap();

        assert_eq!(extraction.districts.len(), 1);
        let schools = &extraction.districts["KAMPALA"];
        assert_eq!(
            schools,
            &vec![
                School {
                    name: "A".to_string(),
                    emis: "123456".to_string()
                },
                School {
                    name: "B".to_string(),
                    emis: String::new()
                },
            ]
        );
        assert_eq!(extraction.skipped_lines, 0);
    }

    #[test]
    fn inline_district_column_assigns_and_updates_state() {
        let text = "\
1 Kololo SS KAMPALA 123456
2 Naalya SS WAKISO
3 Kira College 654321
";
        let extraction = extract_text(text).unwrap();

        assert_eq!(extraction.districts["KAMPALA"].len(), 1);
        assert_eq!(extraction.districts["KAMPALA"][0].name, "Kololo SS");
        assert_eq!(extraction.districts["KAMPALA"][0].emis, "123456");

        // Row 2 has no EMIS; row 3 has no district column and follows WAKISO.
        let wakiso = &extraction.districts["WAKISO"];
        assert_eq!(wakiso.len(), 2);
        assert_eq!(wakiso[0].name, "Naalya SS");
        assert_eq!(wakiso[0].emis, "");
        assert_eq!(wakiso[1].name, "Kira College");
        assert_eq!(wakiso[1].emis, "654321");
    }

    #[test]
    fn district_header_suffix_is_stripped() {
        let text = "\
GULU DISTRICT
1 Gulu High School 445566
";
        let extraction = extract_text(text).unwrap();

        assert_eq!(extraction.districts.len(), 1);
        assert!(extraction.districts.contains_key("GULU"));
    }

    #[test]
    fn district_names_are_unique_and_sorted() {
        let text = "\
WAKISO
1 Naalya SS 700123
KAMPALA
1 Kololo SS 123456
WAKISO
2 Kira College 654321
";
        let extraction = extract_text(text).unwrap();

        let names: Vec<&String> = extraction.districts.keys().collect();
        assert_eq!(names, vec!["KAMPALA", "WAKISO"]);
        assert_eq!(extraction.districts["WAKISO"].len(), 2);
    }

    #[test]
    fn unmatched_lines_are_counted_not_fatal() {
        let text = "\
KAMPALA
1 Kololo SS 123456
~~ ocr noise ~~
2
";
        // "2" alone is a page number, not noise; only the noise line counts.
        let extraction = extract_text(text).unwrap();

        assert_eq!(extraction.total_schools(), 1);
        assert_eq!(extraction.skipped_lines, 1);
    }

    #[test]
    fn row_before_any_district_is_skipped() {
        let text = "\
1 Orphan School
KAMPALA
2 Kololo SS 123456
";
        let extraction = extract_text(text).unwrap();

        assert_eq!(extraction.total_schools(), 1);
        assert_eq!(extraction.skipped_lines, 1);
    }

    #[test]
    fn no_recognizable_districts_is_an_error() {
        let text = "\
Government Secondary Schools
just some prose
Page 1 of 3
";
        let err = extract_text(text).unwrap_err();
        assert!(matches!(err, ExtractError::NoDistricts(_)));
    }

    #[test]
    fn boilerplate_lines_are_not_counted_as_skipped() {
        let text = "\
Government Secondary Schools
SN School District EMIS
Page 2 of 10
KAMPALA
1 Kololo SS 123456
";
        let extraction = extract_text(text).unwrap();
        assert_eq!(extraction.skipped_lines, 0);
    }

    #[test]
    fn school_names_are_never_empty() {
        // Serial followed only by an EMIS code is not a valid row.
        let text = "\
KAMPALA
1 123456
2 Kololo SS 123456
";
        let extraction = extract_text(text).unwrap();

        assert_eq!(extraction.total_schools(), 1);
        assert_eq!(extraction.skipped_lines, 1);
        assert!(extraction
            .districts
            .values()
            .flatten()
            .all(|school| !school.name.is_empty()));
    }
}
