//! Loads a course catalog into a [`CourseIndex`].
//!
//! A catalog is comma separated text with one course per line:
//!
//! ```text
//! CSCI100,Introduction to Computer Science
//! CSCI101,Introduction to Programming in C++,CSCI100
//! CSCI300,Introduction to Algorithms,CSCI200,MATH201
//! ```
//!
//! Fields may be wrapped in double quotes (with `""` for a literal quote) when a title contains
//! a comma. Rows that can't be turned into a course, including rows that aren't UTF-8, are
//! skipped and reported. Only failing to read the catalog at all stops a load.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::Path;
use std::str;

use tracing::{debug, warn};

use crate::course::{Course, MAX_PREREQUISITES};
use crate::error::{LoadError, RowError};
use crate::index::CourseIndex;

/// Id and title come before the prerequisites.
const REQUIRED_FIELDS: usize = 2;

/// UTF-8 byte-order mark some editors put at the start of a file.
const BOM: &[u8] = b"\xef\xbb\xbf";

/// A row that was left out of the index.
#[derive(Debug, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the catalog.
    pub line: usize,
    /// Why it was left out.
    pub error: RowError,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// What happened during a load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Courses added to the index.
    pub loaded: usize,
    /// Rows that were skipped, in catalog order.
    pub skipped: Vec<SkippedRow>,
    /// `(course id, prerequisite id)` pairs where the prerequisite isn't in the index.
    pub unknown_prerequisites: Vec<(String, String)>,
}

/// Parses a single catalog row.
///
/// # Examples
///
/// ```
/// use advising::loader::parse_row;
///
/// let course = parse_row("CSCI300, Introduction to Algorithms, CSCI200, MATH201").unwrap();
///
/// assert_eq!(course.id(), "CSCI300");
/// assert_eq!(course.title(), "Introduction to Algorithms");
/// assert_eq!(course.prerequisites(), ["CSCI200", "MATH201"]);
/// ```
pub fn parse_row(row: &str) -> Result<Course, RowError> {
    let mut fields = split_fields(row)?;

    // Spreadsheet exports pad rows out to the widest one.
    while fields.len() > REQUIRED_FIELDS && fields.last().map_or(false, String::is_empty) {
        fields.pop();
    }

    let max = REQUIRED_FIELDS + MAX_PREREQUISITES;
    if fields.len() < REQUIRED_FIELDS {
        return Err(RowError::TooFewFields(fields.len()));
    }
    if fields.len() > max {
        return Err(RowError::TooManyFields {
            found: fields.len(),
            max,
        });
    }

    let prerequisites = fields.split_off(REQUIRED_FIELDS);
    let title = fields.pop().unwrap_or_default();
    let id = fields.pop().unwrap_or_default();

    if id.is_empty() {
        return Err(RowError::EmptyId);
    }
    if title.is_empty() {
        return Err(RowError::EmptyTitle(id));
    }
    if prerequisites.iter().any(String::is_empty) {
        return Err(RowError::PrerequisiteGap(id));
    }

    Ok(prerequisites
        .into_iter()
        .fold(Course::new(id, title), |course, prerequisite| {
            course.with_prerequisite(prerequisite)
        }))
}

/// Splits a row on commas outside of double quotes and trims each field.
fn split_fields(row: &str) -> Result<Vec<String>, RowError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' if in_quotes => in_quotes = false,
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(RowError::UnterminatedQuote);
    }
    fields.push(field);

    Ok(fields.into_iter().map(|f| f.trim().to_string()).collect())
}

/// Reads a catalog from `reader` and inserts every well formed row into `index`.
///
/// Blank lines are ignored. Rows that don't parse, or that the index refuses, are logged and
/// listed in the returned report. Once everything is in, prerequisites that don't name a course
/// in the index are listed too.
pub fn load_courses<R: BufRead>(
    mut reader: R,
    index: &mut CourseIndex,
) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::default();
    let mut buf = Vec::new();
    let mut line = 0;

    // Each line is decoded on its own.
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line += 1;

        let mut bytes = buf.as_slice();
        bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        if line == 1 {
            bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
        }

        let inserted = match str::from_utf8(bytes) {
            Ok(row) if row.trim().is_empty() => continue,
            Ok(row) => {
                parse_row(row).and_then(|course| index.insert(course).map_err(RowError::from))
            }
            Err(err) => Err(RowError::InvalidUtf8(err.valid_up_to())),
        };
        match inserted {
            Ok(()) => report.loaded += 1,
            Err(error) => {
                let skipped = SkippedRow { line, error };
                warn!(%skipped, "skipping catalog row");
                report.skipped.push(skipped);
            }
        }
    }

    report.unknown_prerequisites = unknown_prerequisites(index);
    for (course, prerequisite) in &report.unknown_prerequisites {
        warn!(%course, %prerequisite, "prerequisite is not in the catalog");
    }

    debug!(
        loaded = report.loaded,
        skipped = report.skipped.len(),
        total = index.len(),
        "catalog loaded"
    );
    Ok(report)
}

/// Opens the catalog at `path` and loads it with [`load_courses`].
pub fn load_file(path: impl AsRef<Path>, index: &mut CourseIndex) -> Result<LoadReport, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "loading catalog");
    load_courses(BufReader::new(file), index)
}

fn unknown_prerequisites(index: &CourseIndex) -> Vec<(String, String)> {
    index
        .iter()
        .flat_map(|course| {
            course
                .prerequisites()
                .iter()
                .filter(move |prerequisite| index.search(prerequisite).is_none())
                .map(move |prerequisite| (course.id().to_string(), prerequisite.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use super::*;
    use crate::error::IndexError;
    use crate::index::DuplicatePolicy;

    const CATALOG: &str = "\
MATH201,Discrete Mathematics
CSCI300,Introduction to Algorithms,CSCI200,MATH201
CSCI350,Operating Systems,CSCI300
CSCI101,Introduction to Programming in C++,CSCI100
CSCI100,Introduction to Computer Science
CSCI301,Advanced Programming in C++,CSCI101
CSCI400,Large Software Development,CSCI301,CSCI350
CSCI200,Data Structures,CSCI101
";

    #[test]
    fn parse_id_and_title() {
        let course = parse_row("CSCI100,Introduction to Computer Science").unwrap();

        assert_eq!(course, Course::new("CSCI100", "Introduction to Computer Science"));
    }

    #[test]
    fn parse_trims_fields_and_padding() {
        let course = parse_row("  CSCI101 , Introduction to Programming in C++ ,CSCI100,,").unwrap();

        assert_eq!(course.id(), "CSCI101");
        assert_eq!(course.title(), "Introduction to Programming in C++");
        assert_eq!(course.prerequisites(), ["CSCI100"]);
    }

    #[test]
    fn parse_quoted_title() {
        let course = parse_row(r#"ENGL101,"Reading, Writing and ""Rhetoric""",ENGL100"#).unwrap();

        assert_eq!(course.title(), r#"Reading, Writing and "Rhetoric""#);
        assert_eq!(course.prerequisites(), ["ENGL100"]);
    }

    #[test]
    fn parse_rejects_malformed_rows() {
        assert_eq!(parse_row("CSCI100"), Err(RowError::TooFewFields(1)));
        assert_eq!(
            parse_row("CSCI400,Large Software Development,CSCI301,CSCI350,MATH201"),
            Err(RowError::TooManyFields { found: 5, max: 4 })
        );
        assert_eq!(parse_row(",Orphan Title"), Err(RowError::EmptyId));
        assert_eq!(
            parse_row("CSCI100, "),
            Err(RowError::EmptyTitle("CSCI100".to_string()))
        );
        assert_eq!(
            parse_row("CSCI300,Introduction to Algorithms,,MATH201"),
            Err(RowError::PrerequisiteGap("CSCI300".to_string()))
        );
        assert_eq!(
            parse_row(r#"CSCI100,"Unclosed"#),
            Err(RowError::UnterminatedQuote)
        );
    }

    #[test]
    fn load_catalog_in_order() {
        let mut index = CourseIndex::new();
        let report = load_courses(Cursor::new(CATALOG), &mut index).unwrap();

        assert_eq!(report.loaded, 8);
        assert!(report.skipped.is_empty());
        assert!(report.unknown_prerequisites.is_empty());

        let ids: Vec<_> = index.iter().map(Course::id).collect();
        assert_eq!(
            ids,
            [
                "CSCI100", "CSCI101", "CSCI200", "CSCI300", "CSCI301", "CSCI350", "CSCI400",
                "MATH201"
            ]
        );
        assert_eq!(
            index.search("CSCI400").map(Course::prerequisites),
            Some(&["CSCI301".to_string(), "CSCI350".to_string()][..])
        );
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let catalog = "\u{feff}CSCI100,Introduction to Computer Science\n\nBROKEN\n,No Id\nCSCI101,Introduction to Programming in C++,CSCI100\n";
        let mut index = CourseIndex::new();
        let report = load_courses(Cursor::new(catalog), &mut index).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(
            report.skipped,
            [
                SkippedRow {
                    line: 3,
                    error: RowError::TooFewFields(1)
                },
                SkippedRow {
                    line: 4,
                    error: RowError::EmptyId
                },
            ]
        );
        assert_eq!(report.skipped[0].to_string(), "line 3: expected an id and a title, found 1 field(s)");
        assert!(index.search("CSCI100").is_some());
    }

    #[test]
    fn rejected_duplicates_are_skipped() {
        let catalog = "MATH201,Discrete Mathematics\nMATH201,Discrete Math\n";
        let mut index = CourseIndex::with_policy(DuplicatePolicy::Reject);
        let report = load_courses(Cursor::new(catalog), &mut index).unwrap();

        assert_eq!(report.loaded, 1);
        assert_eq!(
            report.skipped,
            [SkippedRow {
                line: 2,
                error: RowError::Rejected(IndexError::DuplicateKey("MATH201".to_string())),
            }]
        );
        assert_eq!(
            index.search("MATH201").map(Course::title),
            Some("Discrete Mathematics")
        );
    }

    #[test]
    fn unknown_prerequisites_are_reported() {
        let catalog = "CSCI200,Data Structures,CSCI101\nCSCI101,Introduction to Programming in C++,CSCI100\n";
        let mut index = CourseIndex::new();
        let report = load_courses(Cursor::new(catalog), &mut index).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(
            report.unknown_prerequisites,
            [("CSCI101".to_string(), "CSCI100".to_string())]
        );
    }

    #[test]
    fn non_utf8_row_is_skipped() {
        let catalog: &[u8] =
            b"CSCI100,Intro\r\nFREN101,Caf\xe9 Culture\r\nMATH201,Discrete Mathematics\r\n";
        let mut index = CourseIndex::new();
        let report = load_courses(Cursor::new(catalog), &mut index).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(
            report.skipped,
            [SkippedRow {
                line: 2,
                error: RowError::InvalidUtf8(11),
            }]
        );
        assert_eq!(index.len(), 2);
        assert_eq!(index.search("CSCI100").map(Course::title), Some("Intro"));
        assert!(index.search("MATH201").is_some());
        assert!(index.search("FREN101").is_none());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk went away"))
        }
    }

    #[test]
    fn read_failure_stops_the_load() {
        let mut index = CourseIndex::new();
        let result = load_courses(BufReader::new(FailingReader), &mut index);

        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn missing_file() {
        let mut index = CourseIndex::new();
        let result = load_file("definitely/not/a/catalog.csv", &mut index);

        assert!(matches!(result, Err(LoadError::Open { .. })));
        assert!(index.is_empty());
    }
}
