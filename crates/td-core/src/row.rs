//! Row classification for delimited topic files
//!
//! Both converters share the same reading discipline: split each line on
//! commas, trim every field, drop fields that trim to empty. A row left
//! with zero fields is blank and excluded from all counts. Row numbers
//! are 1-based line positions in the raw input, so blank lines still
//! advance the numbering.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A non-blank row read from a delimited file
#[derive(Debug, Clone)]
pub struct SourceRow {
    /// 1-based line position in the raw input
    pub number: u64,
    /// Trimmed, non-empty fields
    pub fields: Vec<String>,
}

impl SourceRow {
    /// Number of fields remaining after trimming
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// A row that failed the mode's validity predicate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidRow {
    /// 1-based line position of the offending row
    pub row_number: u64,
    /// The trimmed fields as read
    pub content: Vec<String>,
    /// Number of fields in `content`
    pub element_count: usize,
    /// Failure explanation (multi mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InvalidRow {
    /// Record an invalid row without an explanation (pair mode)
    pub fn new(row: SourceRow) -> Self {
        Self {
            row_number: row.number,
            element_count: row.fields.len(),
            content: row.fields,
            reason: None,
        }
    }

    /// Record an invalid row with an explanation (multi mode)
    pub fn with_reason(row: SourceRow, reason: impl Into<String>) -> Self {
        Self {
            row_number: row.number,
            element_count: row.fields.len(),
            content: row.fields,
            reason: Some(reason.into()),
        }
    }
}

/// The `invalid_rows` block of an output document
///
/// Only present when at least one row was invalid; callers treat its
/// absence as "zero invalid rows".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidRows {
    /// Number of invalid rows
    pub count: usize,
    /// Per-row detail, in input order
    pub details: Vec<InvalidRow>,
}

impl InvalidRows {
    /// Wrap collected details, or `None` if there were no invalid rows
    pub fn from_details(details: Vec<InvalidRow>) -> Option<Self> {
        if details.is_empty() {
            None
        } else {
            Some(Self {
                count: details.len(),
                details,
            })
        }
    }
}

/// Read all non-blank rows from a delimited file
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<SourceRow>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    collect_rows(&content, path)
}

/// Read rows from a string (useful for testing)
pub fn read_rows_str(content: &str, source_name: &str) -> Result<Vec<SourceRow>> {
    collect_rows(content, Path::new(source_name))
}

/// Enumerate physical lines so that row numbers count blank lines too.
///
/// The csv reader skips fully blank lines without advancing its record
/// positions, so numbering is assigned here, before the reader ever
/// sees a line.
fn collect_rows(content: &str, path: &Path) -> Result<Vec<SourceRow>> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let number = idx as u64 + 1;

        let fields = split_line(line, path)?;

        // A row whose fields all trim away is blank, not invalid.
        if fields.is_empty() {
            continue;
        }

        rows.push(SourceRow { number, fields });
    }

    Ok(rows)
}

/// Split one line on commas, trimming fields and dropping empties
fn split_line(line: &str, path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Allow varying number of fields
        .from_reader(line.as_bytes());

    let mut fields = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

        fields.extend(
            record
                .iter()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
        );
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_trims_fields() {
        let rows = read_rows_str(" a , b \nc,d\n", "test.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["a", "b"]);
        assert_eq!(rows[1].fields, vec!["c", "d"]);
    }

    #[test]
    fn test_read_rows_drops_empty_fields() {
        let rows = read_rows_str("a,,b\n,c,\n", "test.csv").unwrap();
        assert_eq!(rows[0].fields, vec!["a", "b"]);
        assert_eq!(rows[1].fields, vec!["c"]);
    }

    #[test]
    fn test_blank_lines_skipped_but_counted() {
        let rows = read_rows_str("a,b\nc,d,e\n\nf", "test.csv").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[2].number, 4);
        assert_eq!(rows[2].fields, vec!["f"]);
    }

    #[test]
    fn test_consecutive_and_leading_blank_lines_counted() {
        let rows = read_rows_str("\na,b\n\n\nc", "test.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 2);
        assert_eq!(rows[0].fields, vec!["a", "b"]);
        assert_eq!(rows[1].number, 5);
        assert_eq!(rows[1].fields, vec!["c"]);
    }

    #[test]
    fn test_comma_only_row_is_blank() {
        let rows = read_rows_str("a,b\n,,,\nc,d\n", "test.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].number, 3);
    }

    #[test]
    fn test_whitespace_only_row_is_blank() {
        let rows = read_rows_str("a,b\n   ,  \nc,d\n", "test.csv").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = read_rows("definitely/not/here.csv");
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_invalid_rows_block_omitted_when_empty() {
        assert!(InvalidRows::from_details(Vec::new()).is_none());

        let row = SourceRow {
            number: 2,
            fields: vec!["x".to_string()],
        };
        let block = InvalidRows::from_details(vec![InvalidRow::new(row)]).unwrap();
        assert_eq!(block.count, 1);
        assert_eq!(block.details[0].element_count, 1);
        assert!(block.details[0].reason.is_none());
    }
}
