//! Pair conversion: delimited rows with exactly two terms
//!
//! A row is a valid pair when exactly two fields survive trimming.
//! Every other non-blank row is recorded under `invalid_rows`.

use crate::error::Result;
use crate::row::{read_rows, read_rows_str, InvalidRow, InvalidRows, SourceRow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A valid two-term row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairEntry {
    /// 1-based line position of the source row
    pub id: u64,
    /// First term
    pub term1: String,
    /// Second term
    pub term2: String,
}

/// Output document of a pair conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairDocument {
    /// Number of valid pairs
    pub total_pairs: usize,
    /// Valid pairs, in input order
    pub pairs: Vec<PairEntry>,
    /// Present only when at least one row was invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_rows: Option<InvalidRows>,
}

impl PairDocument {
    /// Number of invalid rows (0 when the block is absent)
    pub fn invalid_count(&self) -> usize {
        self.invalid_rows.as_ref().map_or(0, |r| r.count)
    }

    /// Write the document as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Convert a delimited file of term pairs into a `PairDocument`
pub fn convert_pairs<P: AsRef<Path>>(path: P) -> Result<PairDocument> {
    let rows = read_rows(path)?;
    Ok(build_document(rows))
}

/// Convert pairs from a string (useful for testing)
pub fn convert_pairs_str(content: &str, source_name: &str) -> Result<PairDocument> {
    let rows = read_rows_str(content, source_name)?;
    Ok(build_document(rows))
}

/// Default output path: the input path with a `.json` extension
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}

fn build_document(rows: Vec<SourceRow>) -> PairDocument {
    let mut pairs = Vec::new();
    let mut invalid = Vec::new();

    for row in rows {
        if row.field_count() == 2 {
            let mut fields = row.fields.into_iter();
            pairs.push(PairEntry {
                id: row.number,
                term1: fields.next().unwrap_or_default(),
                term2: fields.next().unwrap_or_default(),
            });
        } else {
            invalid.push(InvalidRow::new(row));
        }
    }

    PairDocument {
        total_pairs: pairs.len(),
        pairs,
        invalid_rows: InvalidRows::from_details(invalid),
    }
}
