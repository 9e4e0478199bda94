//! Multi-alternative conversion: rows with a configurable minimum of terms
//!
//! This module provides:
//! - Conversion of delimited rows into grouped-alternative entries
//! - Aggregate statistics over the valid rows (via [`crate::stats`])
//! - A distribution analysis mode for inspecting a file before conversion

use crate::error::{Error, Result};
use crate::row::{read_rows, read_rows_str, InvalidRow, InvalidRows, SourceRow};
use crate::stats::{StatsAccumulator, Statistics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default minimum number of alternatives required per row
pub const DEFAULT_MIN_ALTERNATIVES: usize = 2;

/// A valid row of grouped alternatives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiEntry {
    /// 1-based line position of the source row
    pub id: u64,
    /// Number of alternatives in this entry
    pub alternatives_count: usize,
    /// The alternatives, in field order
    pub alternatives: Vec<String>,
}

/// The `metadata` block of a multi-conversion document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiMetadata {
    /// Base name of the input file
    pub source_file: String,
    /// Number of valid entries
    pub total_entries: usize,
    /// The configured minimum
    pub minimum_alternatives_required: usize,
}

/// Output document of a multi-alternative conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiDocument {
    /// Conversion metadata
    pub metadata: MultiMetadata,
    /// Aggregate statistics over valid rows
    pub statistics: Statistics,
    /// Valid entries, in input order
    pub entries: Vec<MultiEntry>,
    /// Present only when at least one row was invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_rows: Option<InvalidRows>,
}

impl MultiDocument {
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

/// Convert a delimited file of grouped alternatives into a `MultiDocument`
///
/// `min_alternatives` below 1 is a configuration error, reported before
/// any file I/O happens.
pub fn convert_multi<P: AsRef<Path>>(path: P, min_alternatives: usize) -> Result<MultiDocument> {
    if min_alternatives < 1 {
        return Err(Error::InvalidMinimum(min_alternatives));
    }

    let path = path.as_ref();
    let source_file = base_name(path);
    let rows = read_rows(path)?;
    Ok(build_document(rows, source_file, min_alternatives))
}

/// Convert alternatives from a string (useful for testing)
pub fn convert_multi_str(
    content: &str,
    source_name: &str,
    min_alternatives: usize,
) -> Result<MultiDocument> {
    if min_alternatives < 1 {
        return Err(Error::InvalidMinimum(min_alternatives));
    }

    let source_file = base_name(Path::new(source_name));
    let rows = read_rows_str(content, source_name)?;
    Ok(build_document(rows, source_file, min_alternatives))
}

/// Default output path: the input stem with a `_multiple.json` suffix
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_multiple.json"))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

fn build_document(rows: Vec<SourceRow>, source_file: String, min: usize) -> MultiDocument {
    let mut entries = Vec::new();
    let mut invalid = Vec::new();
    let mut acc = StatsAccumulator::new();

    for row in rows {
        let count = row.field_count();
        if count >= min {
            acc.record(count);
            entries.push(MultiEntry {
                id: row.number,
                alternatives_count: count,
                alternatives: row.fields,
            });
        } else {
            invalid.push(InvalidRow::with_reason(
                row,
                format!("Less than {min} alternatives"),
            ));
        }
    }

    MultiDocument {
        metadata: MultiMetadata {
            source_file,
            total_entries: entries.len(),
            minimum_alternatives_required: min,
        },
        statistics: acc.finish(),
        entries,
        invalid_rows: InvalidRows::from_details(invalid),
    }
}

/// Field-count distribution over all non-blank rows of a file
///
/// Used by the analysis mode; no minimum is applied here, every
/// non-blank row counts.
#[derive(Debug, Clone)]
pub struct Distribution {
    /// Number of non-blank rows
    pub total_rows: usize,
    /// Field count -> number of rows, keys ascending
    pub counts: BTreeMap<usize, usize>,
}

impl Distribution {
    /// Share of rows with the given field count, in percent
    pub fn percentage(&self, rows: usize) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (rows as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// Analyze the field-count distribution of a delimited file
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<Distribution> {
    Ok(build_distribution(read_rows(path)?))
}

/// Analyze a distribution from a string (useful for testing)
pub fn analyze_str(content: &str, source_name: &str) -> Result<Distribution> {
    Ok(build_distribution(read_rows_str(content, source_name)?))
}

fn build_distribution(rows: Vec<SourceRow>) -> Distribution {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for row in &rows {
        *counts.entry(row.field_count()).or_insert(0) += 1;
    }

    Distribution {
        total_rows: rows.len(),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_with_default_minimum() {
        let doc =
            convert_multi_str("big,large,huge\nsmall,tiny\n", "syn.csv", DEFAULT_MIN_ALTERNATIVES)
                .unwrap();

        assert_eq!(doc.metadata.source_file, "syn.csv");
        assert_eq!(doc.metadata.total_entries, 2);
        assert_eq!(doc.metadata.minimum_alternatives_required, 2);

        assert_eq!(doc.entries[0].id, 1);
        assert_eq!(doc.entries[0].alternatives_count, 3);
        assert_eq!(doc.entries[0].alternatives, vec!["big", "large", "huge"]);
        assert!(doc.invalid_rows.is_none());
    }

    #[test]
    fn test_minimum_one_accepts_every_non_blank_row() {
        let doc = convert_multi_str("a,b\nc,d,e\n\nf", "syn.csv", 1).unwrap();

        assert_eq!(doc.metadata.total_entries, 3);
        assert!(doc.invalid_rows.is_none());

        // the blank line advances the numbering
        let ids: Vec<u64> = doc.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        let stats = &doc.statistics;
        assert_eq!(stats.alternative_counts[&1], 1);
        assert_eq!(stats.alternative_counts[&2], 1);
        assert_eq!(stats.alternative_counts[&3], 1);
        assert_eq!(stats.average_alternatives, 2.0);
    }

    #[test]
    fn test_short_rows_recorded_with_reason() {
        let doc = convert_multi_str("a,b,c\nlonely\n", "syn.csv", 2).unwrap();

        assert_eq!(doc.metadata.total_entries, 1);
        let invalid = doc.invalid_rows.unwrap();
        assert_eq!(invalid.count, 1);
        assert_eq!(invalid.details[0].row_number, 2);
        assert_eq!(invalid.details[0].element_count, 1);
        assert_eq!(
            invalid.details[0].reason.as_deref(),
            Some("Less than 2 alternatives")
        );
    }

    #[test]
    fn test_statistics_match_entries() {
        let doc = convert_multi_str("a,b\nc,d,e,f\ng,h,i\n", "syn.csv", 2).unwrap();

        let stats = &doc.statistics;
        assert_eq!(stats.min_alternatives, 2);
        assert_eq!(stats.max_alternatives, 4);
        assert_eq!(stats.total_alternatives, 9);
        assert_eq!(stats.average_alternatives, 3.0);
        assert_eq!(
            stats.alternative_counts.values().sum::<usize>(),
            doc.metadata.total_entries
        );
    }

    #[test]
    fn test_no_valid_rows_degenerates_to_zero() {
        let doc = convert_multi_str("a\nb\n", "syn.csv", 3).unwrap();

        assert_eq!(doc.metadata.total_entries, 0);
        assert_eq!(doc.statistics.min_alternatives, 0);
        assert_eq!(doc.statistics.average_alternatives, 0.0);
        assert_eq!(doc.invalid_count(), 2);
    }

    #[test]
    fn test_minimum_below_one_is_rejected() {
        let result = convert_multi_str("a,b\n", "syn.csv", 0);
        assert!(matches!(result, Err(Error::InvalidMinimum(0))));
    }

    #[test]
    fn test_valid_plus_invalid_equals_non_blank_rows() {
        let doc = convert_multi_str("a,b\nc\n\nd,e,f\ng\n", "syn.csv", 2).unwrap();
        assert_eq!(doc.metadata.total_entries + doc.invalid_count(), 4);
    }

    #[test]
    fn test_analyze_counts_all_rows() {
        let dist = analyze_str("a,b\nc,d,e\n\nf", "syn.csv").unwrap();

        assert_eq!(dist.total_rows, 3);
        assert_eq!(dist.counts[&1], 1);
        assert_eq!(dist.counts[&2], 1);
        assert_eq!(dist.counts[&3], 1);
        assert!((dist.percentage(1) - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/syn.csv")),
            PathBuf::from("data/syn_multiple.json")
        );
    }
}
