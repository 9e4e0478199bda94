//! Statistics aggregation over valid multi-alternative rows

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running aggregate, updated once per valid row in a single pass
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    min: Option<usize>,
    max: usize,
    total: usize,
    counts: BTreeMap<usize, usize>,
}

impl StatsAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one valid row's field count into the aggregate
    pub fn record(&mut self, field_count: usize) {
        self.min = Some(self.min.map_or(field_count, |m| m.min(field_count)));
        self.max = self.max.max(field_count);
        self.total += field_count;
        *self.counts.entry(field_count).or_insert(0) += 1;
    }

    /// Number of rows recorded so far
    pub fn row_count(&self) -> usize {
        self.counts.values().sum()
    }

    /// Derive the final statistics block
    ///
    /// With zero recorded rows the minimum is reported as 0 and the
    /// average as 0.
    pub fn finish(self) -> Statistics {
        let rows = self.counts.values().sum::<usize>();
        let average = if rows > 0 {
            round2(self.total as f64 / rows as f64)
        } else {
            0.0
        };

        Statistics {
            min_alternatives: self.min.unwrap_or(0),
            max_alternatives: self.max,
            total_alternatives: self.total,
            alternative_counts: self.counts,
            average_alternatives: average,
        }
    }
}

/// The `statistics` block of a multi-conversion document
///
/// `alternative_counts` maps field count to occurrence count; a
/// `BTreeMap` keeps the keys ascending in the serialized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    /// Smallest field count among valid rows (0 when there are none)
    pub min_alternatives: usize,
    /// Largest field count among valid rows
    pub max_alternatives: usize,
    /// Sum of field counts across valid rows
    pub total_alternatives: usize,
    /// Frequency table: field count -> number of rows
    pub alternative_counts: BTreeMap<usize, usize>,
    /// total / rows, rounded to two decimal places (0 when empty)
    pub average_alternatives: f64,
}

/// Round to two decimal places
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_min_max_total() {
        let mut acc = StatsAccumulator::new();
        acc.record(3);
        acc.record(2);
        acc.record(5);

        let stats = acc.finish();
        assert_eq!(stats.min_alternatives, 2);
        assert_eq!(stats.max_alternatives, 5);
        assert_eq!(stats.total_alternatives, 10);
        assert_eq!(stats.average_alternatives, 3.33);
    }

    #[test]
    fn test_frequencies_sum_to_row_count() {
        let mut acc = StatsAccumulator::new();
        for n in [2, 2, 3, 4, 4, 4] {
            acc.record(n);
        }
        assert_eq!(acc.row_count(), 6);

        let stats = acc.finish();
        assert_eq!(stats.alternative_counts[&2], 2);
        assert_eq!(stats.alternative_counts[&3], 1);
        assert_eq!(stats.alternative_counts[&4], 3);
        assert_eq!(stats.alternative_counts.values().sum::<usize>(), 6);
    }

    #[test]
    fn test_empty_accumulator_degenerates_to_zero() {
        let stats = StatsAccumulator::new().finish();
        assert_eq!(stats.min_alternatives, 0);
        assert_eq!(stats.max_alternatives, 0);
        assert_eq!(stats.total_alternatives, 0);
        assert_eq!(stats.average_alternatives, 0.0);
        assert!(stats.alternative_counts.is_empty());
    }

    #[test]
    fn test_average_rounding() {
        let mut acc = StatsAccumulator::new();
        acc.record(1);
        acc.record(2);
        acc.record(2);
        // 5 / 3 = 1.666... -> 1.67
        assert_eq!(acc.finish().average_alternatives, 1.67);
    }

    #[test]
    fn test_serialized_counts_keys_ascending() {
        let mut acc = StatsAccumulator::new();
        for n in [10, 2, 7] {
            acc.record(n);
        }

        let json = serde_json::to_string(&acc.finish()).unwrap();
        let two = json.find("\"2\"").unwrap();
        let seven = json.find("\"7\"").unwrap();
        let ten = json.find("\"10\"").unwrap();
        assert!(two < seven && seven < ten);
    }
}
