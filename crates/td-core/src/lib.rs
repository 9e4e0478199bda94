//! td-core: Core library for converting delimited topic data to JSON
//!
//! This library provides functionality to:
//! - Classify variable-width CSV rows into valid and invalid records
//! - Convert pair files (exactly two terms per row) to JSON documents
//! - Convert multi-alternative files (N terms per row) to JSON documents
//!   with aggregate statistics
//! - Analyze the distribution of field counts in a delimited file
//! - Scan a directory of JSON files and generate a topic index manifest

pub mod error;
pub mod index;
pub mod multi;
pub mod pairs;
pub mod row;
pub mod stats;

pub use error::{Error, Result};
pub use index::{build_index, IndexedFile, TopicIndex, DEFAULT_INDEX_FILENAME};
pub use multi::{analyze_file, convert_multi, Distribution, MultiDocument, MultiEntry};
pub use pairs::{convert_pairs, PairDocument, PairEntry};
pub use row::{InvalidRow, InvalidRows, SourceRow};
pub use stats::{StatsAccumulator, Statistics};
