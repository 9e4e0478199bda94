//! Topic index generation over a directory of JSON files
//!
//! Scans a directory (one level deep) for `.json` files, pulls
//! lightweight metadata out of each, and assembles a manifest. The
//! manifest is always rebuilt from scratch; an existing one is simply
//! overwritten. A file that cannot be read or parsed gets a
//! `read_error` entry and the scan moves on.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Default manifest filename, excluded from its own scan
pub const DEFAULT_INDEX_FILENAME: &str = "topic_index.json";

/// Per-file metadata in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedFile {
    /// Base name of the indexed file
    pub filename: String,
    /// Placeholder for a hand-written description
    pub description: String,
    /// Size on disk
    pub file_size_bytes: u64,
    /// Local-time modification timestamp, ISO-8601
    pub last_modified: String,
    /// Set when the file's top-level mapping has a `metadata` key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_metadata: Option<bool>,
    /// Estimated entry count, when one of the known conventions matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_entries: Option<u64>,
    /// Cross-reference to the file's own `metadata.source_file`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Read or parse failure message; the scan continues past it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_error: Option<String>,
}

/// The manifest describing a directory of topic files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicIndex {
    /// When the manifest was generated, local time ISO-8601
    pub generated_at: String,
    /// Name of the tool that produced the manifest
    pub generator_script: String,
    /// Number of indexed files
    pub total_files: usize,
    /// Indexed files, sorted by filename
    pub files: Vec<IndexedFile>,
}

impl TopicIndex {
    /// Write the manifest as pretty-printed JSON, replacing any
    /// existing file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Entry-count conventions probed in priority order; first match wins
type CountProbe = fn(&serde_json::Map<String, Value>) -> Option<u64>;

const COUNT_PROBES: &[CountProbe] = &[
    |map| map.get("total_entries").and_then(Value::as_u64),
    |map| {
        map.get("entries")
            .and_then(Value::as_array)
            .map(|entries| entries.len() as u64)
    },
    |map| map.get("total_pairs").and_then(Value::as_u64),
];

/// Scan `dir` for JSON files and build a manifest
///
/// `exclude` is the manifest's own filename and is never indexed;
/// `generator` names the producing tool in the output.
pub fn build_index<P: AsRef<Path>>(dir: P, exclude: &str, generator: &str) -> Result<TopicIndex> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut targets: Vec<(String, PathBuf, u64, String)> = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }

        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if filename == exclude {
            continue;
        }

        let metadata = entry.metadata()?;
        let modified = metadata.modified()?;

        targets.push((
            filename.to_string(),
            path.to_path_buf(),
            metadata.len(),
            format_timestamp(modified),
        ));
    }

    targets.sort_by(|a, b| a.0.cmp(&b.0));

    let files: Vec<IndexedFile> = targets
        .into_iter()
        .map(|(filename, path, size, modified)| {
            let mut info = IndexedFile {
                filename,
                description: String::new(),
                file_size_bytes: size,
                last_modified: modified,
                has_metadata: None,
                total_entries: None,
                source_file: None,
                read_error: None,
            };

            match read_json(&path) {
                Ok(data) => probe_metadata(&mut info, &data),
                Err(e) => info.read_error = Some(e),
            }

            info
        })
        .collect();

    Ok(TopicIndex {
        generated_at: format_timestamp(SystemTime::now()),
        generator_script: generator.to_string(),
        total_files: files.len(),
        files,
    })
}

fn read_json(path: &Path) -> std::result::Result<Value, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

fn probe_metadata(info: &mut IndexedFile, data: &Value) {
    match data {
        Value::Object(map) => {
            if map.contains_key("metadata") {
                info.has_metadata = Some(true);
            }
            info.total_entries = COUNT_PROBES.iter().find_map(|probe| probe(map));
            info.source_file = map
                .get("metadata")
                .and_then(|m| m.get("source_file"))
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        Value::Array(items) => info.total_entries = Some(items.len() as u64),
        _ => {}
    }
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
