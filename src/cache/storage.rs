//! Cache storage implementation

use crate::core::Finding;
use crate::error::{CoverageError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the snapshot inside the cache directory
pub const CACHE_FILE_NAME: &str = "result.json";

/// Cached analysis result for a single source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Hash of the content that produced the counts and findings
    pub hash: String,
    pub correct_count: usize,
    pub total_count: usize,
    /// Raw analyzer findings, before any ignore-category filtering
    #[serde(rename = "anys", default)]
    pub findings: Vec<Finding>,
    /// Semantic diagnostics as `semantic-error` findings; absent when they
    /// were not collected. Not part of `correct_count` or `total_count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_errors: Option<Vec<Finding>>,
}

/// In-memory mapping of file path to cached record
///
/// Loaded once per run, updated by the pipeline for every recomputed file,
/// and written back as a single snapshot. Entries for files outside the
/// current run are carried over untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheStore {
    #[serde(default)]
    cache: BTreeMap<String, FileRecord>,
}

impl CacheStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from `<dir>/result.json`
    ///
    /// Returns an empty store when caching is disabled or the snapshot does
    /// not exist. A legacy snapshot whose `cache` field is an array loads as
    /// empty; any other malformed content is an error.
    pub fn load(dir: &Path, enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self::new());
        }

        let path = snapshot_path(dir);
        if !path.is_file() {
            debug!(path = %path.display(), "No cache snapshot found");
            return Ok(Self::new());
        }

        let file = File::open(&path).map_err(|e| CoverageError::FileNotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        let store = Self::from_value(value)?;
        debug!(entries = store.len(), path = %path.display(), "Loaded cache snapshot");
        Ok(store)
    }

    /// Build a store from a parsed snapshot, normalizing the legacy shape
    fn from_value(mut value: Value) -> Result<Self> {
        if let Some(cache) = value.get_mut("cache") {
            if cache.is_array() {
                warn!("Cache snapshot uses the legacy array layout, starting empty");
                *cache = Value::Object(serde_json::Map::new());
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Write the full snapshot to `<dir>/result.json`, creating `dir` if needed
    pub fn save(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                CoverageError::CacheError(format!(
                    "Failed to create cache directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let path = snapshot_path(dir);
        let file = File::create(&path).map_err(|e| {
            CoverageError::CacheError(format!(
                "Failed to create cache file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let write_error = |e: &dyn fmt::Display| {
            CoverageError::CacheError(format!(
                "Failed to write cache file '{}': {}",
                path.display(),
                e
            ))
        };
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| write_error(&e))?;
        writer.flush().map_err(|e| write_error(&e))?;

        debug!(entries = self.len(), path = %path.display(), "Saved cache snapshot");
        Ok(())
    }

    pub fn get(&self, file: &str) -> Option<&FileRecord> {
        self.cache.get(file)
    }

    /// Insert or replace the record for `file`
    pub fn insert(&mut self, file: String, record: FileRecord) {
        self.cache.insert(file, record);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Location of the snapshot for a cache directory
pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(CACHE_FILE_NAME)
}

/// Remove the persisted snapshot, if any
pub fn clear_cache(dir: &Path) -> Result<()> {
    let path = snapshot_path(dir);
    if path.is_file() {
        fs::remove_file(&path).map_err(|e| {
            CoverageError::CacheError(format!(
                "Failed to remove cache file '{}': {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FindingKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_record(hash: &str) -> FileRecord {
        FileRecord {
            hash: hash.to_string(),
            correct_count: 5,
            total_count: 6,
            findings: vec![Finding::new(2, 10, FindingKind::Any, "value")],
            semantic_errors: None,
        }
    }

    #[test]
    fn test_missing_snapshot_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::load(temp.path(), true).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_disabled_never_reads() {
        let temp = TempDir::new().unwrap();
        fs::write(snapshot_path(temp.path()), "not json at all").unwrap();

        // A malformed file would be fatal if it were read
        let store = CacheStore::load(temp.path(), false).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("cache");

        let mut store = CacheStore::new();
        store.insert("src/a.ts".to_string(), sample_record("abc"));
        store.save(&dir).unwrap();

        let loaded = CacheStore::load(&dir, true).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("src/a.ts"), Some(&sample_record("abc")));
    }

    #[test]
    fn test_snapshot_wire_format() {
        let temp = TempDir::new().unwrap();
        let mut store = CacheStore::new();
        store.insert("a.ts".to_string(), sample_record("ff"));
        store.save(temp.path()).unwrap();

        let text = fs::read_to_string(snapshot_path(temp.path())).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let record = &value["cache"]["a.ts"];
        assert_eq!(record["hash"], "ff");
        assert_eq!(record["correctCount"], 5);
        assert_eq!(record["totalCount"], 6);
        assert_eq!(record["anys"][0]["kind"], "any");
        assert_eq!(record["anys"][0]["text"], "value");
        assert!(record.get("semanticErrors").is_none());
    }

    #[test]
    fn test_semantic_errors_roundtrip() {
        let temp = TempDir::new().unwrap();
        let mut record = sample_record("ff");
        record.semantic_errors = Some(vec![Finding::new(
            1,
            0,
            FindingKind::SemanticError,
            "Cannot find name 'x'.",
        )]);
        let mut store = CacheStore::new();
        store.insert("a.ts".to_string(), record.clone());
        store.save(temp.path()).unwrap();

        let text = fs::read_to_string(snapshot_path(temp.path())).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["cache"]["a.ts"]["semanticErrors"][0]["kind"], "semantic-error");
        assert_eq!(value["cache"]["a.ts"]["totalCount"], 6);

        let loaded = CacheStore::load(temp.path(), true).unwrap();
        assert_eq!(loaded.get("a.ts"), Some(&record));
    }

    #[test]
    fn test_save_failure_is_cache_error() {
        let temp = TempDir::new().unwrap();
        // A directory where the snapshot file should go
        fs::create_dir_all(snapshot_path(temp.path())).unwrap();

        let result = CacheStore::new().save(temp.path());
        assert!(matches!(result, Err(CoverageError::CacheError(_))));
    }

    #[test]
    fn test_legacy_array_shape_loads_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(snapshot_path(temp.path()), r#"{"cache": []}"#).unwrap();

        let store = CacheStore::load(temp.path(), true).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_cache_field_loads_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(snapshot_path(temp.path()), "{}").unwrap();

        let store = CacheStore::load(temp.path(), true).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_snapshot_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(snapshot_path(temp.path()), "{\"cache\": {").unwrap();

        let result = CacheStore::load(temp.path(), true);
        assert!(matches!(result, Err(CoverageError::CacheFormat(_))));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let temp = TempDir::new().unwrap();

        let mut first = CacheStore::new();
        first.insert("a.ts".to_string(), sample_record("1"));
        first.insert("b.ts".to_string(), sample_record("2"));
        first.save(temp.path()).unwrap();

        let mut second = CacheStore::new();
        second.insert("a.ts".to_string(), sample_record("3"));
        second.save(temp.path()).unwrap();

        let loaded = CacheStore::load(temp.path(), true).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("a.ts").unwrap().hash, "3");
    }

    #[test]
    fn test_clear_cache() {
        let temp = TempDir::new().unwrap();
        let mut store = CacheStore::new();
        store.insert("a.ts".to_string(), sample_record("1"));
        store.save(temp.path()).unwrap();
        assert!(snapshot_path(temp.path()).exists());

        clear_cache(temp.path()).unwrap();
        assert!(!snapshot_path(temp.path()).exists());

        // Clearing an already empty directory is fine
        clear_cache(temp.path()).unwrap();
    }
}
