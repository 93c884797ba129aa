//! Source file representation

use crate::core::hash::content_hash;
use crate::error::{CoverageError, Result};
use crate::syntax::SourceUnit;
use std::fs;

/// A loaded source file: its path key, content hash and scanned statements
#[derive(Debug)]
pub struct SourceFile {
    /// Path key used in the cache and in reports
    filename: String,
    /// Content hash (empty when caching is disabled)
    hash: String,
    unit: SourceUnit,
}

impl SourceFile {
    /// Read, hash and scan a source file
    ///
    /// # Arguments
    /// * `filename` - Path key of the file (relative or absolute per configuration)
    /// * `cache_enabled` - Whether to compute a content hash
    ///
    /// # Returns
    /// The loaded SourceFile, or an error if the file cannot be read
    pub fn load(filename: &str, cache_enabled: bool) -> Result<Self> {
        let content = fs::read(filename).map_err(|e| CoverageError::FileNotFound {
            path: filename.to_string(),
            reason: e.to_string(),
        })?;

        let hash = content_hash(&content, cache_enabled);
        let text = String::from_utf8_lossy(&content);

        Ok(Self {
            filename: filename.to_string(),
            hash,
            unit: SourceUnit::parse(&text),
        })
    }

    /// Create a SourceFile from in-memory text
    pub fn from_source(filename: impl Into<String>, source: &str, cache_enabled: bool) -> Self {
        Self {
            filename: filename.into(),
            hash: content_hash(source.as_bytes(), cache_enabled),
            unit: SourceUnit::parse(source),
        }
    }

    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[inline]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    #[inline]
    pub fn unit(&self) -> &SourceUnit {
        &self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_hashes_and_scans() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.ts");
        fs::write(&path, "import b from './b';\nlet x: number = 1;\n").unwrap();

        let sf = SourceFile::load(path.to_str().unwrap(), true).unwrap();
        assert_eq!(sf.hash().len(), 40);
        assert_eq!(sf.unit().statements().len(), 2);
    }

    #[test]
    fn test_load_without_cache_has_empty_hash() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.ts");
        fs::write(&path, "let x = 1;").unwrap();

        let sf = SourceFile::load(path.to_str().unwrap(), false).unwrap();
        assert_eq!(sf.hash(), "");
    }

    #[test]
    fn test_from_source_matches_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.ts");
        fs::write(&path, "let x = 1;").unwrap();

        let loaded = SourceFile::load(path.to_str().unwrap(), true).unwrap();
        let in_memory = SourceFile::from_source("a.ts", "let x = 1;", true);
        assert_eq!(loaded.hash(), in_memory.hash());
    }

    #[test]
    fn test_missing_file() {
        let result = SourceFile::load("/no/such/file.ts", true);
        assert!(matches!(result, Err(CoverageError::FileNotFound { .. })));
    }
}
