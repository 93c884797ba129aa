//! Incremental caching of per-file analysis results
//!
//! Results are persisted as a single JSON snapshot keyed by file path. Each
//! record carries the content hash of the file that produced it, so a record
//! is only reused while the file is unchanged.

mod storage;

pub use storage::{clear_cache, snapshot_path, CacheStore, FileRecord, CACHE_FILE_NAME};
