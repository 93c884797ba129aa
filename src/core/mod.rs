//! Core data structures and the incremental coverage pipeline

pub mod finding;
pub mod hash;
pub mod processor;
pub mod source_file;

pub use finding::{FileFinding, Finding, FindingKind};
pub use hash::content_hash;
pub use processor::{process_files_with_cache, FileCounts, RunResult};
pub use source_file::SourceFile;
