//! typecov - Incremental type coverage checker
//!
//! Measures how much of a TypeScript code base is precisely typed, caching
//! per-file results by content hash and invalidating the results of every
//! file whose imports changed.

pub mod analyzer;
pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod discovery;
pub mod error;
pub mod export;
pub mod graph;
pub mod syntax;

pub use analyzer::{Analyzer, FileContext, LexicalAnalyzer};
pub use config::Config;
pub use core::{process_files_with_cache, RunResult};
pub use error::{CoverageError, Result};
