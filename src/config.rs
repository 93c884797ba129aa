//! Configuration types for typecov

use crate::core::FindingKind;
use std::path::PathBuf;

/// Cache directory used when none is configured
pub const DEFAULT_CACHE_DIR: &str = ".type-coverage";

/// Output format for coverage results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable console output
    #[default]
    Console,
    /// JSON output with structured data
    Json,
}

/// Finding categories excluded from reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IgnoreCategories {
    /// Drop `contains-any` findings (e.g. `Promise<any>`)
    pub nested: bool,
    /// Drop `unsafe-as-assertion` findings (`foo as Bar`)
    pub as_assertion: bool,
    /// Drop `unsafe-type-assertion` findings (`<Bar>foo`)
    pub type_assertion: bool,
    /// Drop `unsafe-non-null-assertion` findings (`foo!`)
    pub non_null_assertion: bool,
}

impl IgnoreCategories {
    /// Returns true if findings of this kind are still reported
    pub fn allows(&self, kind: &FindingKind) -> bool {
        match kind {
            FindingKind::ContainsAny => !self.nested,
            FindingKind::UnsafeAs => !self.as_assertion,
            FindingKind::UnsafeTypeAssertion => !self.type_assertion,
            FindingKind::UnsafeNonNull => !self.non_null_assertion,
            _ => true,
        }
    }

    /// True when no category is ignored
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Configuration options for typecov
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to input file list (or "-" for stdin)
    pub list_filename: String,

    /// Report paths as absolute instead of relative to the working directory
    pub absolute_path: bool,

    /// Only check these files (after path normalization)
    pub files: Option<Vec<String>>,

    /// Glob patterns of files to skip
    pub ignore_files: Vec<String>,

    // === Incremental Cache ===
    /// Enable incremental caching
    pub cache_enabled: bool,

    /// Cache directory (default: .type-coverage in the working directory)
    pub cache_dir: Option<PathBuf>,

    /// Remove the persisted cache before running
    pub clear_cache: bool,

    // === Analysis ===
    /// Finding categories to drop from the report
    pub ignore: IgnoreCategories,

    /// Append one finding per semantic diagnostic
    pub report_semantic_error: bool,

    /// Also flag type assertions and non-null assertions
    pub strict: bool,

    /// Number of threads for parallel hashing and analysis (default: num_cpus)
    pub num_threads: usize,

    // === Output ===
    /// Output format (console or json)
    pub output_format: OutputFormat,

    /// Record a per-file (correct, total) breakdown
    pub file_counts: bool,

    /// Print every finding, not only the summary
    pub detail: bool,

    /// Fail when coverage percent is below this value
    pub at_least: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_filename: String::from("-"),
            absolute_path: false,
            files: None,
            ignore_files: Vec::new(),
            cache_enabled: false,
            cache_dir: None,
            clear_cache: false,
            ignore: IgnoreCategories::default(),
            report_semantic_error: false,
            strict: false,
            num_threads: num_cpus::get(),
            output_format: OutputFormat::Console,
            file_counts: false,
            detail: false,
            at_least: None,
        }
    }
}

impl Config {
    /// Directory holding `result.json`
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }
}
