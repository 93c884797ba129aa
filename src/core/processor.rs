//! Incremental coverage pipeline
//!
//! Runs in two phases over the file list:
//! 1. Load and hash every file, keep the cached records whose hash still
//!    matches, extract import edges and clear the records of every file that
//!    (transitively) imports a changed file.
//! 2. Reuse the surviving records, analyze everything else, merge the
//!    per-file results in file order and save the updated store.
//!
//! Stored semantic errors are only counted and reported while
//! `report_semantic_error` is set.
//!
//! Loading and analysis run on a rayon pool. The phase boundaries are
//! collection points, and only the calling thread touches the store and the
//! totals.

use crate::analyzer::{analyze_file, Analyzer, FileResult};
use crate::cache::{CacheStore, FileRecord};
use crate::config::Config;
use crate::core::{FileFinding, Finding, FindingKind, SourceFile};
use crate::error::{CoverageError, Result};
use crate::graph::{collect_dependencies, DependencyGraph, ImportResolver};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// Correct and total counts of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCounts {
    pub correct_count: usize,
    pub total_count: usize,
}

/// Result of a coverage run
#[derive(Debug, Default)]
pub struct RunResult {
    /// Sum of correct counts over all files
    pub correct_count: usize,
    /// Sum of total counts over all files
    pub total_count: usize,
    /// Reported findings in file order, after ignore-category filtering
    pub findings: Vec<FileFinding>,
    /// Per-file breakdown, when enabled
    pub file_counts: Option<BTreeMap<String, FileCounts>>,
    /// Number of files in the run
    pub files_analyzed: usize,
    /// Files whose cached record was reused
    pub cache_hits: usize,
    /// Files handed to the analyzer
    pub cache_misses: usize,
}

impl RunResult {
    /// Coverage percentage; an empty project counts as fully covered
    pub fn percent(&self) -> f64 {
        if self.total_count == 0 {
            100.0
        } else {
            (self.correct_count as f64 / self.total_count as f64) * 100.0
        }
    }
}

/// Where a file's result comes from in phase 2
enum FileOutcome {
    /// Record reused as stored
    Cached(FileRecord),
    /// Record reused, with semantic errors collected this run
    Completed(FileRecord),
    /// Record built from a fresh analysis
    Computed(FileRecord),
}

/// Load and hash all files in parallel
fn load_source_files(
    file_list: &[String],
    config: &Config,
    pool: &rayon::ThreadPool,
) -> Result<Vec<SourceFile>> {
    pool.install(|| {
        file_list
            .par_iter()
            .map(|path| SourceFile::load(path, config.cache_enabled))
            .collect()
    })
}

/// Cached records whose stored hash matches the current content
fn provisional_records(
    source_files: &[SourceFile],
    store: &CacheStore,
) -> HashMap<String, Option<FileRecord>> {
    source_files
        .iter()
        .map(|sf| {
            let record = match store.get(sf.filename()) {
                Some(record) if record.hash == sf.hash() => Some(record.clone()),
                Some(_) => {
                    debug!(file = sf.filename(), "Content changed since last run");
                    None
                }
                None => None,
            };
            (sf.filename().to_string(), record)
        })
        .collect()
}

/// Clear the records of every file depending on a rejected file
fn invalidate_dependents(
    source_files: &[SourceFile],
    records: &mut HashMap<String, Option<FileRecord>>,
    config: &Config,
) -> Result<usize> {
    let known: HashSet<String> = source_files
        .iter()
        .map(|sf| sf.filename().to_string())
        .collect();
    let root: Option<PathBuf> = if config.absolute_path {
        None
    } else {
        Some(std::env::current_dir()?)
    };
    let resolver = ImportResolver::new(&known, root.as_deref());

    let edges = collect_dependencies(
        source_files.iter().map(|sf| (sf.filename(), sf.unit())),
        &resolver,
    );
    debug!(edges = edges.len(), "Collected dependency edges");

    let graph = DependencyGraph::new(&edges);
    let mut cleared = 0;
    for sf in source_files {
        let rejected = matches!(records.get(sf.filename()), Some(None));
        if rejected {
            cleared += graph.invalidate(sf.filename(), records);
        }
    }
    Ok(cleared)
}

/// Semantic diagnostics of one file as `semantic-error` findings
fn semantic_errors(sf: &SourceFile, analyzer: &dyn Analyzer) -> Vec<Finding> {
    analyzer
        .semantic_diagnostics(sf.filename(), sf.unit())
        .into_iter()
        .map(|diagnostic| {
            Finding::new(
                diagnostic.line,
                diagnostic.character,
                FindingKind::SemanticError,
                diagnostic.message,
            )
        })
        .collect()
}

/// Analyze one file; semantic errors are only collected when reported
fn compute_file(sf: &SourceFile, config: &Config, analyzer: &dyn Analyzer) -> FileRecord {
    let FileResult {
        correct_count,
        total_count,
        findings,
    } = analyze_file(analyzer, sf.filename(), sf.unit(), config.strict);

    FileRecord {
        hash: sf.hash().to_string(),
        correct_count,
        total_count,
        findings,
        semantic_errors: config
            .report_semantic_error
            .then(|| semantic_errors(sf, analyzer)),
    }
}

/// Reuse a record, collecting semantic errors it was stored without
fn reuse_record(
    mut record: FileRecord,
    sf: &SourceFile,
    config: &Config,
    analyzer: &dyn Analyzer,
) -> FileOutcome {
    if config.report_semantic_error && record.semantic_errors.is_none() {
        record.semantic_errors = Some(semantic_errors(sf, analyzer));
        FileOutcome::Completed(record)
    } else {
        FileOutcome::Cached(record)
    }
}

/// Run the incremental pipeline over a resolved file list
///
/// # Arguments
/// * `file_list` - Path keys of the files to check, in report order
/// * `config` - Run configuration
/// * `analyzer` - Analyzer invoked for every file without a reusable record
///
/// # Returns
/// The aggregated result; any read, parse or cache write failure aborts the run
pub fn process_files_with_cache(
    file_list: &[String],
    config: &Config,
    analyzer: &dyn Analyzer,
) -> Result<RunResult> {
    let cache_dir = config.effective_cache_dir();
    let mut store = CacheStore::load(&cache_dir, config.cache_enabled)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| CoverageError::Other(format!("Failed to create thread pool: {}", e)))?;

    // === Phase 1: hash, provisional validity, invalidation ===
    info!("Loading and hashing {} files...", file_list.len());
    let source_files = load_source_files(file_list, config, &pool)?;

    let mut records = provisional_records(&source_files, &store);
    if config.cache_enabled {
        let cleared = invalidate_dependents(&source_files, &mut records, config)?;
        if cleared > 0 {
            info!("Invalidated {} cached files through changed dependencies", cleared);
        }
    }

    // === Phase 2: reuse or compute ===
    debug!(analyzer = analyzer.name(), "Analyzing cache misses");
    let outcomes: Vec<FileOutcome> = pool.install(|| {
        source_files
            .par_iter()
            .map(|sf| match records.get(sf.filename()).cloned().flatten() {
                Some(record) => reuse_record(record, sf, config, analyzer),
                None => FileOutcome::Computed(compute_file(sf, config, analyzer)),
            })
            .collect()
    });

    let mut result = RunResult {
        files_analyzed: source_files.len(),
        file_counts: config.file_counts.then(BTreeMap::new),
        ..RunResult::default()
    };

    for (sf, outcome) in source_files.iter().zip(outcomes) {
        let (record, changed) = match outcome {
            FileOutcome::Cached(record) => {
                result.cache_hits += 1;
                (record, false)
            }
            FileOutcome::Completed(record) => {
                result.cache_hits += 1;
                (record, true)
            }
            FileOutcome::Computed(record) => {
                result.cache_misses += 1;
                (record, true)
            }
        };
        if changed && config.cache_enabled {
            store.insert(sf.filename().to_string(), record.clone());
        }

        let semantic_errors = if config.report_semantic_error {
            record.semantic_errors.unwrap_or_default()
        } else {
            Vec::new()
        };
        let counts = FileCounts {
            correct_count: record.correct_count,
            total_count: record.total_count + semantic_errors.len(),
        };

        result.correct_count += counts.correct_count;
        result.total_count += counts.total_count;
        result.findings.extend(
            record
                .findings
                .into_iter()
                .filter(|finding| config.ignore.allows(&finding.kind))
                .chain(semantic_errors)
                .map(|finding| FileFinding {
                    file: sf.filename().to_string(),
                    finding,
                }),
        );
        if let Some(file_counts) = result.file_counts.as_mut() {
            file_counts.insert(sf.filename().to_string(), counts);
        }
    }

    if config.cache_enabled {
        info!(
            "Cache: {} hits, {} misses",
            result.cache_hits, result.cache_misses
        );
        store.save(&cache_dir)?;
    }

    Ok(result)
}
