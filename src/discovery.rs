//! File list loading and selection
//!
//! Turns a list of candidate paths into the path keys of one run: the keys
//! used by the cache store, the dependency graph and the report.

use crate::config::Config;
use crate::error::{CoverageError, Result};
use crate::graph::normalize_path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Load the file list from a path, or from stdin when `path` is "-"
pub fn load_file_list(path: &str) -> Result<Vec<String>> {
    let lines = if path == "-" {
        let stdin = std::io::stdin();
        stdin.lock().lines().collect::<std::io::Result<Vec<_>>>()?
    } else {
        let file = File::open(path).map_err(|e| CoverageError::FileNotFound {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()?
    };

    Ok(lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Select the files of a run from the candidate list
///
/// Paths under `node_modules` are skipped. In relative mode every path is
/// made relative to the working directory and paths outside of it are
/// skipped; in absolute mode relative paths are joined onto it. The `files`
/// allow-list and `ignore_files` globs are matched against the resulting
/// keys. Duplicates are dropped, first occurrence wins.
pub fn select_files(candidates: &[String], config: &Config) -> Result<Vec<String>> {
    let cwd = std::env::current_dir()?;
    select_files_in(candidates, config, &cwd)
}

/// [`select_files`] against an explicit working directory
pub fn select_files_in(candidates: &[String], config: &Config, cwd: &Path) -> Result<Vec<String>> {
    let cwd = normalize_path(&cwd.to_string_lossy());
    let ignore = build_ignore_set(&config.ignore_files)?;
    let allowed: Option<HashSet<String>> = config.files.as_ref().map(|files| {
        files
            .iter()
            .filter_map(|f| path_key(f, &cwd, config.absolute_path))
            .collect()
    });

    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for candidate in candidates {
        if candidate.contains("node_modules") {
            continue;
        }
        let Some(key) = path_key(candidate, &cwd, config.absolute_path) else {
            debug!(file = candidate.as_str(), "Skipping file outside the working directory");
            continue;
        };
        if let Some(allowed) = &allowed {
            if !allowed.contains(&key) {
                continue;
            }
        }
        if ignore.as_ref().is_some_and(|set| set.is_match(&key)) {
            debug!(file = key.as_str(), "Skipping ignored file");
            continue;
        }
        if seen.insert(key.clone()) {
            selected.push(key);
        }
    }

    Ok(selected)
}

/// Path key of `path`; `None` when relative mode would leave the working directory
fn path_key(path: &str, cwd: &str, absolute: bool) -> Option<String> {
    let absolute_path = if path.starts_with('/') {
        normalize_path(path)
    } else {
        normalize_path(&format!("{}/{}", cwd, path))
    };

    if absolute {
        return Some(absolute_path);
    }

    let relative = if absolute_path == cwd {
        String::new()
    } else if cwd == "/" {
        absolute_path.trim_start_matches('/').to_string()
    } else {
        absolute_path
            .strip_prefix(cwd)
            .and_then(|rest| rest.strip_prefix('/'))?
            .to_string()
    };

    (!relative.is_empty()).then_some(relative)
}

fn build_ignore_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CoverageError::InvalidGlob {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| CoverageError::InvalidGlob {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })
}
