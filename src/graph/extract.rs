//! Dependency edge extraction from top-level imports

use crate::graph::DependencyEdge;
use crate::syntax::SourceUnit;
use std::collections::HashSet;
use std::path::Path;

/// Candidate suffixes tried when resolving a local import, first match wins
const RESOLVE_SUFFIXES: &[&str] = &[
    ".ts",
    ".tsx",
    ".d.ts",
    "/index.ts",
    "/index.tsx",
    "/index.d.ts",
];

/// Resolves local module specifiers against the files of the current run
pub struct ImportResolver<'a> {
    known_files: &'a HashSet<String>,
    /// Working directory in relative path mode, used to relativize `/` imports
    root: Option<String>,
}

impl<'a> ImportResolver<'a> {
    /// Create a resolver
    ///
    /// # Arguments
    /// * `known_files` - Path keys of every file in the run
    /// * `root` - Working directory when paths are relative, `None` in absolute mode
    pub fn new(known_files: &'a HashSet<String>, root: Option<&Path>) -> Self {
        Self {
            known_files,
            root: root.map(|r| r.to_string_lossy().trim_end_matches('/').to_string()),
        }
    }

    /// Whether a specifier names a local file that belongs in the graph
    pub fn is_local(specifier: &str) -> bool {
        (specifier.starts_with('.') || specifier.starts_with('/'))
            && !specifier.ends_with(".json")
            && !specifier.ends_with(".node")
    }

    /// Resolve `specifier` imported from `importer`
    ///
    /// Returns the matching file key, or the normalized module path when no
    /// candidate exists. The latter never equals a known file, so edges to it
    /// take no part in invalidation.
    pub fn resolve(&self, importer: &str, specifier: &str) -> String {
        let module = self.module_path(importer, specifier);
        RESOLVE_SUFFIXES
            .iter()
            .map(|suffix| format!("{}{}", module, suffix))
            .find(|candidate| self.known_files.contains(candidate))
            .unwrap_or(module)
    }

    fn module_path(&self, importer: &str, specifier: &str) -> String {
        let joined = if specifier.starts_with('/') {
            specifier.to_string()
        } else {
            match importer.rsplit_once('/') {
                Some((dir, _)) => format!("{}/{}", dir, specifier),
                None => specifier.to_string(),
            }
        };
        let normalized = normalize_path(&joined);

        match &self.root {
            Some(root) if normalized.starts_with('/') => normalized
                .strip_prefix(root.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .map(str::to_string)
                .unwrap_or(normalized),
            _ => normalized,
        }
    }
}

/// Lexically normalize a `/`-separated path, resolving `.` and `..`
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Collect one edge per qualifying top-level import of every file
///
/// Imports of the same module twice yield two edges; duplicates are harmless
/// to invalidation.
pub fn collect_dependencies<'u>(
    files: impl IntoIterator<Item = (&'u str, &'u SourceUnit)>,
    resolver: &ImportResolver<'_>,
) -> Vec<DependencyEdge> {
    let mut edges = Vec::new();

    for (file, unit) in files {
        for statement in unit.statements() {
            let Some(specifier) = statement.import_specifier() else {
                continue;
            };
            if !ImportResolver::is_local(specifier) {
                continue;
            }
            edges.push(DependencyEdge::new(file, resolver.resolve(file, specifier)));
        }
    }

    edges
}
