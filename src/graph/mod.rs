//! Import-based dependency graph
//!
//! A file's cached result is only as fresh as the files it imports. Edges
//! are extracted from top-level imports and used to clear the cache of every
//! direct and indirect dependent of a changed file.

mod extract;
mod invalidate;

pub use extract::{collect_dependencies, normalize_path, ImportResolver};
pub use invalidate::{invalidate, DependencyGraph};

/// Directed edge: `dependent`'s result depends on `dependency`'s content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    pub dependent: String,
    /// Resolved file key, or an unresolved module path
    pub dependency: String,
}

impl DependencyEdge {
    pub fn new(dependent: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self {
            dependent: dependent.into(),
            dependency: dependency.into(),
        }
    }
}
