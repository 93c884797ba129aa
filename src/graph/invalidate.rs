//! Transitive cache invalidation over the dependency graph

use crate::graph::DependencyEdge;
use std::collections::HashMap;
use tracing::debug;

/// Reverse index from a dependency to the files that import it
#[derive(Debug, Default)]
pub struct DependencyGraph<'e> {
    dependents: HashMap<&'e str, Vec<&'e str>>,
}

impl<'e> DependencyGraph<'e> {
    pub fn new(edges: &'e [DependencyEdge]) -> Self {
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in edges {
            dependents
                .entry(edge.dependency.as_str())
                .or_default()
                .push(edge.dependent.as_str());
        }
        Self { dependents }
    }

    /// Files with an edge pointing at `file`
    pub fn dependents_of(&self, file: &str) -> &[&'e str] {
        self.dependents.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clear the cache slot of every direct and indirect dependent of `seed`
    ///
    /// A dependent is only cleared, and only traversed further, while its slot
    /// still holds a record. Already cleared files stop the walk, which also
    /// terminates cycles. Returns the number of slots cleared.
    pub fn invalidate<T>(&self, seed: &str, records: &mut HashMap<String, Option<T>>) -> usize {
        let mut cleared = 0;
        let mut pending = vec![seed];

        while let Some(file) = pending.pop() {
            for &dependent in self.dependents_of(file) {
                let Some(slot) = records.get_mut(dependent) else {
                    continue;
                };
                if slot.take().is_some() {
                    debug!(file = dependent, changed = file, "Invalidated cached result");
                    cleared += 1;
                    pending.push(dependent);
                }
            }
        }

        cleared
    }
}

/// Clear the cache slots of all dependents of `seed`
///
/// Convenience wrapper that indexes `edges` for a single invalidation.
pub fn invalidate<T>(
    seed: &str,
    edges: &[DependencyEdge],
    records: &mut HashMap<String, Option<T>>,
) -> usize {
    DependencyGraph::new(edges).invalidate(seed, records)
}
