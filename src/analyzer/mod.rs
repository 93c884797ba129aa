//! Analyzer interface
//!
//! The pipeline does not decide what is a "correct" node. It hands every
//! top-level statement of a file to an [`Analyzer`], which accumulates counts
//! and findings into a [`FileContext`].

mod lexical;

use crate::core::{Finding, FindingKind};
use crate::syntax::{SourceUnit, Statement};

pub use lexical::LexicalAnalyzer;

/// Counts and findings produced for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileResult {
    pub correct_count: usize,
    pub total_count: usize,
    pub findings: Vec<Finding>,
}

/// A diagnostic reported by a semantic checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticDiagnostic {
    pub line: usize,
    pub character: usize,
    pub message: String,
}

/// Per-file accumulator passed to the analyzer
pub struct FileContext<'a> {
    pub file: &'a str,
    pub unit: &'a SourceUnit,
    pub strict: bool,
    pub result: FileResult,
}

impl<'a> FileContext<'a> {
    pub fn new(file: &'a str, unit: &'a SourceUnit, strict: bool) -> Self {
        Self {
            file,
            unit,
            strict,
            result: FileResult::default(),
        }
    }

    /// Count a site whose type is fine
    pub fn collect_correct(&mut self) {
        self.result.total_count += 1;
        self.result.correct_count += 1;
    }

    /// Count an unsafe site
    ///
    /// Sites on lines covered by an ignore directive count as correct and
    /// produce no finding. Returns whether a finding was recorded.
    pub fn collect_any(
        &mut self,
        line: usize,
        character: usize,
        kind: FindingKind,
        text: &str,
    ) -> bool {
        if self.unit.ignore_lines().contains(&line) {
            self.collect_correct();
            return false;
        }
        self.result.total_count += 1;
        self.result
            .findings
            .push(Finding::new(line, character, kind, text));
        true
    }

    pub fn into_result(self) -> FileResult {
        self.result
    }
}

/// Per-node semantic analyzer
///
/// Implementations must be shareable across the analysis thread pool.
pub trait Analyzer: Send + Sync {
    /// Name of this analyzer (used for logging)
    fn name(&self) -> &'static str;

    /// Inspect one top-level statement and update the context
    fn check_statement(&self, statement: &Statement, context: &mut FileContext<'_>);

    /// Semantic diagnostics for a file; only consulted when
    /// `report_semantic_error` is enabled
    fn semantic_diagnostics(&self, _file: &str, _unit: &SourceUnit) -> Vec<SemanticDiagnostic> {
        Vec::new()
    }
}

/// Run an analyzer over every top-level statement of a file
pub fn analyze_file(
    analyzer: &dyn Analyzer,
    file: &str,
    unit: &SourceUnit,
    strict: bool,
) -> FileResult {
    let mut context = FileContext::new(file, unit, strict);
    for statement in unit.statements() {
        analyzer.check_statement(statement, &mut context);
    }
    context.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingAnalyzer;

    impl Analyzer for CountingAnalyzer {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn check_statement(&self, statement: &Statement, context: &mut FileContext<'_>) {
            if statement.text.contains("any") {
                context.collect_any(statement.line, statement.character, FindingKind::Any, "any");
            } else {
                context.collect_correct();
            }
        }
    }

    #[test]
    fn test_analyze_file_visits_every_statement() {
        let unit = SourceUnit::parse("let a = 1;\nlet b: any = 2;\nlet c = 3;");
        let result = analyze_file(&CountingAnalyzer, "a.ts", &unit, false);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].line, 1);
    }

    #[test]
    fn test_ignored_line_counts_as_correct() {
        let unit = SourceUnit::parse("// type-coverage:ignore-next-line\nlet b: any = 2;");
        let result = analyze_file(&CountingAnalyzer, "a.ts", &unit, false);
        assert_eq!(result.total_count, 1);
        assert_eq!(result.correct_count, 1);
        assert!(result.findings.is_empty());
    }
}
