//! Pattern-based analyzer used by the command line tool
//!
//! Without a type checker the only types visible are the ones written down,
//! so this analyzer counts explicit type annotations and, in strict mode,
//! type assertions:
//! - `: any` is an `any` finding, `: Promise<any>` a `contains-any` finding
//! - `x as T` is an `unsafe-as-assertion` (`as const` is fine)
//! - `<T>x` is an `unsafe-type-assertion`
//! - `x!` is an `unsafe-non-null-assertion`
//!
//! Inferred types are invisible to it. Plug a real checker in through the
//! [`Analyzer`] trait when exact coverage matters.

use crate::analyzer::{Analyzer, FileContext};
use crate::core::FindingKind;
use crate::syntax::{Statement, StatementKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static ANNOTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w$)\]?]\s*:\s*([A-Za-z_$][\w$.]*(?:\s*<[^;={}()]*>)?(?:\[\])*)")
        .expect("annotation regex should be valid")
});

static AS_ASSERTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bas\s+([A-Za-z_$][\w$.]*(?:\s*<[^;={}()]*>)?(?:\[\])*)")
        .expect("as assertion regex should be valid")
});

static TYPE_ASSERTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[=(,:\s])(<([A-Za-z_$][\w$.]*(?:\[\])*)>)\s*[\w$]")
        .expect("type assertion regex should be valid")
});

static NON_NULL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w$)\]](!)(?:[^=]|$)").expect("non-null regex should be valid")
});

static CONTAINS_ANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bany\b").expect("any regex should be valid"));

static REEXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^export\s+(?:type\s+)?(?:\{|\*)").expect("re-export regex should be valid")
});

/// Words that can follow a colon without being a type
const NOT_A_TYPE: &[&str] = &[
    "await", "break", "case", "continue", "default", "delete", "do", "for", "if", "new",
    "return", "switch", "throw", "try", "while", "yield",
];

/// Annotation and assertion counting analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalAnalyzer;

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn check_annotations(&self, statement: &Statement, context: &mut FileContext<'_>) {
        for caps in ANNOTATION_RE.captures_iter(&statement.code) {
            let Some(ty) = caps.get(1) else { continue };
            let type_text = ty.as_str().trim();
            let head = type_text.split(|c: char| !c.is_alphanumeric() && c != '_' && c != '$');
            if head.take(1).any(|word| NOT_A_TYPE.contains(&word)) {
                continue;
            }

            let kind = if type_text == "any" {
                FindingKind::Any
            } else if CONTAINS_ANY_RE.is_match(type_text) {
                FindingKind::ContainsAny
            } else {
                context.collect_correct();
                continue;
            };
            let (line, character) =
                statement.position_of(char_offset(&statement.code, ty.start()));
            context.collect_any(line, character, kind, type_text);
        }
    }

    fn check_assertions(&self, statement: &Statement, context: &mut FileContext<'_>) {
        for caps in AS_ASSERTION_RE.captures_iter(&statement.code) {
            let (Some(whole), Some(ty)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let type_text = ty.as_str().trim();
            if type_text == "const" {
                continue;
            }
            let kind = if type_text == "any" {
                FindingKind::Any
            } else {
                FindingKind::UnsafeAs
            };
            let (line, character) =
                statement.position_of(char_offset(&statement.code, whole.start()));
            context.collect_any(line, character, kind, whole.as_str());
        }

        for caps in TYPE_ASSERTION_RE.captures_iter(&statement.code) {
            let (Some(assertion), Some(ty)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let kind = if ty.as_str() == "any" {
                FindingKind::Any
            } else {
                FindingKind::UnsafeTypeAssertion
            };
            let (line, character) =
                statement.position_of(char_offset(&statement.code, assertion.start()));
            context.collect_any(line, character, kind, assertion.as_str());
        }

        for caps in NON_NULL_RE.captures_iter(&statement.code) {
            let Some(bang) = caps.get(1) else { continue };
            let (line, character) =
                statement.position_of(char_offset(&statement.code, bang.start()));
            context.collect_any(line, character, FindingKind::UnsafeNonNull, "!");
        }
    }
}

impl Analyzer for LexicalAnalyzer {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn check_statement(&self, statement: &Statement, context: &mut FileContext<'_>) {
        if statement.kind != StatementKind::Other {
            return;
        }
        trace!(file = context.file, line = statement.line, "Checking statement");

        self.check_annotations(statement, context);

        if context.strict && !REEXPORT_RE.is_match(&statement.code) {
            self.check_assertions(statement, context);
        }
    }
}

/// Convert a byte offset from a regex match into a char offset
fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}
