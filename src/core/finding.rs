//! Findings reported by an analyzer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a finding
///
/// Serialized as a kebab-case string. Kinds this crate does not know are
/// preserved verbatim so caches written by other analyzers survive a round
/// trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FindingKind {
    /// Explicit or inferred `any`
    Any,
    /// A type containing `any`, e.g. `Promise<any>`
    ContainsAny,
    /// `foo as Bar`
    UnsafeAs,
    /// `<Bar>foo`
    UnsafeTypeAssertion,
    /// `foo!`
    UnsafeNonNull,
    /// Diagnostic reported by the semantic diagnostics source
    SemanticError,
    /// Analyzer-defined kind
    Other(String),
}

impl FindingKind {
    pub fn as_str(&self) -> &str {
        match self {
            FindingKind::Any => "any",
            FindingKind::ContainsAny => "contains-any",
            FindingKind::UnsafeAs => "unsafe-as-assertion",
            FindingKind::UnsafeTypeAssertion => "unsafe-type-assertion",
            FindingKind::UnsafeNonNull => "unsafe-non-null-assertion",
            FindingKind::SemanticError => "semantic-error",
            FindingKind::Other(name) => name,
        }
    }
}

impl From<String> for FindingKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "any" => FindingKind::Any,
            "contains-any" => FindingKind::ContainsAny,
            "unsafe-as-assertion" => FindingKind::UnsafeAs,
            "unsafe-type-assertion" => FindingKind::UnsafeTypeAssertion,
            "unsafe-non-null-assertion" => FindingKind::UnsafeNonNull,
            "semantic-error" => FindingKind::SemanticError,
            _ => FindingKind::Other(value),
        }
    }
}

impl From<FindingKind> for String {
    fn from(kind: FindingKind) -> Self {
        match kind {
            FindingKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported location within a file (0-based line and character)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub line: usize,
    pub character: usize,
    pub kind: FindingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Finding {
    pub fn new(line: usize, character: usize, kind: FindingKind, text: impl Into<String>) -> Self {
        Self {
            line,
            character,
            kind,
            text: Some(text.into()),
        }
    }
}

/// A finding annotated with the file it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFinding {
    pub file: String,
    #[serde(flatten)]
    pub finding: Finding,
}
