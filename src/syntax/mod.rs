//! Lightweight syntax layer for TypeScript sources
//!
//! This is not a parser. It splits a file into top-level statements and
//! recognizes the two import forms the dependency graph cares about:
//! - import-equals: `import fs = require('./fs')`
//! - import declarations: `import { a } from './a'`, `import './side-effect'`
//!
//! Everything else is an opaque [`StatementKind::Other`] that analyzers may
//! inspect through its text.

mod ignore;
mod scanner;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub use ignore::collect_ignore_lines;
pub use scanner::{mask_source, split_statements, RawStatement};

static IMPORT_EQUALS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s+(?:type\s+)?[A-Za-z_$][\w$]*\s*=\s*require\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
        .expect("import-equals regex should be valid")
});

static IMPORT_DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^import\s*(?:[^'"]*?\bfrom\s*)?['"]([^'"]+)['"]"#)
        .expect("import declaration regex should be valid")
});

/// Classification of a top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// `import name = require('specifier')`
    ImportEquals { specifier: String },
    /// `import ... from 'specifier'` or `import 'specifier'`
    ImportDeclaration { specifier: String },
    Other,
}

/// A top-level statement of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Original source text
    pub text: String,
    /// Text with comments and literal contents replaced by spaces
    pub code: String,
    /// 0-based line of the first character
    pub line: usize,
    /// 0-based column of the first character
    pub character: usize,
}

impl Statement {
    fn from_raw(raw: RawStatement) -> Self {
        let kind = classify(&raw);
        Self {
            kind,
            text: raw.text,
            code: raw.code,
            line: raw.line,
            character: raw.character,
        }
    }

    /// Module specifier of an import statement
    pub fn import_specifier(&self) -> Option<&str> {
        match &self.kind {
            StatementKind::ImportEquals { specifier }
            | StatementKind::ImportDeclaration { specifier } => Some(specifier),
            StatementKind::Other => None,
        }
    }

    /// Map an offset into [`Statement::code`] to a 0-based (line, character)
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let mut line = self.line;
        let mut character = self.character;
        for c in self.code.chars().take(offset) {
            if c == '\n' {
                line += 1;
                character = 0;
            } else {
                character += 1;
            }
        }
        (line, character)
    }
}

fn classify(raw: &RawStatement) -> StatementKind {
    if !raw.code.starts_with("import") {
        return StatementKind::Other;
    }
    if let Some(caps) = IMPORT_EQUALS_RE.captures(&raw.text) {
        return StatementKind::ImportEquals {
            specifier: caps[1].to_string(),
        };
    }
    if let Some(caps) = IMPORT_DECLARATION_RE.captures(&raw.text) {
        return StatementKind::ImportDeclaration {
            specifier: caps[1].to_string(),
        };
    }
    StatementKind::Other
}

/// A scanned source file: the "parsed unit" handed to analyzers
#[derive(Debug, Clone)]
pub struct SourceUnit {
    statements: Vec<Statement>,
    ignore_lines: HashSet<usize>,
}

impl SourceUnit {
    /// Scan source text into top-level statements and ignore regions
    pub fn parse(source: &str) -> Self {
        let statements = split_statements(source)
            .into_iter()
            .map(Statement::from_raw)
            .collect();
        Self {
            statements,
            ignore_lines: collect_ignore_lines(source),
        }
    }

    /// Direct top-level statements, in source order
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Lines excluded from counting by ignore directives
    pub fn ignore_lines(&self) -> &HashSet<usize> {
        &self.ignore_lines
    }
}
