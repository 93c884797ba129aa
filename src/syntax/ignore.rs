//! Ignore-region scanner
//!
//! Marks lines excluded from counting with `type-coverage:ignore-line`
//! (the comment's own line) or `type-coverage:ignore-next-line` (the line
//! after the comment).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static IGNORE_DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?://|/\*)\s*type-coverage:ignore-(next-line|line)\b")
        .expect("ignore directive regex should be valid")
});

/// Collect the 0-based lines that must not be counted
pub fn collect_ignore_lines(source: &str) -> HashSet<usize> {
    let mut ignored = HashSet::new();
    for (line_num, line) in source.lines().enumerate() {
        for caps in IGNORE_DIRECTIVE_RE.captures_iter(line) {
            match caps.get(1).map(|m| m.as_str()) {
                Some("next-line") => {
                    ignored.insert(line_num + 1);
                }
                Some(_) => {
                    ignored.insert(line_num);
                }
                None => {}
            }
        }
    }
    ignored
}
