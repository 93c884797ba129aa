//! Top-level statement scanner for TypeScript sources
//!
//! Works in two passes. The first pass masks comments and the contents of
//! string and template literals with spaces, keeping every newline, so that
//! offsets in the masked text line up with the original. The second pass
//! splits the masked text into top-level statements by tracking bracket
//! depth.

/// Statement start keywords that end a pending statement at a line break
const STATEMENT_KEYWORDS: &[&str] = &[
    "abstract",
    "async",
    "class",
    "const",
    "declare",
    "enum",
    "export",
    "function",
    "import",
    "interface",
    "let",
    "module",
    "namespace",
    "type",
    "var",
];

/// Characters after which a line break never ends a statement
const CONTINUATION_CHARS: &[char] = &[
    ',', '=', '+', '-', '*', '/', '%', '(', '[', '{', '&', '|', '?', ':', '<', '>', '.', '!',
];

/// A span of source covering one top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    /// Original source text
    pub text: String,
    /// Source text with comments and literal contents blanked out
    pub code: String,
    /// 0-based line of the first character
    pub line: usize,
    /// 0-based column of the first character
    pub character: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskState {
    Code,
    LineComment,
    BlockComment,
    Str(char),
}

/// Blank out comments and literal contents, preserving length and newlines
pub fn mask_source(chars: &[char]) -> Vec<char> {
    let mut masked = Vec::with_capacity(chars.len());
    let mut state = MaskState::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match state {
            MaskState::Code => {
                if c == '/' && next == Some('/') {
                    state = MaskState::LineComment;
                    masked.push(' ');
                } else if c == '/' && next == Some('*') {
                    state = MaskState::BlockComment;
                    masked.extend([' ', ' ']);
                    i += 2;
                    continue;
                } else if c == '\'' || c == '"' || c == '`' {
                    state = MaskState::Str(c);
                    masked.push(c);
                } else {
                    masked.push(c);
                }
            }
            MaskState::LineComment => {
                if c == '\n' {
                    state = MaskState::Code;
                    masked.push('\n');
                } else {
                    masked.push(' ');
                }
            }
            MaskState::BlockComment => {
                if c == '*' && next == Some('/') {
                    state = MaskState::Code;
                    masked.extend([' ', ' ']);
                    i += 2;
                    continue;
                }
                masked.push(if c == '\n' { '\n' } else { ' ' });
            }
            MaskState::Str(quote) => {
                if c == '\\' && next.is_some() {
                    masked.push(' ');
                    masked.push(if next == Some('\n') { '\n' } else { ' ' });
                    i += 2;
                    continue;
                }
                if c == quote {
                    state = MaskState::Code;
                    masked.push(c);
                } else if c == '\n' {
                    // Unterminated single-line string; recover at the line break
                    if quote != '`' {
                        state = MaskState::Code;
                    }
                    masked.push('\n');
                } else {
                    masked.push(' ');
                }
            }
        }
        i += 1;
    }

    masked
}

/// Split source text into top-level statements
pub fn split_statements(source: &str) -> Vec<RawStatement> {
    let chars: Vec<char> = source.chars().collect();
    let masked = mask_source(&chars);

    let mut statements = Vec::new();
    let mut depth: i32 = 0;
    let mut start: Option<usize> = None;
    let mut start_pos = (0usize, 0usize);
    let mut line = 0usize;
    let mut column = 0usize;

    let mut i = 0;
    while i < masked.len() {
        let c = masked[i];

        if start.is_none() && !c.is_whitespace() {
            start = Some(i);
            start_pos = (line, column);
        }

        if let Some(begin) = start {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = (depth - 1).max(0),
                ';' if depth == 0 => {
                    statements.push(make_statement(&chars, &masked, begin, i + 1, start_pos));
                    start = None;
                }
                '\n' if depth == 0 && ends_at_line_break(&masked, begin, i) => {
                    statements.push(make_statement(&chars, &masked, begin, i, start_pos));
                    start = None;
                }
                _ => {}
            }
        }

        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
        i += 1;
    }

    if let Some(begin) = start {
        statements.push(make_statement(&chars, &masked, begin, masked.len(), start_pos));
    }

    statements
}

/// Decide whether a depth-0 line break at `at` terminates the statement
fn ends_at_line_break(masked: &[char], begin: usize, at: usize) -> bool {
    let last = masked[begin..at].iter().rev().find(|c| !c.is_whitespace());
    let Some(&last) = last else {
        return false;
    };
    // `Array<string>` closes a type, `=>` continues into an arrow body
    let closes_type_arguments = last == '>' && !ends_with_arrow(&masked[begin..at]);
    if CONTINUATION_CHARS.contains(&last) && !closes_type_arguments {
        return false;
    }

    let rest: String = masked[at..]
        .iter()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| !c.is_whitespace() && **c != '(' && **c != '{' && **c != '<')
        .collect();

    // Nothing follows: the statement ends with the file
    if rest.is_empty() {
        return true;
    }
    if rest.starts_with('.') || rest.starts_with('?') || rest.starts_with(')') {
        return false;
    }

    if last == '}' {
        return !matches!(rest.as_str(), "else" | "catch" | "finally" | "while");
    }

    STATEMENT_KEYWORDS.contains(&rest.as_str())
}

fn ends_with_arrow(span: &[char]) -> bool {
    let mut significant = span.iter().rev().filter(|c| !c.is_whitespace());
    matches!((significant.next(), significant.next()), (Some('>'), Some('=')))
}

fn make_statement(
    chars: &[char],
    masked: &[char],
    begin: usize,
    end: usize,
    (line, character): (usize, usize),
) -> RawStatement {
    let trimmed_end = begin
        + masked[begin..end]
            .iter()
            .rposition(|c| !c.is_whitespace())
            .map_or(0, |p| p + 1);
    RawStatement {
        text: chars[begin..trimmed_end].iter().collect(),
        code: masked[begin..trimmed_end].iter().collect(),
        line,
        character,
    }
}
