//! Chain resolution.
//!
//! One input line is split into command segments at the chain operators
//! `;`, `&&` and `||`. Each segment carries the rule deciding whether it runs
//! given the previous segment's exit status:
//!
//! - `;`  → next segment always runs
//! - `&&` → next segment runs only if the previous one succeeded
//! - `||` → next segment runs only if the previous one failed
//!
//! Operators self-delimit: `ls;pwd` splits the same way as `ls ; pwd`.
//! Comments (`#` at line start or after whitespace) truncate the line before
//! chain resolution. Operators at the start or end of the line, or with no
//! command between them, are a parse error and abort the whole line.

use super::error::{Result, ShellError};
use super::tokenizer;

/// Conditional-execution rule attached to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainRule {
    Always,
    IfSuccess,
    IfFailure,
}

impl ChainRule {
    /// Whether a segment tagged with this rule may run after `prev_status`.
    pub fn permits(self, prev_status: i32) -> bool {
        match self {
            ChainRule::Always => true,
            ChainRule::IfSuccess => prev_status == 0,
            ChainRule::IfFailure => prev_status != 0,
        }
    }
}

/// One chain-delimited sub-command: its word tokens plus the rule under
/// which it executes.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub tokens: Vec<String>,
    pub rule: ChainRule,
}

/// Strip a trailing comment. `#` opens a comment only at the start of the
/// line or after whitespace, so `echo a#b` keeps its token intact.
pub fn strip_comment(line: &str) -> &str {
    let mut prev: Option<char> = None;
    for (i, c) in line.char_indices() {
        if c == '#' && prev.map_or(true, char::is_whitespace) {
            return &line[..i];
        }
        prev = Some(c);
    }
    line
}

/// Split one input line into executable segments.
///
/// A blank (or comment-only) line yields an empty vector. A malformed chain
/// yields `ShellError::Parse` and nothing executes.
pub fn split_chain(line: &str) -> Result<Vec<Segment>> {
    let line = strip_comment(line);

    let mut segments: Vec<Segment> = Vec::new();
    let mut current = String::new();
    let mut rule = ChainRule::Always;

    fn close(
        current: &mut String,
        rule: &mut ChainRule,
        next: ChainRule,
        op: &str,
        segments: &mut Vec<Segment>,
    ) -> Result<()> {
        let tokens = tokenizer::tokenize(current);
        if tokens.is_empty() {
            return Err(ShellError::Parse(op.to_string()));
        }
        segments.push(Segment { tokens, rule: *rule });
        *rule = next;
        current.clear();
        Ok(())
    }

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        match chars[i] {
            '&' if chars.get(i + 1) == Some(&'&') => {
                close(&mut current, &mut rule, ChainRule::IfSuccess, "&&", &mut segments)?;
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                close(&mut current, &mut rule, ChainRule::IfFailure, "||", &mut segments)?;
                i += 2;
            }
            ';' => {
                close(&mut current, &mut rule, ChainRule::Always, ";", &mut segments)?;
                i += 1;
            }
            c => {
                current.push(c);
                i += 1;
            }
        }
    }

    let tokens = tokenizer::tokenize(&current);
    if tokens.is_empty() {
        if segments.is_empty() {
            return Ok(Vec::new());
        }
        // Line ended on an operator.
        return Err(ShellError::Parse("newline".to_string()));
    }
    segments.push(Segment { tokens, rule });

    Ok(segments)
}
