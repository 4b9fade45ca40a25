//! Alias and variable expansion.
//!
//! Runs on one segment's tokens, in two ordered passes, before resolution:
//!
//! 1. Alias pass: only the command-name position is eligible, and it is
//!    expanded at most once (so `alias ls='ls -a'` cannot loop). The alias
//!    body is re-tokenized, so multi-word bodies splice in cleanly.
//! 2. Variable pass: every token is scanned for `$?` (last exit status),
//!    `$$` (interpreter pid) and `$NAME` (session environment, empty when
//!    unset). Substitution is textual and never alters token boundaries.
//!
//! Session State is read-only here.

use super::tokenizer;
use super::Shell;

/// Expand one segment's tokens in place.
pub fn expand_segment(shell: &Shell, tokens: &mut Vec<String>) {
    expand_alias(shell, tokens);
    for token in tokens.iter_mut() {
        *token = expand_vars(shell, token);
    }
}

fn expand_alias(shell: &Shell, tokens: &mut Vec<String>) {
    let Some(name) = tokens.first() else { return };
    let Some(body) = shell.aliases.get(name) else { return };

    let mut replacement = tokenizer::tokenize(body);
    if replacement.is_empty() {
        // Empty alias body: the command name just disappears.
        tokens.remove(0);
        return;
    }
    replacement.extend(tokens.iter().skip(1).cloned());
    *tokens = replacement;
}

/// Substitute `$`-references inside one token.
pub fn expand_vars(shell: &Shell, token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('?') => {
                chars.next();
                out.push_str(&shell.last_status.to_string());
            }
            Some('$') => {
                chars.next();
                out.push_str(&std::process::id().to_string());
            }
            Some(&first) if first.is_ascii_alphabetic() || first == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(value) = shell.env.get(&name) {
                    out.push_str(value);
                }
                // Unset variables expand to the empty string.
            }
            _ => out.push('$'),
        }
    }

    out
}
