//! Word splitting.
//!
//! A token is a maximal run of non-delimiter characters; any run of delimiter
//! characters acts as a single separator. There is no quoting or escaping, so
//! a delimiter can never appear inside a token.

/// Default delimiter set: ASCII whitespace.
pub const DEFAULT_DELIMS: &str = " \t\r\n";

/// Lazy token iterator over a line. `Clone` restarts the walk from wherever
/// the clone was taken.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
    delims: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest;
        let start = rest.find(|c| !self.delims.contains(c))?;
        let rest = &rest[start..];
        let end = rest
            .find(|c| self.delims.contains(c))
            .unwrap_or(rest.len());
        self.rest = &rest[end..];
        Some(&rest[..end])
    }
}

/// Iterate the tokens of `line` using an explicit delimiter set.
pub fn tokens<'a>(line: &'a str, delims: &'a str) -> Tokens<'a> {
    Tokens { rest: line, delims }
}

/// Split `line` on whitespace into owned tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    tokens(line, DEFAULT_DELIMS).map(str::to_string).collect()
}
