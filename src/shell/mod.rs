//! Interpreter core.
//!
//! [`Shell`] owns the per-run session state: the working copies of the
//! environment, the alias table, the history list and the last exit status.
//! One instance lives for the whole run; every pipeline stage reads or
//! mutates it through the methods here.

pub mod builtin;
pub mod error;
pub mod executor;
pub mod expand;
pub mod history;
pub mod parser;
pub mod path;
pub mod tokenizer;

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use error::ShellError;
use history::History;

/// Session state for one interpreter run.
pub struct Shell {
    /// Working copy of the environment, exported to every spawned child.
    /// Single source of truth for `$NAME` expansion, the `env`/`setenv`/
    /// `unsetenv` builtins and the PATH search.
    pub env: HashMap<String, String>,
    /// Alias table; redefinition overwrites in place.
    pub aliases: HashMap<String, String>,
    /// Append-ordered command history.
    pub history: History,
    /// Current working directory.
    pub cwd: PathBuf,
    /// Exit status of the most recently completed segment (for `$?` and
    /// chain decisions).
    pub last_status: i32,
    /// 1-based input line counter, for diagnostics.
    pub line_count: usize,
    /// Program name used in error reports.
    pub progname: String,
    /// Set by the `exit` builtin; the run loop stops reading input.
    pub should_exit: bool,
    /// Explicit status passed to `exit`, if any.
    pub exit_code: Option<i32>,
}

impl Shell {
    /// Build a session from the inherited process environment.
    pub fn new() -> Result<Self> {
        let progname = env::args()
            .next()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        Ok(Self {
            env: env::vars().collect(),
            aliases: HashMap::new(),
            history: History::new(),
            cwd: env::current_dir()?,
            last_status: 0,
            line_count: 0,
            progname,
            should_exit: false,
            exit_code: None,
        })
    }

    /// Interpret one input line: chain-split, then expand/resolve/dispatch
    /// each segment whose rule permits it. Errors are reported here and
    /// become the new exit status; they never escape the line.
    pub fn execute(&mut self, line: &str) {
        self.line_count += 1;

        let segments = match parser::split_chain(line) {
            Ok(segments) => segments,
            Err(e) => {
                self.last_status = e.status();
                self.report(&e);
                return;
            }
        };

        for segment in &segments {
            if !segment.rule.permits(self.last_status) {
                continue;
            }

            let mut argv = segment.tokens.clone();
            expand::expand_segment(self, &mut argv);

            self.last_status = match executor::run(self, &argv) {
                Ok(code) => code,
                Err(e) => {
                    self.report(&e);
                    e.status()
                }
            };

            if self.should_exit {
                break;
            }
        }
    }

    /// Status the interpreter process should exit with.
    pub fn exit_status(&self) -> i32 {
        self.exit_code.unwrap_or(self.last_status)
    }

    /// Report an error with program name and line context, original-style:
    /// `minishell: 1: qwerty: not found`.
    pub fn report(&self, err: &ShellError) {
        eprintln!("{}: {}: {}", self.progname, self.line_count, err);
    }

    /// Interactive prompt.
    pub fn prompt(&self) -> String {
        fn shorten(s: &str, max: usize) -> String {
            if s.chars().count() <= max {
                return s.to_string();
            }
            let head: String = s.chars().take(max / 2).collect();
            let tail: String = s
                .chars()
                .rev()
                .take(max / 2 - 1)
                .collect::<String>()
                .chars()
                .rev()
                .collect();
            format!("{}…{}", head, tail)
        }

        let cwd = shorten(&self.cwd.display().to_string(), 48);
        format!(
            "{} {}$ ",
            env!("CARGO_PKG_NAME").bright_cyan().bold(),
            cwd.white()
        )
    }
}
