//! Command history.
//!
//! The session keeps an append-ordered list of entries; the on-disk form is
//! one raw line per record at `~/.minishell_history`. Loading a file rebuilds
//! the list with sequence numbers densely renumbered from 0; entries appended
//! during the live session continue from the current maximum. The file is
//! rewritten at shutdown, capped to the newest [`HIST_MAX`] entries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum number of entries kept on disk.
pub const HIST_MAX: usize = 4096;

const HIST_FILE: &str = ".minishell_history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub num: usize,
    pub line: String,
}

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, numbering it one past the current maximum.
    pub fn push(&mut self, line: &str) {
        let num = self.entries.last().map_or(0, |e| e.num + 1);
        self.entries.push(HistoryEntry {
            num,
            line: line.to_string(),
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the list from a history file. Missing file → empty history.
    /// Sequence numbers are assigned densely from 0 in file order; when the
    /// file exceeds [`HIST_MAX`] only the newest entries are kept.
    pub fn load(path: &Path) -> io::Result<History> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(History::new()),
            Err(e) => return Err(e),
        };

        let lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).collect();
        let skip = lines.len().saturating_sub(HIST_MAX);
        let entries = lines
            .into_iter()
            .skip(skip)
            .enumerate()
            .map(|(num, line)| HistoryEntry {
                num,
                line: line.to_string(),
            })
            .collect();

        Ok(History { entries })
    }

    /// Rewrite the history file with the newest [`HIST_MAX`] entries.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let skip = self.entries.len().saturating_sub(HIST_MAX);
        let mut out = String::new();
        for entry in &self.entries[skip..] {
            out.push_str(&entry.line);
            out.push('\n');
        }
        fs::write(path, out)
    }
}

/// Per-user history file location.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HIST_FILE))
}
