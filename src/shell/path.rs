//! Command resolution.
//!
//! Maps an expanded command name to something runnable. Builtins win over
//! external programs of the same name. A name containing `/` is tried
//! directly as a path; anything else is searched through the directories of
//! the session's `PATH` value (not the process environment — the session map
//! is the single source of truth).

use std::path::{Path, PathBuf};

use super::builtin::Builtin;
use super::error::{Result, ShellError};
use super::Shell;

/// Outcome of resolving a command name.
#[derive(Debug)]
pub enum Resolved {
    Builtin(Builtin),
    External(PathBuf),
}

/// Resolve `name` to a builtin or an executable path.
pub fn resolve_command(shell: &Shell, name: &str) -> Result<Resolved> {
    if let Some(builtin) = Builtin::lookup(name) {
        return Ok(Resolved::Builtin(builtin));
    }

    if name.contains('/') {
        return resolve_direct(shell, name).map(Resolved::External);
    }

    which::which_in(name, shell.env.get("PATH"), &shell.cwd)
        .map(Resolved::External)
        .map_err(|_| ShellError::CommandNotFound(name.to_string()))
}

/// A name with a path separator skips the PATH search entirely.
fn resolve_direct(shell: &Shell, name: &str) -> Result<PathBuf> {
    let path = if Path::new(name).is_absolute() {
        PathBuf::from(name)
    } else {
        shell.cwd.join(name)
    };

    if !path.exists() {
        return Err(ShellError::CommandNotFound(name.to_string()));
    }
    if path.is_dir() || !is_executable(&path) {
        return Err(ShellError::PermissionDenied(name.to_string()));
    }
    Ok(path)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Expand a leading `~` / `~/...` against the session's `HOME`. Used by `cd`.
pub fn expand_tilde(shell: &Shell, arg: &str) -> PathBuf {
    if arg == "~" {
        if let Some(home) = shell.env.get("HOME") {
            return PathBuf::from(home);
        }
    } else if let Some(rest) = arg.strip_prefix("~/") {
        if let Some(home) = shell.env.get("HOME") {
            return Path::new(home).join(rest);
        }
    }
    PathBuf::from(arg)
}
