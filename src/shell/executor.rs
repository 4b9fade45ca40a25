//! Segment dispatch and process launch.
//!
//! A resolved builtin runs in-process against Session State; an external
//! program is spawned with the segment's argv and the session environment,
//! and the interpreter blocks until it terminates. Either way the result is
//! the numeric exit status the chain logic consumes next.

use std::io;
use std::process::{Command, Stdio};

use super::error::{Result, ShellError};
use super::path::{self, Resolved};
use super::Shell;

/// Run one expanded segment and return its exit status.
pub fn run(shell: &mut Shell, argv: &[String]) -> Result<i32> {
    // A segment whose command name expanded away is a no-op.
    let Some(name) = argv.first().filter(|n| !n.is_empty()) else {
        return Ok(0);
    };

    match path::resolve_command(shell, name)? {
        Resolved::Builtin(builtin) => {
            let stdout = io::stdout();
            let stderr = io::stderr();
            let mut out = stdout.lock();
            let mut err = stderr.lock();
            builtin.run(shell, &argv[1..], &mut out, &mut err)
        }
        Resolved::External(program) => spawn_and_wait(shell, name, &program, &argv[1..]),
    }
}

/// Spawn the external program and block until it terminates. The child sees
/// the session environment (materialized at spawn time) and the session cwd;
/// stdio is inherited, so terminal signals reach the foreground child
/// directly.
fn spawn_and_wait(
    shell: &Shell,
    name: &str,
    program: &std::path::Path,
    args: &[String],
) -> Result<i32> {
    let mut child = Command::new(program)
        .args(args)
        .env_clear()
        .envs(&shell.env)
        .current_dir(&shell.cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ShellError::CommandNotFound(name.to_string()),
            io::ErrorKind::PermissionDenied => ShellError::PermissionDenied(name.to_string()),
            _ => ShellError::SpawnFailure {
                name: name.to_string(),
                source: e,
            },
        })?;

    let status = child.wait()?;
    Ok(exit_status_code(&status))
}

/// Translate a wait status into the pipeline's numeric convention:
/// normal exit → its code, death by signal → 128 + signal number.
fn exit_status_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
