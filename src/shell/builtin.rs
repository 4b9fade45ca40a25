//! Built-in commands.
//!
//! Builtins run in-process against Session State and always take precedence
//! over external programs of the same name. Dispatch goes through the
//! [`Builtin`] enum: one lookup, one `run` call site.
//!
//! Output goes to injected streams so tests can capture it.

use std::env;
use std::io::Write;
use std::path::PathBuf;

use super::error::{Result, ShellError};
use super::path;
use super::Shell;

/// The fixed builtin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Cd,
    Help,
    Alias,
    Env,
    Setenv,
    Unsetenv,
    History,
}

impl Builtin {
    pub const ALL: [Builtin; 8] = [
        Builtin::Exit,
        Builtin::Cd,
        Builtin::Help,
        Builtin::Alias,
        Builtin::Env,
        Builtin::Setenv,
        Builtin::Unsetenv,
        Builtin::History,
    ];

    /// Exact-name lookup.
    pub fn lookup(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Cd => "cd",
            Builtin::Help => "help",
            Builtin::Alias => "alias",
            Builtin::Env => "env",
            Builtin::Setenv => "setenv",
            Builtin::Unsetenv => "unsetenv",
            Builtin::History => "history",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Builtin::Exit => "exit [n]          Exit the shell with status n (default: last status)",
            Builtin::Cd => "cd [dir|-|~]      Change directory; - returns to OLDPWD",
            Builtin::Help => "help [topic]      Show help for builtins",
            Builtin::Alias => "alias [n[=v] ..]  List, show or define aliases",
            Builtin::Env => "env               List environment variables",
            Builtin::Setenv => "setenv NAME VAL   Set an environment variable",
            Builtin::Unsetenv => "unsetenv NAME     Remove an environment variable",
            Builtin::History => "history           Show the command history",
        }
    }

    /// Run the builtin. The returned value is the segment's exit status;
    /// argument validation failures surface as [`ShellError`] and are mapped
    /// to a status at the segment boundary.
    pub fn run(
        self,
        shell: &mut Shell,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<i32> {
        match self {
            Builtin::Exit => builtin_exit(shell, args),
            Builtin::Cd => builtin_cd(shell, args, out),
            Builtin::Help => builtin_help(args, out),
            Builtin::Alias => builtin_alias(shell, args, out, err),
            Builtin::Env => builtin_env(shell, out),
            Builtin::Setenv => builtin_setenv(shell, args),
            Builtin::Unsetenv => builtin_unsetenv(shell, args),
            Builtin::History => builtin_history(shell, out),
        }
    }
}

/// exit - leave the session, flushing history on the way out (the run loop
/// performs the flush once the flag is set).
fn builtin_exit(shell: &mut Shell, args: &[String]) -> Result<i32> {
    let code = match args.first() {
        None => shell.last_status,
        Some(arg) => arg
            .parse::<i32>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| ShellError::InvalidArgument(format!("exit: Illegal number: {}", arg)))?,
    };
    shell.should_exit = true;
    shell.exit_code = Some(code);
    Ok(code)
}

/// cd - change working directory and maintain PWD/OLDPWD.
fn builtin_cd(shell: &mut Shell, args: &[String], out: &mut dyn Write) -> Result<i32> {
    let mut announce = false;
    let target = match args.first().map(String::as_str) {
        None => match shell.env.get("HOME") {
            Some(home) => PathBuf::from(home),
            // HOME unset: silent no-op, like the original.
            None => return Ok(0),
        },
        Some("-") => {
            let old = shell.env.get("OLDPWD").cloned().ok_or_else(|| {
                ShellError::InvalidArgument("cd: OLDPWD not set".to_string())
            })?;
            announce = true;
            old.into()
        }
        Some(arg) => path::expand_tilde(shell, arg),
    };

    if env::set_current_dir(&target).is_err() {
        return Err(ShellError::DirectoryNotFound(target.display().to_string()));
    }
    let new_cwd = env::current_dir()?;

    let previous = shell
        .env
        .get("PWD")
        .cloned()
        .unwrap_or_else(|| shell.cwd.display().to_string());
    shell.env.insert("OLDPWD".to_string(), previous);
    shell
        .env
        .insert("PWD".to_string(), new_cwd.display().to_string());
    shell.cwd = new_cwd;

    if announce {
        writeln!(out, "{}", shell.cwd.display())?;
    }
    Ok(0)
}

/// help - builtin usage; never a failure status.
fn builtin_help(args: &[String], out: &mut dyn Write) -> Result<i32> {
    match args.first() {
        Some(topic) => match Builtin::lookup(topic) {
            Some(builtin) => writeln!(out, "{}", builtin.usage())?,
            None => writeln!(out, "help: no help topic matches '{}'", topic)?,
        },
        None => {
            writeln!(out, "Built-in commands:")?;
            for builtin in Builtin::ALL {
                writeln!(out, "  {}", builtin.usage())?;
            }
        }
    }
    Ok(0)
}

/// alias - list, show or define aliases.
fn builtin_alias(
    shell: &mut Shell,
    args: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32> {
    if args.is_empty() {
        let mut names: Vec<&String> = shell.aliases.keys().collect();
        names.sort();
        for name in names {
            writeln!(out, "{}='{}'", name, shell.aliases[name])?;
        }
        return Ok(0);
    }

    let mut status = 0;
    for arg in args {
        match arg.split_once('=') {
            Some((name, value)) => {
                if name.is_empty() {
                    return Err(ShellError::InvalidArgument(format!(
                        "alias: invalid alias name '{}'",
                        arg
                    )));
                }
                shell
                    .aliases
                    .insert(name.to_string(), value.to_string());
            }
            None => match shell.aliases.get(arg) {
                Some(value) => writeln!(out, "{}='{}'", arg, value)?,
                None => {
                    writeln!(err, "alias: {}: not found", arg)?;
                    status = 1;
                }
            },
        }
    }
    Ok(status)
}

/// env - one NAME=VALUE per line.
fn builtin_env(shell: &Shell, out: &mut dyn Write) -> Result<i32> {
    let mut names: Vec<&String> = shell.env.keys().collect();
    names.sort();
    for name in names {
        writeln!(out, "{}={}", name, shell.env[name])?;
    }
    Ok(0)
}

/// setenv NAME VALUE - insert or overwrite.
fn builtin_setenv(shell: &mut Shell, args: &[String]) -> Result<i32> {
    let [name, value] = args else {
        return Err(ShellError::InvalidArgument(
            "setenv: expected NAME and VALUE".to_string(),
        ));
    };
    if name.is_empty() || name.contains('=') {
        return Err(ShellError::InvalidArgument(format!(
            "setenv: invalid variable name '{}'",
            name
        )));
    }
    shell.env.insert(name.clone(), value.clone());
    Ok(0)
}

/// unsetenv NAME - removing an absent name succeeds silently.
fn builtin_unsetenv(shell: &mut Shell, args: &[String]) -> Result<i32> {
    let [name] = args else {
        return Err(ShellError::InvalidArgument(
            "unsetenv: expected NAME".to_string(),
        ));
    };
    shell.env.remove(name);
    Ok(0)
}

/// history - entries in sequence order.
fn builtin_history(shell: &Shell, out: &mut dyn Write) -> Result<i32> {
    for entry in shell.history.entries() {
        writeln!(out, "{:5}  {}", entry.num, entry.line)?;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    // cd mutates the process working directory; serialize those tests.
    fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|p| p.into_inner())
    }

    fn test_shell() -> Shell {
        let mut shell = Shell::new().unwrap();
        shell.env.clear();
        shell.aliases.clear();
        shell
    }

    fn run(shell: &mut Shell, builtin: Builtin, args: &[&str]) -> (Result<i32>, String, String) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = builtin.run(shell, &args, &mut out, &mut err);
        (
            res,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn lookup_finds_every_builtin() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::lookup(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::lookup("ls"), None);
        assert_eq!(Builtin::lookup("EXIT"), None);
    }

    #[test]
    fn exit_default_uses_last_status() {
        let mut shell = test_shell();
        shell.last_status = 3;
        let (res, _, _) = run(&mut shell, Builtin::Exit, &[]);
        assert_eq!(res.unwrap(), 3);
        assert!(shell.should_exit);
        assert_eq!(shell.exit_code, Some(3));
    }

    #[test]
    fn exit_rejects_non_numeric() {
        let mut shell = test_shell();
        let (res, _, _) = run(&mut shell, Builtin::Exit, &["12abc"]);
        assert!(matches!(res, Err(ShellError::InvalidArgument(_))));
        assert!(!shell.should_exit);

        let (res, _, _) = run(&mut shell, Builtin::Exit, &["-1"]);
        assert!(res.is_err());
    }

    #[test]
    fn cd_home_then_dash_swaps_pwd_and_oldpwd() {
        let _guard = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let home = std::env::temp_dir()
            .canonicalize()
            .unwrap();
        let mut shell = test_shell();
        shell.env.insert("HOME".into(), home.display().to_string());
        shell
            .env
            .insert("PWD".into(), orig.display().to_string());

        let (res, _, _) = run(&mut shell, Builtin::Cd, &[]);
        assert_eq!(res.unwrap(), 0);
        assert_eq!(shell.cwd, home);
        assert_eq!(shell.env["OLDPWD"], orig.display().to_string());

        let (res, out, _) = run(&mut shell, Builtin::Cd, &["-"]);
        assert_eq!(res.unwrap(), 0);
        assert_eq!(shell.cwd, orig);
        assert_eq!(shell.env["OLDPWD"], home.display().to_string());
        assert_eq!(out.trim(), orig.display().to_string());

        env::set_current_dir(&orig).unwrap();
    }

    #[test]
    fn cd_missing_directory_leaves_cwd_alone() {
        let _guard = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let mut shell = test_shell();
        let before = shell.cwd.clone();
        let (res, _, _) = run(&mut shell, Builtin::Cd, &["/no/such/dir_for_minishell"]);
        assert!(matches!(res, Err(ShellError::DirectoryNotFound(_))));
        assert_eq!(shell.cwd, before);

        env::set_current_dir(&orig).unwrap();
    }

    #[test]
    fn cd_dash_without_oldpwd_errors() {
        let _guard = lock_current_dir();
        let mut shell = test_shell();
        let (res, _, _) = run(&mut shell, Builtin::Cd, &["-"]);
        assert!(matches!(res, Err(ShellError::InvalidArgument(_))));
    }

    #[test]
    fn alias_define_show_list() {
        let mut shell = test_shell();

        let (res, _, _) = run(&mut shell, Builtin::Alias, &["ll=ls -l"]);
        assert_eq!(res.unwrap(), 0);

        let (res, out, _) = run(&mut shell, Builtin::Alias, &["ll"]);
        assert_eq!(res.unwrap(), 0);
        assert_eq!(out, "ll='ls -l'\n");

        let (res, out, err) = run(&mut shell, Builtin::Alias, &["nope"]);
        assert_eq!(res.unwrap(), 1);
        assert!(out.is_empty());
        assert!(err.contains("nope: not found"));

        // Redefinition overwrites in place; lookup sees the newest value.
        run(&mut shell, Builtin::Alias, &["ll=ls -la"]).0.unwrap();
        let (_, out, _) = run(&mut shell, Builtin::Alias, &[]);
        assert_eq!(out, "ll='ls -la'\n");
    }

    #[test]
    fn setenv_and_unsetenv() {
        let mut shell = test_shell();

        let (res, _, _) = run(&mut shell, Builtin::Setenv, &["FOO", "bar"]);
        assert_eq!(res.unwrap(), 0);
        assert_eq!(shell.env["FOO"], "bar");

        let (res, _, _) = run(&mut shell, Builtin::Setenv, &["FOO"]);
        assert!(matches!(res, Err(ShellError::InvalidArgument(_))));

        let (res, _, _) = run(&mut shell, Builtin::Setenv, &["A=B", "x"]);
        assert!(res.is_err());

        let (res, _, _) = run(&mut shell, Builtin::Unsetenv, &["FOO"]);
        assert_eq!(res.unwrap(), 0);
        assert!(!shell.env.contains_key("FOO"));

        // Absent name: still success.
        let (res, _, _) = run(&mut shell, Builtin::Unsetenv, &["FOO"]);
        assert_eq!(res.unwrap(), 0);

        let (res, _, _) = run(&mut shell, Builtin::Unsetenv, &[]);
        assert!(res.is_err());
    }

    #[test]
    fn env_lists_sorted_entries() {
        let mut shell = test_shell();
        shell.env.insert("B".into(), "2".into());
        shell.env.insert("A".into(), "1".into());

        let (res, out, _) = run(&mut shell, Builtin::Env, &[]);
        assert_eq!(res.unwrap(), 0);
        assert_eq!(out, "A=1\nB=2\n");
    }

    #[test]
    fn history_prints_numbered_entries() {
        let mut shell = test_shell();
        shell.history.push("ls");
        shell.history.push("pwd");

        let (res, out, _) = run(&mut shell, Builtin::History, &[]);
        assert_eq!(res.unwrap(), 0);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("0"));
        assert!(lines[0].ends_with("ls"));
        assert!(lines[1].ends_with("pwd"));
    }

    #[test]
    fn help_never_fails() {
        let mut shell = test_shell();
        let (res, out, _) = run(&mut shell, Builtin::Help, &[]);
        assert_eq!(res.unwrap(), 0);
        assert!(out.contains("setenv"));

        let (res, out, _) = run(&mut shell, Builtin::Help, &["cd"]);
        assert_eq!(res.unwrap(), 0);
        assert!(out.contains("OLDPWD"));

        let (res, out, _) = run(&mut shell, Builtin::Help, &["frobnicate"]);
        assert_eq!(res.unwrap(), 0);
        assert!(out.contains("no help topic"));
    }

    #[test]
    fn cd_tilde_goes_home() {
        let _guard = lock_current_dir();
        let orig = env::current_dir().unwrap();

        let home: PathBuf = std::env::temp_dir().canonicalize().unwrap();
        let mut shell = test_shell();
        shell.env.insert("HOME".into(), home.display().to_string());

        let (res, _, _) = run(&mut shell, Builtin::Cd, &["~"]);
        assert_eq!(res.unwrap(), 0);
        assert_eq!(shell.cwd, home);

        env::set_current_dir(&orig).unwrap();
    }
}
