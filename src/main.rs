//! minishell - small POSIX-style command interpreter
//!
//! Usage:
//!   minishell                  Interactive shell
//!   minishell -c "command"     Execute single command
//!   minishell script.sh        Execute script file (also reads piped stdin)

use std::env;
use std::fs;
use std::io::{self, BufRead, BufReader, IsTerminal};

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use minishell::shell::history::{self, History};
use minishell::Shell;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "-c" => {
                if args.len() < 3 {
                    eprintln!("minishell: -c requires an argument");
                    std::process::exit(2);
                }
                let cmd = args[2..].join(" ");
                let code = execute_command(&cmd)?;
                std::process::exit(code);
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-v" | "--version" => {
                println!("minishell v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            path if !path.starts_with('-') => {
                let code = execute_script(path)?;
                std::process::exit(code);
            }
            _ => {
                eprintln!("minishell: unknown option: {}", args[1]);
                std::process::exit(2);
            }
        }
    }

    let code = if io::stdin().is_terminal() {
        run_repl()?
    } else {
        // Piped/redirected stdin: batch mode, no prompt.
        let stdin = io::stdin();
        run_batch(&mut stdin.lock())?
    };
    std::process::exit(code);
}

fn print_help() {
    println!("{}", "minishell - small POSIX-style command interpreter".bold());
    println!();
    println!("Usage:");
    println!("  minishell                  Start interactive shell");
    println!("  minishell -c \"command\"     Execute single command");
    println!("  minishell script.sh        Execute script file");
    println!("  minishell -h, --help       Show this help");
    println!("  minishell -v, --version    Show version");
    println!();
    println!("Command chaining: cmd1 ; cmd2, cmd1 && cmd2, cmd1 || cmd2");
    println!("Expansion: aliases on the command name, then $?, $$ and $NAME");
    println!();
    println!("Type 'help' in the shell for built-in commands.");
}

fn print_banner() {
    println!(
        "{} v{}  ({} for commands, {} or Ctrl-D to leave)",
        "minishell".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        "help".green(),
        "exit".green(),
    );
}

/// Run `~/.minishellrc` line by line, then reset the line counter so user
/// input numbers from 1.
fn load_rc(shell: &mut Shell) {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    let Ok(content) = fs::read_to_string(home.join(".minishellrc")) else {
        return;
    };

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        shell.execute(line);
        if shell.should_exit {
            break;
        }
    }
    shell.line_count = 0;
}

fn load_history(shell: &mut Shell) {
    let Some(path) = history::default_path() else {
        return;
    };
    match History::load(&path) {
        Ok(h) => shell.history = h,
        Err(e) => eprintln!("minishell: cannot read {}: {}", path.display(), e),
    }
}

fn flush_history(shell: &Shell) {
    let Some(path) = history::default_path() else {
        return;
    };
    if let Err(e) = shell.history.save(&path) {
        eprintln!("minishell: cannot write {}: {}", path.display(), e);
    }
}

fn execute_command(cmd: &str) -> Result<i32> {
    let mut shell = Shell::new()?;
    load_rc(&mut shell);
    if !shell.should_exit {
        shell.execute(cmd);
    }
    Ok(shell.exit_status())
}

fn execute_script(path: &str) -> Result<i32> {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("minishell: 0: Can't open {}: {}", path, e);
            return Ok(127);
        }
    };
    run_batch(&mut BufReader::new(file))
}

/// Drive the pipeline from a non-interactive line source until end-of-input.
fn run_batch(reader: &mut dyn BufRead) -> Result<i32> {
    let mut shell = Shell::new()?;
    load_rc(&mut shell);
    load_history(&mut shell);
    if shell.should_exit {
        return Ok(shell.exit_status());
    }

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            shell.history.push(trimmed);
        }
        shell.execute(&line);
        if shell.should_exit {
            break;
        }
    }

    flush_history(&shell);
    Ok(shell.exit_status())
}

fn run_repl() -> Result<i32> {
    print_banner();

    let mut shell = Shell::new()?;
    load_rc(&mut shell);
    load_history(&mut shell);
    if shell.should_exit {
        return Ok(shell.exit_status());
    }

    let mut rl = DefaultEditor::new()?;
    for entry in shell.history.entries() {
        let _ = rl.add_history_entry(&entry.line);
    }

    loop {
        match rl.readline(&shell.prompt()) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);
                shell.history.push(&line);
                shell.execute(&line);
                if shell.should_exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C at the prompt: redisplay, never tear down state.
                println!("^C");
                shell.last_status = 130;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("minishell: input error: {}", e);
                break;
            }
        }
    }

    flush_history(&shell);
    Ok(shell.exit_status())
}
