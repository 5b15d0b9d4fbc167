mod cli;
mod session;

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::debug;

use crate::config::Settings;
use crate::error::LedgerError;
use session::{handle_command, Session};

pub(crate) use cli::as_cli;

/// Interactive session over stdin. Command errors are reported and the
/// session carries on.
pub(crate) fn as_shell(settings: Settings) -> Result<()> {
    let mut session = Session::new(settings);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("clientbooks {} - type `help` for commands", env!("CARGO_PKG_VERSION"));
    while session.running {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let result = handle_command(line.trim(), &mut session);
        for out in session.take_output() {
            println!("{out}");
        }
        if let Err(e) = result {
            eprintln!("Error: {e:#}");
            if e.downcast_ref::<LedgerError>().is_some_and(LedgerError::is_not_found) {
                eprintln!("Hint: `clients` and `accounts` list the valid ids");
            }
        }
    }
    Ok(())
}

/// Run a command script, one command per line. Blank lines and `#` comments
/// are skipped; the first failing command aborts the run.
pub(crate) fn run_script(path: &Path, settings: Settings) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open script: {}", path.display()))?;
    let mut session = Session::new(settings);
    let mut stdout = io::stdout().lock();

    execute_lines(io::BufReader::new(file), &mut session, &mut stdout)
}

fn execute_lines<R: BufRead, W: Write>(input: R, session: &mut Session, out: &mut W) -> Result<()> {
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let command = line.trim();
        if command.is_empty() || command.starts_with('#') {
            continue;
        }
        debug!(line = i + 1, command, "running script command");

        let result = handle_command(command, session);
        for text in session.take_output() {
            writeln!(out, "{text}")?;
        }
        result.with_context(|| format!("line {}: {command}", i + 1))?;

        if !session.running {
            break;
        }
    }
    Ok(())
}
