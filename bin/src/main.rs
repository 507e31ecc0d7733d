use std::{
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser as _;

use errors::TloxErrors;
use interpreter::{Interpreter, RuntimeError};
use parser::{AstPrinter, Parser};
use scanner::Scanner;

#[derive(clap::Parser)]
struct Args {
    /// Script to run; without one, starts an interactive prompt.
    file: Option<PathBuf>,
}

/// The two ways one run can fail, kept apart end to end because they map
/// to different exit codes.
#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error("{0}")]
    Syntax(#[from] TloxErrors),
    #[error("{0}\n[line {}]", .0.operator().line)]
    Runtime(#[from] RuntimeError),
}

fn run(source: &str) -> Result<(), RunError> {
    let tokens = Scanner::new(source).scan_tokens()?;
    log::debug!("tokens: {tokens:?}");

    let expr = Parser::new(tokens).parse()?;
    log::debug!("ast: {}", AstPrinter.print(&expr));

    let value = Interpreter::new().interpret(&expr)?;
    println!("{value}");
    Ok(())
}

fn run_file(path: &Path) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            return ExitCode::from(66);
        }
    };

    match run(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            match e {
                RunError::Syntax(_) => ExitCode::from(65),
                RunError::Runtime(_) => ExitCode::from(70),
            }
        }
    }
}

fn run_prompt() -> anyhow::Result<ExitCode> {
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            // EOF ends the session cleanly.
            return Ok(ExitCode::SUCCESS);
        }

        if let Err(e) = run(&line) {
            eprintln!("{e}");
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    match args.file {
        Some(file) => Ok(run_file(&file)),
        None => run_prompt(),
    }
}
