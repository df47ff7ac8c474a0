//! Ownership and linearity checker for move-only values.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use tether_lib::config::Config;
use tether_lib::reporter::Diagnostics;
use tether_lib::{check, Context};

/// Command-line interface.
#[derive(Parser)]
#[command(
    name = "tether",
    version,
    about = "Static ownership and linearity checker for move-only values"
)]
struct Cli {
    /// Command to run.
    #[command(subcommand)]
    command: Commands,
}

/// Commands.
#[derive(Subcommand)]
enum Commands {
    /// Check a source file
    Check {
        /// Input source file
        input: PathBuf,

        /// Print the progress of each step
        #[arg(short, long)]
        verbose: bool,

        /// Print the control flow graph of each function once checked
        #[arg(long)]
        emit_cfg: bool,

        /// Plot the control flow graph of the function with that name to a
        /// PNG image (needs GraphViz)
        #[arg(long, value_name = "NAME")]
        dot: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let res = match cli.command {
        Commands::Check {
            input,
            verbose,
            emit_cfg,
            dot,
        } => check_command(input, verbose, emit_cfg, dot),
    };
    match res {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            // Internal errors are displayed as diagnostics too
            if Diagnostics::from(err).display().is_err() {
                eprintln!("internal checker error");
            }
            ExitCode::FAILURE
        }
    }
}

/// Checks a file, returning whether it passed.
fn check_command(
    input: PathBuf,
    verbose: bool,
    emit_cfg: bool,
    dot: Option<String>,
) -> Result<bool> {
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Could not read `{}`", input.display()))?;
    let filename = input.display().to_string();
    let config = Config {
        input: &source,
        filename: Some(&filename),
        verbose,
        emit_cfg,
    };
    let mut ctx = Context::new(config);
    match check(&mut ctx)? {
        Ok(checked) => {
            if let Some(name) = dot {
                let f = checked
                    .funs
                    .iter()
                    .find(|f| f.fun.name == name)
                    .with_context(|| format!("No function named `{name}`"))?;
                f.fun.body.print_image(name.as_str())?;
            }
            if verbose {
                println!("No ownership error found.");
            }
            Ok(true)
        }
        Err(rejected) => {
            let errors = rejected.display()?;
            let plural = if errors == 1 { "" } else { "s" };
            eprintln!("error: could not check `{filename}` due to {errors} error{plural}");
            Ok(false)
        }
    }
}
