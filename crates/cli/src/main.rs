//! envlayer - Command-line interface for layered dot-env files.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Load, print, validate and edit an application's dot-env files.
//!
//! Does NOT handle:
//! - Parsing, interpolation or validation rules (see `crates/config`).
//!
//! Invariants:
//! - Logs go to stderr so stdout only carries command output.
//! - Failures exit with a structured code (see `error` module).

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
