//! # confgen CLI
//!
//! This is the binary entry point for the `confgen` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the build described by those arguments.
//! - Turning any error into an `ABORT:` line on stderr and a failing exit
//!   status.
//!
//! The assembly and rendering logic lives in the `confgen` library crate;
//! the binary is a thin wrapper around it.

mod cli;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ABORT: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
