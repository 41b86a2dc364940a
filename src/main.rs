//! `pachca-users`: export the Pachca user directory.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Colorize, diagnostic};

fn main() -> ExitCode {
    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", diagnostic(&e).error());
            ExitCode::FAILURE
        }
    }
}
