//! dupescan - Duplicate File and Directory Finder
//!
//! Entry point for the dupescan CLI application.

use clap::Parser;
use dupescan::{cli::Cli, error::ExitCode, logging::init_logging};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match dupescan::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!(
                "[{}] Error: {:#}",
                ExitCode::GeneralError.code_prefix(),
                err
            );
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
