//! Spritegroup - Command-line tool for grouping sprite importers into atlas pages

use std::process::ExitCode;

use spritegroup::cli;

fn main() -> ExitCode {
    cli::run()
}
