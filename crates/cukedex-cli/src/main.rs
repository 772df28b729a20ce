//! Command line front end for cukedex.
//!
//! Exit codes: `0` when reports were written, `1` when the run failed and
//! `2` when the options could not be resolved.

use std::process::ExitCode;

mod cli;
mod logging;
mod options;
mod output;

fn main() -> ExitCode {
    cli::run()
}
