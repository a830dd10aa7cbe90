//! Main `html-to-markdown` program entry point.
//!
//! Forwards the process argument list (minus the program name) to
//! [`cli::main`] and exits with the status it returns.

use std::env;
use std::process::ExitCode;

use html_to_markdown::cli;

fn main() -> ExitCode {
    ExitCode::from(cli::main(env::args().skip(1).collect()))
}
