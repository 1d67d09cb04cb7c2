//! fviz - command-line front end for the food visualizer

use std::process::ExitCode;

use foodviz::cli;

fn main() -> ExitCode {
    cli::run()
}
