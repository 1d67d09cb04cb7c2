//! Diagnostic output for the command-line tool
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job.

use tracing::Level;

/// Map `-q` / `-v` flags to a maximum level.
///
/// The default shows warnings and info; one `-v` adds debug, two add trace.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a stderr subscriber. Safe to call more than once.
pub fn init(verbose: u8, quiet: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .try_init();
}
