//! Logging infrastructure.
//!
//! Structured logging via the `log` facade with an `env_logger` backend.
//! The level comes from (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Default: warn level, so reports stay clean

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize the logging subsystem from CLI verbosity flags.
///
/// Call once at startup before any logging macros run.
///
/// # Arguments
///
/// * `verbose` - Verbosity count (0=warn, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by `RUST_LOG`)
///
/// # Panics
///
/// Panics if called more than once; `env_logger` initializes once per
/// process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);
        writeln!(
            buf,
            "{level_style}{:<5}{level_style:#} {}",
            level,
            record.args()
        )
    });

    builder.init();
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_level_default() {
        assert_eq!(determine_level(0, false), LevelFilter::Warn);
    }

    #[test]
    fn test_determine_level_verbose() {
        assert_eq!(determine_level(1, false), LevelFilter::Debug);
        assert_eq!(determine_level(2, false), LevelFilter::Trace);
        assert_eq!(determine_level(5, false), LevelFilter::Trace);
    }

    #[test]
    fn test_determine_level_quiet_overrides_verbose() {
        assert_eq!(determine_level(0, true), LevelFilter::Error);
        assert_eq!(determine_level(2, true), LevelFilter::Error);
    }
}
