//! Tracing subscriber setup for the binary.
//!
//! | Flag(s)   | Level |
//! |-----------|-------|
//! | (none)    | WARN  |
//! | `-v`      | INFO  |
//! | `-vv`     | DEBUG |
//! | `-vvv`    | TRACE |
//! | `--quiet` | ERROR |
//!
//! `RUST_LOG` overrides all of the above.

use std::io::IsTerminal as _;

use eyre::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::GlobalArgs;

/// Crates whose events are shown at the chosen level.
const TARGETS: [&str; 5] = [
    "kit",
    "kitgen_core",
    "kitgen_config",
    "kitgen_compose",
    "kitgen_generate",
];

pub fn init(args: &GlobalArgs) -> Result<()> {
    let level = level(args);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            TARGETS
                .iter()
                .map(|target| format!("{}={}", target, level))
                .collect::<Vec<_>>()
                .join(","),
        )
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("failed to initialise logging: {}", e))
}

fn level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            root: PathBuf::from("."),
            config: None,
            verbose,
            quiet,
        }
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level(&args(0, false)), "warn");
        assert_eq!(level(&args(1, false)), "info");
        assert_eq!(level(&args(2, false)), "debug");
        assert_eq!(level(&args(7, false)), "trace");
    }

    #[test]
    fn test_quiet_wins() {
        assert_eq!(level(&args(3, true)), "error");
    }
}
