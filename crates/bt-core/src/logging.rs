//! Structured logging for the bt CLI.
//!
//! stdout is reserved for diagnostic lines and prompts; all log output
//! goes to stderr, either human-readable or machine-parseable JSONL.
//! The filter is derived from the CLI verbosity flags and can be
//! overridden with `BT_LOG` or `RUST_LOG`.

use clap::ValueEnum;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

/// Logging configuration derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    /// Output format on stderr.
    pub format: LogFormat,

    /// `-v` count; 0 = warn, 1 = info, 2 = debug, 3+ = trace.
    pub verbosity: u8,

    /// Drop everything below error.
    pub quiet: bool,
}

impl LogConfig {
    fn directive(&self) -> &'static str {
        if self.quiet {
            return "bt_core=error";
        }
        match self.verbosity {
            0 => "bt_core=warn",
            1 => "bt_core=info",
            2 => "bt_core=debug",
            _ => "bt_core=trace",
        }
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_env("BT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));

    match config.format {
        LogFormat::Human => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time()
                .init();
        }
        LogFormat::Jsonl => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
