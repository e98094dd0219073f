//! Build log diagnosis.
//!
//! Runs the fixed build invocation, decodes whatever it printed, and
//! surfaces every line that looks like an error, failure, or exception.
//! The child's exit status is recorded and logged but never consulted:
//! whether a line is diagnostic is decided purely by its text, so a
//! passing build that prints "failed" in a test name is still flagged and
//! a failing build whose output matches no marker stays silent.

use crate::config::BuildConfig;
use crate::decode::{decode_with_fallback, Decoded};
use crate::runner::{CommandSpec, ProcessRunner, RunOutput};
use bt_common::Result;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info, instrument};

/// Substrings that flag a line of build output as worth surfacing.
/// Matching is case-insensitive; matched lines are emitted verbatim.
pub const MARKERS: [&str; 3] = ["error:", "failed", "exception"];

/// Returns the lines of `text` whose lowercased form contains a marker,
/// in input order, original casing preserved.
pub fn scan_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .collect()
}

/// Summary of one diagnosis run.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnoseReport {
    /// Number of diagnostic lines emitted.
    pub matched: usize,

    /// Total lines scanned.
    pub scanned: usize,

    /// Encoding that decoded the captured output.
    pub encoding: &'static str,

    /// Child exit code, if it exited normally. Recorded for logs and
    /// tests; it does not influence which lines are emitted.
    pub status: Option<i32>,
}

/// Runs the build and writes diagnostic lines to a writer.
#[derive(Debug)]
pub struct Diagnoser<R> {
    runner: R,
    build: BuildConfig,
}

impl<R: ProcessRunner> Diagnoser<R> {
    /// Create a diagnoser for the given invocation.
    pub fn new(runner: R, build: BuildConfig) -> Self {
        Self { runner, build }
    }

    /// Invoke the build, scan its merged output, and write every
    /// diagnostic line to `out` in order of appearance.
    ///
    /// Blocks until the child exits. Matched lines go to `out`; logs go to
    /// the tracing subscriber on stderr.
    #[instrument(skip_all, fields(program = %self.build.program))]
    pub fn run(&self, out: &mut impl Write) -> Result<DiagnoseReport> {
        let spec = CommandSpec::from(&self.build);
        let RunOutput { combined, status } = self.runner.run(&spec)?;
        debug!(bytes = combined.len(), status = ?status, "captured build output");

        let Decoded { text, encoding } = decode_with_fallback(&combined)?;
        debug!(encoding, "decoded build output");

        let lines = scan_lines(&text);
        for line in &lines {
            writeln!(out, "{line}")?;
        }

        let report = DiagnoseReport {
            matched: lines.len(),
            scanned: text.lines().count(),
            encoding,
            status,
        };
        info!(
            matched = report.matched,
            scanned = report.scanned,
            "diagnosis complete"
        );
        Ok(report)
    }
}
