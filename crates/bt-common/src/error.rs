//! Error types for Build Triage.
//!
//! The original scripts funneled every fault through a single
//! catch-and-print. Here each failure kind is a distinct variant with a
//! stable code and a category, so callers and tests can assert on the
//! specific kind instead of matching free-text messages. The console
//! rendering stays a plain printed line; there is no machine-readable
//! error payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Build Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// User input rejected before any work was attempted.
    Validation,
    /// Decode fallback chain errors.
    Decode,
    /// Child process launch and lifecycle errors.
    Process,
    /// Image download and URL extraction errors.
    Download,
    /// File I/O errors.
    Io,
    /// Bugs and unexpected faults.
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Decode => write!(f, "decode"),
            ErrorCategory::Process => write!(f, "process"),
            ErrorCategory::Download => write!(f, "download"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Unified error type for Build Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (10-19)
    #[error("not a valid number: {input:?}")]
    InvalidCount { input: String },

    // Decode errors (20-29)
    //
    // The last encoding in the fallback chain accepts arbitrary bytes, so
    // this variant is unreachable through the chain itself. It exists so
    // the exhaustion case is a value, not a panic.
    #[error("no encoding in the fallback chain could decode the output")]
    DecodeExhausted,

    // Process errors (30-39)
    #[error("failed to launch {command}: {reason}")]
    Spawn { command: String, reason: String },

    // Download errors (40-49)
    #[error("download failed: {0}")]
    Download(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors (70-79)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Validation errors
    /// - 20-29: Decode errors
    /// - 30-39: Process errors
    /// - 40-49: Download errors
    /// - 60-69: I/O errors
    /// - 70-79: Internal errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidCount { .. } => 10,
            Error::DecodeExhausted => 20,
            Error::Spawn { .. } => 30,
            Error::Download(_) => 40,
            Error::Io(_) => 60,
            Error::Internal(_) => 70,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidCount { .. } => ErrorCategory::Validation,
            Error::DecodeExhausted => ErrorCategory::Decode,
            Error::Spawn { .. } => ErrorCategory::Process,
            Error::Download(_) => ErrorCategory::Download,
            Error::Io(_) => ErrorCategory::Io,
            Error::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidCount { .. } => "Invalid Input",
            Error::DecodeExhausted => "Decode Failed",
            Error::Spawn { .. } => "Command Launch Failed",
            Error::Download(_) => "Download Failed",
            Error::Io(_) => "I/O Error",
            Error::Internal(_) => "Internal Error",
        }
    }
}

/// Format an error for human-readable console output.
///
/// Output format:
/// ```text
/// ✗ [Headline]: [Error message]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, reset) = if use_color {
        ("\x1b[31m", "\x1b[0m")
    } else {
        ("", "")
    };

    format!(
        "{red}✗{reset} {headline}: {message}",
        red = red,
        reset = reset,
        headline = err.headline(),
        message = err
    )
}
