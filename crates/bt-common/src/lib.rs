//! Build Triage common types and errors.
//!
//! This crate provides the foundation shared across bt-core modules:
//! - The unified error type with stable codes and categories
//! - Human-facing error formatting for console output

pub mod error;

pub use error::{format_error_human, Error, ErrorCategory, Result};
