//! Fuzz target for the diagnostic line scanner.
//!
//! The scanner should never panic, and everything it returns must be a
//! line of the input.

#![no_main]

use bt_core::diagnose::scan_lines;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let matched = scan_lines(data);
    for line in matched {
        assert!(data.lines().any(|l| l == line));
    }
});
