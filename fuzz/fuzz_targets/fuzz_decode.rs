//! Fuzz target for the decode fallback chain.
//!
//! The chain must be total: arbitrary bytes always decode without
//! panicking, and the terminal leg means the error arm stays unreachable.

#![no_main]

use bt_core::decode::decode_with_fallback;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoded = decode_with_fallback(data);
    assert!(decoded.is_ok());
});
