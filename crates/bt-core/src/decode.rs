//! Fallback decoding of captured build output.
//!
//! Build tools on Windows hosts occasionally emit UTF-16; everything else
//! is UTF-8 or a single-byte superset of ASCII. The chain tries strict
//! UTF-8, then strict UTF-16 (BOM-sniffed, little-endian default), then
//! windows-1252, which maps every byte value and therefore cannot fail.
//! Exactly one attempt's result is used; earlier failures are retried
//! silently with the next encoding.
//!
//! Nothing here guarantees the chosen encoding is the one the build tool
//! actually used, only that the decode itself succeeded.

use bt_common::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Text produced by the fallback chain, tagged with the encoding that won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded text.
    pub text: String,

    /// Name of the encoding that produced it.
    pub encoding: &'static str,
}

/// Decode `bytes` under the fallback chain.
///
/// The terminal windows-1252 leg accepts arbitrary byte values, so the
/// `Err` arm is unreachable through this function; it exists because
/// exhaustion is modeled as a value rather than a panic.
pub fn decode_with_fallback(bytes: &[u8]) -> Result<Decoded> {
    if let Some(text) = try_strict(UTF_8, bytes) {
        return Ok(Decoded {
            text,
            encoding: UTF_8.name(),
        });
    }

    if let Some(decoded) = try_utf16(bytes) {
        return Ok(decoded);
    }

    if let Some(text) = try_strict(WINDOWS_1252, bytes) {
        return Ok(Decoded {
            text,
            encoding: WINDOWS_1252.name(),
        });
    }

    Err(Error::DecodeExhausted)
}

/// One strict decode attempt. `None` when the bytes are not valid in the
/// given encoding.
fn try_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|cow| cow.into_owned())
}

/// Strict UTF-16: a BOM picks the byte order and is stripped; without one,
/// little-endian is assumed. Odd-length input and unpaired surrogates fail
/// the attempt.
fn try_utf16(bytes: &[u8]) -> Option<Decoded> {
    let (encoding, payload) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (UTF_16LE, rest),
        [0xFE, 0xFF, rest @ ..] => (UTF_16BE, rest),
        _ => (UTF_16LE, bytes),
    };

    try_strict(encoding, payload).map(|text| Decoded {
        text,
        encoding: encoding.name(),
    })
}
