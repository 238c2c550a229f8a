//! JavaScript payload encoding
//!
//! Renders a string as a `String.fromCharCode(...)` expression, useful for
//! smuggling text past filters that block quotes.

use crate::error::{Error, Result};

/// Encode `input` as `String.fromCharCode(c1,c2,...)`
///
/// Uses UTF-16 code units, which is what `fromCharCode` consumes, so
/// characters outside the BMP come out as surrogate pairs.
pub fn from_char_code(input: &str) -> Result<String> {
    if input.is_empty() {
        return Err(Error::usage("usage: webrecon char-code <string>"));
    }

    let codes: Vec<String> = input.encode_utf16().map(|unit| unit.to_string()).collect();
    Ok(format!("String.fromCharCode({})", codes.join(",")))
}
