//! Text input conversions.

/// Substituted for code points that are not Unicode scalar values.
const REPLACEMENT: char = '\u{FFFD}';

/// Convert a raw code point to a `char`, mapping surrogates and values
/// past U+10FFFF to U+FFFD.
#[inline]
pub fn sanitize_code_point(code: u32) -> char {
    char::from_u32(code).unwrap_or(REPLACEMENT)
}

/// Decode ISO-8859-1 bytes. Every byte maps to the code point of the same
/// value.
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
