//! Numeric and named character references
//!
//! The shaper writes its glyphs as `&#xHHHH;` references and collapses them
//! here in a single pass, so text that was already escaped in the input is
//! never decoded twice.

use crate::error::{Result, ShapeError};
use quick_xml::escape::resolve_html5_entity;
use std::fmt::Write;

/// Append `ch` to `out` as a hexadecimal character reference.
pub fn push_reference(out: &mut String, ch: char) {
    // Writing into a String cannot fail.
    let _ = write!(out, "&#x{:04X};", ch as u32);
}

/// Replace every non-ASCII character of `text` with a hexadecimal reference.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            push_reference(&mut out, ch);
        }
    }
    out
}

/// Decode decimal, hexadecimal and named references.
///
/// A reference whose decoded text appears in `exclude` is kept verbatim, and
/// so is a name that is not a known HTML entity. A numeric reference that
/// does not denote a Unicode scalar value is rejected.
pub fn decode(text: &str, exclude: &[&str]) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut consumed = 0;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        match parse_reference(candidate) {
            Some((reference, len)) => {
                let original = &candidate[..len];
                let decoded = match reference {
                    Reference::Numeric(value) => {
                        let ch = char::from_u32(value).ok_or_else(|| ShapeError::MalformedInput {
                            offset: consumed + amp,
                            reason: format!("{} is not a Unicode scalar value", original),
                        })?;
                        Some(Decoded::Char(ch))
                    }
                    Reference::Named(name) => resolve_html5_entity(name).map(Decoded::Str),
                };

                match decoded {
                    Some(decoded) if !decoded.is_excluded(exclude) => decoded.push_to(&mut out),
                    _ => out.push_str(original),
                }
                rest = &candidate[len..];
                consumed += amp + len;
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
                consumed += amp + 1;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

enum Reference<'a> {
    Numeric(u32),
    Named(&'a str),
}

enum Decoded {
    Char(char),
    Str(&'static str),
}

impl Decoded {
    fn is_excluded(&self, exclude: &[&str]) -> bool {
        match self {
            Decoded::Char(ch) => {
                let mut buf = [0u8; 4];
                let s: &str = ch.encode_utf8(&mut buf);
                exclude.contains(&s)
            }
            Decoded::Str(s) => exclude.contains(s),
        }
    }

    fn push_to(&self, out: &mut String) {
        match self {
            Decoded::Char(ch) => out.push(*ch),
            Decoded::Str(s) => out.push_str(s),
        }
    }
}

// Parse a reference at the start of `s` (which begins with '&'). Returns the
// reference and its length including the '&' and ';'.
fn parse_reference(s: &str) -> Option<(Reference<'_>, usize)> {
    let body = &s[1..];
    let (radix, digits_from) = if let Some(numeric) = body.strip_prefix('#') {
        if numeric.starts_with('x') || numeric.starts_with('X') {
            (Some(16), 2)
        } else {
            (Some(10), 1)
        }
    } else {
        (None, 0)
    };

    let tail = &body[digits_from..];
    let len = match radix {
        Some(16) => tail.bytes().take_while(u8::is_ascii_hexdigit).count(),
        Some(_) => tail.bytes().take_while(u8::is_ascii_digit).count(),
        None => tail.bytes().take_while(u8::is_ascii_alphanumeric).count(),
    };
    if len == 0 || tail.as_bytes().get(len) != Some(&b';') {
        return None;
    }

    let token = &tail[..len];
    let total = 1 + digits_from + len + 1;
    let reference = match radix {
        // Overflowing values are reported as not being scalar values.
        Some(radix) => Reference::Numeric(u32::from_str_radix(token, radix).unwrap_or(u32::MAX)),
        None => Reference::Named(token),
    };
    Some((reference, total))
}
