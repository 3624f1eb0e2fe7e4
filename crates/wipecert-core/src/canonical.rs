//! Canonical JSON encoding for deterministic signing.
//!
//! Certificates are signed over compact, key-sorted, ASCII-only JSON:
//! - Object keys sorted by UTF-8 byte value, recursively
//! - No whitespace: `,` between members, `:` between key and value
//! - Strings escape `"`, `\`, the short control escapes, and every byte
//!   outside printable ASCII as `\uXXXX` (lowercase, surrogate pairs above U+FFFF)
//! - Integer literals in plain decimal at full precision, `-0` as `0`
//! - Literals with a fraction or exponent as floats in shortest round-trip
//!   form, fixed notation for decimal exponents in `[-4, 16)`, otherwise
//!   `d.ddde±XX`; out-of-range floats as `Infinity` / `-Infinity`
//!
//! This is the text a conventional JSON serializer emits when configured
//! with sorted keys, `(",", ":")` separators and ASCII-only output, so
//! producers on other platforms can sign without this crate.
//!
//! **CRITICAL**: this encoding is FROZEN. Any change breaks every signature
//! already issued.

use serde_json::Number;

use crate::value::{FieldValue, Fields};

/// Encode a field mapping to canonical bytes.
pub fn canonicalize(fields: &Fields) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    encode_map(&mut buf, fields);
    buf
}

/// Canonical encoding as a `String` (always ASCII).
pub fn canonical_string(fields: &Fields) -> String {
    let bytes = canonicalize(fields);
    // Every byte written by the encoder is ASCII.
    bytes.into_iter().map(char::from).collect()
}

/// Recursively encode a value.
fn encode_value(buf: &mut Vec<u8>, value: &FieldValue) {
    match value {
        FieldValue::Null => buf.extend_from_slice(b"null"),
        FieldValue::Bool(true) => buf.extend_from_slice(b"true"),
        FieldValue::Bool(false) => buf.extend_from_slice(b"false"),
        FieldValue::Number(n) => encode_number(buf, n),
        FieldValue::Text(s) => encode_text(buf, s),
        FieldValue::List(items) => encode_list(buf, items),
        FieldValue::Map(map) => encode_map(buf, map),
    }
}

/// Encode an object. `Fields` already iterates in byte order of its keys.
fn encode_map(buf: &mut Vec<u8>, map: &Fields) {
    buf.push(b'{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_text(buf, key);
        buf.push(b':');
        encode_value(buf, value);
    }
    buf.push(b'}');
}

fn encode_list(buf: &mut Vec<u8>, items: &[FieldValue]) {
    buf.push(b'[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_value(buf, item);
    }
    buf.push(b']');
}

/// Encode a string with ASCII-only escaping.
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for c in s.chars() {
        match c {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            '\u{08}' => buf.extend_from_slice(b"\\b"),
            '\u{0c}' => buf.extend_from_slice(b"\\f"),
            ' '..='~' => buf.push(c as u8),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    push_unicode_escape(buf, *unit);
                }
            }
        }
    }
    buf.push(b'"');
}

fn push_unicode_escape(buf: &mut Vec<u8>, unit: u16) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    buf.extend_from_slice(b"\\u");
    for shift in [12u16, 8, 4, 0] {
        buf.push(HEX[((unit >> shift) & 0xf) as usize]);
    }
}

fn encode_number(buf: &mut Vec<u8>, n: &Number) {
    let literal = n.to_string();
    if literal.contains(['.', 'e', 'E']) {
        buf.extend_from_slice(float_literal(&literal).as_bytes());
    } else if literal.trim_start_matches('-').bytes().all(|b| b == b'0') {
        buf.push(b'0');
    } else {
        buf.extend_from_slice(literal.as_bytes());
    }
}

/// Canonical text for a float literal.
fn float_literal(literal: &str) -> String {
    match literal.parse::<f64>() {
        Ok(f) if f.is_finite() => format_float(f),
        Ok(f) if f < 0.0 => "-Infinity".to_string(),
        // A lexically valid JSON number always parses.
        _ => "Infinity".to_string(),
    }
}

/// Format a finite float in shortest round-trip form.
///
/// `{:e}` yields the shortest digit string that round-trips; the layout is
/// then chosen from the decimal exponent.
fn format_float(f: f64) -> String {
    let sci = format!("{:e}", f);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    // Position of the decimal point relative to the first digit.
    let point = exp + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }

    if (-4..16).contains(&exp) {
        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((-point) as usize));
            out.push_str(&digits);
        } else if point as usize >= digits.len() {
            out.push_str(&digits);
            out.extend(std::iter::repeat('0').take(point as usize - digits.len()));
            out.push_str(".0");
        } else {
            let (int_part, frac_part) = digits.split_at(point as usize);
            out.push_str(int_part);
            out.push('.');
            out.push_str(frac_part);
        }
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exp.unsigned_abs()));
    }
    out
}
