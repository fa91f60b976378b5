//! Encoder: `Value` → serialized text
//!
//! Length prefixes are always recomputed from the value being written, never carried
//! over from a decoded header. A string leaf that was rewritten to a different byte
//! length therefore gets a correct `s:<len>:` prefix.

use crate::value::{Object, Value};

/// Encode a value into a new buffer.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

/// Append the encoding of `value` to `out`.
pub fn encode_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"N;"),
        Value::Bool(b) => out.extend_from_slice(if *b { b"b:1;" } else { b"b:0;" }),
        Value::Int(i) => {
            out.extend_from_slice(b"i:");
            out.extend_from_slice(i.to_string().as_bytes());
            out.push(b';');
        }
        Value::Float(f) => {
            out.extend_from_slice(b"d:");
            out.extend_from_slice(format_float(*f).as_bytes());
            out.push(b';');
        }
        Value::String(bytes) => {
            out.extend_from_slice(b"s:");
            out.extend_from_slice(bytes.len().to_string().as_bytes());
            out.extend_from_slice(b":\"");
            out.extend_from_slice(bytes);
            out.extend_from_slice(b"\";");
        }
        Value::Array(pairs) => {
            out.extend_from_slice(b"a:");
            encode_pairs(pairs, out);
        }
        Value::Object(Object { class, properties }) => {
            out.extend_from_slice(b"O:");
            out.extend_from_slice(class_name_len(class).to_string().as_bytes());
            out.extend_from_slice(b":\"");
            out.extend_from_slice(class);
            out.extend_from_slice(b"\":");
            encode_pairs(properties, out);
        }
    }
}

/// `<count>:{<key><value>...}`
fn encode_pairs(pairs: &[(Value, Value)], out: &mut Vec<u8>) {
    out.extend_from_slice(pairs.len().to_string().as_bytes());
    out.extend_from_slice(b":{");
    for (key, value) in pairs {
        encode_into(key, out);
        encode_into(value, out);
    }
    out.push(b'}');
}

/// Length written in an object header.
///
/// Objects are rebuilt with the class name's character count rather than its byte
/// count. The two agree for the ASCII class names found in practice; a multi-byte
/// class name would get a short header.
fn class_name_len(class: &[u8]) -> usize {
    match std::str::from_utf8(class) {
        Ok(name) => name.chars().count(),
        Err(_) => class.len(),
    }
}

/// Largest decimal exponent still written in fixed notation
const FIXED_NOTATION_DIGITS: i32 = 17;

/// Render a float the way the source ecosystem serializes doubles.
///
/// Uses the shortest digit string that round-trips, in fixed notation when the
/// decimal point falls within 17 digits of the first significant digit (and not more
/// than three zeros after the point), otherwise `d.dddE+x`. Exponent form always has
/// at least one fractional digit: `1.0E+25`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits: "1.2345e-7", "5e0", "0e0"
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: Vec<u8> = mantissa.bytes().filter(|b| *b != b'.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    // Position of the decimal point relative to the first digit
    let decpt = exponent + 1;

    let mut out = String::new();
    if value.is_sign_negative() {
        out.push('-');
    }

    let exponential = if decpt < 0 {
        decpt < -3
    } else {
        decpt > FIXED_NOTATION_DIGITS
    };

    if exponential {
        out.push(digits[0] as char);
        out.push('.');
        if digits.len() == 1 {
            out.push('0');
        } else {
            out.extend(digits[1..].iter().map(|&d| d as char));
        }
        out.push('E');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(&exponent.abs().to_string());
    } else if decpt < 0 {
        out.push_str("0.");
        for _ in decpt..0 {
            out.push('0');
        }
        out.extend(digits.iter().map(|&d| d as char));
    } else {
        let decpt = decpt as usize;
        for i in 0..decpt {
            out.push(digits.get(i).map_or('0', |&d| d as char));
        }
        if digits.len() > decpt {
            if decpt == 0 {
                out.push('0');
            }
            out.push('.');
            out.extend(digits[decpt..].iter().map(|&d| d as char));
        }
    }
    out
}
