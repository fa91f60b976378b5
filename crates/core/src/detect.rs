//! Serialized-format detection
//!
//! Classifies a column value as serialized data or plain text without decoding it.
//! The checks are cheap structural tests on the first and last bytes plus a short
//! header pattern per type tag. A positive answer does not guarantee that decoding
//! will succeed; it only means the value looks like serialized data.
//!
//! Detection runs on a whitespace-trimmed view of the input. The trimmed view is never
//! written back.

/// How strictly the terminal byte is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// The value must end in `;` or `}` and scalar headers must span the whole value.
    #[default]
    Strict,
    /// A `;` or `}` must appear somewhere past the header, and scalar headers only
    /// need to match as a prefix.
    Lenient,
}

/// Check whether `data` looks like serialized data (strict mode).
///
/// This is the check used for every column and nested string during a migration.
pub fn is_serialized(data: &[u8]) -> bool {
    is_serialized_with(data, Strictness::Strict)
}

/// Check whether `data` looks like serialized data using the given strictness.
pub fn is_serialized_with(data: &[u8], strictness: Strictness) -> bool {
    let data = trim(data);
    if data == b"N;" {
        return true;
    }
    if data.len() < 4 {
        return false;
    }
    if data[1] != b':' {
        return false;
    }

    match strictness {
        Strictness::Strict => {
            let last = data[data.len() - 1];
            if last != b';' && last != b'}' {
                return false;
            }
        }
        Strictness::Lenient => {
            let semicolon = data.iter().position(|&b| b == b';');
            let brace = data.iter().position(|&b| b == b'}');
            match (semicolon, brace) {
                (None, None) => return false,
                (Some(pos), _) if pos < 3 => return false,
                (_, Some(pos)) if pos < 4 => return false,
                _ => {}
            }
        }
    }

    let tag = data[0];
    match tag {
        b's' => {
            let quoted = match strictness {
                Strictness::Strict => data[data.len() - 2] == b'"',
                Strictness::Lenient => data.contains(&b'"'),
            };
            quoted && has_length_header(data)
        }
        b'a' | b'O' => has_length_header(data),
        b'b' | b'i' | b'd' => has_scalar_header(data, strictness),
        _ => false,
    }
}

/// Trim the bytes PHP-style `trim()` strips: space, `\t`, `\n`, `\r`, `\0` and `\x0B`.
pub fn trim(data: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(*b, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | 0x0b);
    let start = data.iter().position(|b| !is_ws(b)).unwrap_or(data.len());
    let end = data.iter().rposition(|b| !is_ws(b)).map_or(start, |p| p + 1);
    &data[start..end]
}

/// `^<tag>:[0-9]+:`
fn has_length_header(data: &[u8]) -> bool {
    let digits = data[2..].iter().take_while(|b| b.is_ascii_digit()).count();
    digits > 0 && data.get(2 + digits) == Some(&b':')
}

/// `^<tag>:[0-9.E-]+;` anchored to the end in strict mode
fn has_scalar_header(data: &[u8], strictness: Strictness) -> bool {
    let body = data[2..]
        .iter()
        .take_while(|&&b| b.is_ascii_digit() || matches!(b, b'.' | b'E' | b'-'))
        .count();
    if body == 0 || data.get(2 + body) != Some(&b';') {
        return false;
    }
    match strictness {
        Strictness::Strict => 2 + body + 1 == data.len(),
        Strictness::Lenient => true,
    }
}
