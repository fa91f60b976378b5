//! Decoder: serialized text → `Value`
//!
//! A single forward pass over the input bytes. Every token is self-delimiting, so the
//! decoder never backtracks. String bodies are sliced by their declared byte length;
//! nothing is interpreted as UTF-8.
//!
//! Open arrays and objects live on an explicit frame stack rather than the call stack,
//! so input nested up to [`MAX_NESTING_DEPTH`] decodes on any thread.

use super::MAX_NESTING_DEPTH;
use crate::error::{DecodeError, Result};
use crate::value::{Object, Value};

/// Decode one complete serialized value.
///
/// The whole input must be consumed: bytes after the top-level value are an error.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first malformed token.
pub fn decode(input: &[u8]) -> Result<Value> {
    let mut decoder = Decoder::new(input);
    let value = decoder.value()?;
    if decoder.pos != input.len() {
        return Err(DecodeError::TrailingData {
            offset: decoder.pos,
        });
    }
    Ok(value)
}

/// One token: a finished value, or the opening of a container
enum Token {
    Value(Value),
    Open(Frame),
}

/// An array or object whose pairs are still being read
struct Frame {
    /// `Some` for objects
    class: Option<Vec<u8>>,
    count: usize,
    pairs: Vec<(Value, Value)>,
    /// Key read, value pending
    key: Option<Value>,
    offset: usize,
}

impl Frame {
    fn finish(self) -> Value {
        match self.class {
            Some(class) => Value::Object(Object {
                class,
                properties: self.pairs,
            }),
            None => Value::Array(self.pairs),
        }
    }
}

struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Decoder { input, pos: 0 }
    }

    fn value(&mut self) -> Result<Value> {
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            let mut offset = self.pos;
            let mut value = match self.token(stack.len())? {
                Token::Value(value) => value,
                Token::Open(frame) if frame.count > 0 => {
                    stack.push(frame);
                    continue;
                }
                Token::Open(frame) => {
                    self.expect(b'}', "'}'")?;
                    frame.finish()
                }
            };

            // Hand the value to its container, closing every container it completes
            loop {
                let Some(mut top) = stack.pop() else {
                    return Ok(value);
                };
                match top.key.take() {
                    None => {
                        if !value.is_valid_key() {
                            return Err(DecodeError::InvalidKey {
                                found: value.type_name(),
                                offset,
                            });
                        }
                        top.key = Some(value);
                        stack.push(top);
                        break;
                    }
                    Some(key) => {
                        top.pairs.push((key, value));
                        if top.pairs.len() < top.count {
                            stack.push(top);
                            break;
                        }
                        self.expect(b'}', "'}'")?;
                        offset = top.offset;
                        value = top.finish();
                    }
                }
            }
        }
    }

    /// Read one token; `depth` is the number of containers already open.
    fn token(&mut self, depth: usize) -> Result<Token> {
        let offset = self.pos;
        let tag = self.peek()?;
        let value = match tag {
            b'N' => {
                self.expect(b'N', "'N'")?;
                self.expect(b';', "';'")?;
                Value::Null
            }
            b'b' => {
                self.header(b'b')?;
                let (literal, at) = self.literal_until(b';')?;
                match literal {
                    b"0" => Value::Bool(false),
                    b"1" => Value::Bool(true),
                    _ => return Err(invalid_number("boolean", literal, at)),
                }
            }
            b'i' => {
                self.header(b'i')?;
                let (literal, at) = self.literal_until(b';')?;
                std::str::from_utf8(literal)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .map(Value::Int)
                    .ok_or_else(|| invalid_number("integer", literal, at))?
            }
            b'd' => {
                self.header(b'd')?;
                let (literal, at) = self.literal_until(b';')?;
                parse_float(literal)
                    .map(Value::Float)
                    .ok_or_else(|| invalid_number("float", literal, at))?
            }
            b's' => {
                self.header(b's')?;
                let len = self.length(b':', "length")?;
                let body = self.quoted(len)?;
                self.expect(b';', "';'")?;
                Value::String(body.to_vec())
            }
            b'a' => {
                self.header(b'a')?;
                let count = self.length(b':', "count")?;
                return self.open(None, count, depth, offset).map(Token::Open);
            }
            b'O' => {
                self.header(b'O')?;
                let len = self.length(b':', "length")?;
                let class = self.quoted(len)?.to_vec();
                self.expect(b':', "':'")?;
                let count = self.length(b':', "count")?;
                return self.open(Some(class), count, depth, offset).map(Token::Open);
            }
            b'r' | b'R' | b'C' | b'E' => {
                return Err(DecodeError::UnsupportedToken {
                    tag: tag as char,
                    offset,
                })
            }
            other => {
                return Err(DecodeError::UnknownTag {
                    tag: other as char,
                    offset,
                })
            }
        };
        Ok(Token::Value(value))
    }

    /// Consume `{` and start a container of `count` pairs
    fn open(
        &mut self,
        class: Option<Vec<u8>>,
        count: usize,
        depth: usize,
        offset: usize,
    ) -> Result<Frame> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
                offset,
            });
        }
        self.expect(b'{', "'{'")?;
        // Every pair takes at least 4 bytes, so a huge declared count cannot force a
        // huge allocation.
        let pairs = Vec::with_capacity(count.min(self.remaining() / 4));
        Ok(Frame {
            class,
            count,
            pairs,
            key: None,
            offset,
        })
    }

    /// `"` + exactly `len` bytes + `"`
    fn quoted(&mut self, len: usize) -> Result<&'a [u8]> {
        self.expect(b'"', "'\"'")?;
        let start = self.pos;
        let available = self.remaining();
        if len > available {
            return Err(DecodeError::LengthOverrun {
                declared: len,
                available,
                offset: start,
            });
        }
        self.pos += len;
        self.expect(b'"', "'\"'")?;
        Ok(&self.input[start..start + len])
    }

    /// Unsigned decimal terminated by `terminator`
    fn length(&mut self, terminator: u8, kind: &'static str) -> Result<usize> {
        let (literal, at) = self.literal_until(terminator)?;
        if literal.is_empty() || !literal.iter().all(u8::is_ascii_digit) {
            return Err(invalid_number(kind, literal, at));
        }
        std::str::from_utf8(literal)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| invalid_number(kind, literal, at))
    }

    /// `<tag>:`
    fn header(&mut self, tag: u8) -> Result<()> {
        self.pos += 1;
        debug_assert_eq!(self.input[self.pos - 1], tag);
        self.expect(b':', "':'")
    }

    /// Bytes up to (not including) `terminator`; consumes the terminator.
    fn literal_until(&mut self, terminator: u8) -> Result<(&'a [u8], usize)> {
        let start = self.pos;
        let len = self.input[start..]
            .iter()
            .position(|&b| b == terminator)
            .ok_or(DecodeError::UnexpectedEnd {
                offset: self.input.len(),
            })?;
        self.pos = start + len + 1;
        Ok((&self.input[start..start + len], start))
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<()> {
        let found = self.peek()?;
        if found != byte {
            return Err(DecodeError::UnexpectedByte {
                expected,
                found: found as char,
                offset: self.pos,
            });
        }
        self.pos += 1;
        Ok(())
    }

    fn peek(&self) -> Result<u8> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd { offset: self.pos })
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }
}

fn invalid_number(kind: &'static str, literal: &[u8], offset: usize) -> DecodeError {
    DecodeError::InvalidNumber {
        kind,
        literal: String::from_utf8_lossy(literal).into_owned(),
        offset,
    }
}

/// Float literal: decimal/exponent notation, or `INF`, `-INF`, `NAN`.
fn parse_float(literal: &[u8]) -> Option<f64> {
    match literal {
        b"INF" => return Some(f64::INFINITY),
        b"-INF" => return Some(f64::NEG_INFINITY),
        b"NAN" => return Some(f64::NAN),
        _ => {}
    }
    // f64::from_str also accepts "inf"/"nan" spellings the format never produces
    if literal.is_empty()
        || !literal
            .iter()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    std::str::from_utf8(literal).ok()?.parse::<f64>().ok()
}
