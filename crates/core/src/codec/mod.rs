//! Serialized codec
//!
//! Decodes the length-prefixed serialization format into a [`Value`] tree and
//! encodes a tree back. Decoding then encoding an untouched tree reproduces the
//! canonical encoding byte for byte.
//!
//! | Token | Decoded as |
//! |-------|------------|
//! | `N;` | `Value::Null` |
//! | `b:0;` / `b:1;` | `Value::Bool` |
//! | `i:<n>;` | `Value::Int` |
//! | `d:<n>;` | `Value::Float` |
//! | `s:<bytes>:"...";` | `Value::String` |
//! | `a:<n>:{...}` | `Value::Array` |
//! | `O:<len>:"<class>":<n>:{...}` | `Value::Object` |

mod decode;
mod encode;

pub use decode::decode;
pub use encode::{encode, encode_into, format_float};

/// Maximum container nesting accepted by the decoder (128 levels)
///
/// The decoder keeps open containers on the heap; the encoder and the rewriter recurse
/// over decoded trees, bounded by this depth.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Canonical encoding of boolean `false`
pub const FALSE_ENCODING: &[u8] = b"b:0;";
