//! Core types for wpmigrate
//!
//! This crate holds the pieces of the serialized-data pipeline that do not depend on
//! any database or configuration:
//! - Value: decoded value tree (Null, Bool, Int, Float, String, Array, Object)
//! - detect: cheap check for "does this column look serialized"
//! - codec: decoder and encoder for the serialization format
//! - DecodeError: why a serialized value could not be decoded

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod detect;
pub mod error;
pub mod value;

pub use codec::{decode, encode, FALSE_ENCODING, MAX_NESTING_DEPTH};
pub use detect::{is_serialized, is_serialized_with, Strictness};
pub use error::{DecodeError, Result};
pub use value::{Object, Value};
