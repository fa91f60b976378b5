//! Decoded value tree for serialized column data
//!
//! This module defines:
//! - Value: the decoded form of one serialized token
//! - Object: a tagged record (class name plus ordered properties)
//!
//! ## Value Model
//!
//! The serialized format is dynamically typed, so a decoded value is an explicit sum
//! type with seven variants:
//! - Null, Bool, Int, Float, String, Array, Object
//!
//! Strings are raw bytes. Length prefixes in the wire format count bytes, and column
//! data is not guaranteed to be valid UTF-8 at every slice point, so nothing here
//! assumes an encoding.
//!
//! Arrays and objects keep their key/value pairs in wire order, including duplicate
//! keys. Re-encoding an untouched tree therefore reproduces the original pairs.

/// A decoded serialized value.
///
/// ## Type Equality
///
/// Different variants are never equal, even when they hold the "same" value:
/// - `Int(1) != Float(1.0)`
/// - `String(b"1") != Int(1)`
///
/// Float equality follows IEEE-754 semantics (`NaN != NaN`, `-0.0 == 0.0`).
#[derive(Debug, Clone)]
pub enum Value {
    /// `N;`
    Null,
    /// `b:0;` / `b:1;`
    Bool(bool),
    /// `i:<n>;`
    Int(i64),
    /// `d:<n>;`
    Float(f64),
    /// `s:<len>:"<bytes>";`
    String(Vec<u8>),
    /// `a:<count>:{<key><value>...}`
    Array(Vec<(Value, Value)>),
    /// `O:<len>:"<class>":<count>:{<key><value>...}`
    Object(Object),
}

/// A tagged record: an ordered property list carrying a class name.
///
/// The class does not need to exist anywhere for the record to be decoded or
/// rewritten. It is kept as opaque bytes and written back as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Class name as found in the record header
    pub class: Vec<u8>,
    /// Properties in wire order
    pub properties: Vec<(Value, Value)>,
}

impl Object {
    /// Create a record with the given class name and properties.
    pub fn new(class: impl Into<Vec<u8>>, properties: Vec<(Value, Value)>) -> Self {
        Object {
            class: class.into(),
            properties,
        }
    }
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// Check whether this value may appear as an array or object key
    pub fn is_valid_key(&self) -> bool {
        matches!(self, Value::Int(_) | Value::String(_))
    }

    /// Get the raw bytes if this is a String value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the string as `&str` if this is a String value holding valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Key/value pairs of an array or object, in wire order
    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Array(pairs) => Some(pairs),
            Value::Object(obj) => Some(&obj.properties),
            _ => None,
        }
    }

    /// Container levels in this tree: 0 for a leaf, 1 for a flat array or object
    pub fn nesting(&self) -> usize {
        self.entries().map_or(0, |pairs| {
            1 + pairs.iter().map(|(_, v)| v.nesting()).max().unwrap_or(0)
        })
    }

    /// Look up the first pair whose key equals `key`
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::String(b)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}
