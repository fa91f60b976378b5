//! Rows as read from and written back to a store
//!
//! A [`Row`] keeps its columns in the order the store returned them, so rendered
//! statements and snapshots list columns the same way the source table does.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// SQL NULL
    Null,
    /// Boolean column
    Bool(bool),
    /// Integer column
    Int(i64),
    /// Floating point column
    Float(f64),
    /// Any text column
    Text(String),
}

impl Cell {
    /// The text, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when the value cannot identify a row: missing, NULL, `""`, `"0"`, `0`,
    /// `0.0` or `false`.
    pub fn is_empty_key(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Bool(b) => !b,
            Cell::Int(i) => *i == 0,
            Cell::Float(f) => *f == 0.0,
            Cell::Text(s) => s.is_empty() || s == "0",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<i32> for Cell {
    fn from(i: i32) -> Self {
        Cell::Int(i64::from(i))
    }
}

/// Column name → value, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Cell)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing its value if present or appending it otherwise
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((column, value)),
        }
    }

    /// Builder form of [`Row::set`]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.set(column, value);
        self
    }

    /// Value of a column
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Text value of a column, if it is a text cell
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Cell::as_text)
    }

    /// Columns in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Mutable access to the columns in order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Cell)> {
        self.columns.iter_mut().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<C: Into<String>, V: Into<Cell>> FromIterator<(C, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((column, value)) = access.next_entry::<String, Cell>()? {
                    row.set(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Read-only view of a row as it was before any column was rewritten.
///
/// Column strategies that depend on a sibling column (a path rewrite that needs the
/// row's domain) read it from here, so the result does not depend on column order.
#[derive(Debug, Clone)]
pub struct RowContext {
    id: String,
    original: Row,
}

impl RowContext {
    /// Capture the row before processing
    pub fn new(id: impl Into<String>, row: &Row) -> Self {
        RowContext {
            id: id.into(),
            original: row.clone(),
        }
    }

    /// Primary key value rendered as text
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Original text value of a sibling column
    pub fn original_text(&self, column: &str) -> Option<&str> {
        self.original.text(column)
    }
}
