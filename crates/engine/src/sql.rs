//! MySQL statement rendering
//!
//! Renders the `UPDATE ... SET ... WHERE` and `INSERT INTO ... SET` statements used to
//! write rows back to a live database or into a dump file. Identifiers are
//! backtick-quoted; text is single-quoted with MySQL's string escapes.

use crate::error::{Error, Result};
use crate::row::{Cell, Row};
use crate::store::RowStore;

/// Quote a text value as a MySQL string literal
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Quote an identifier with backticks
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render a cell as a SQL literal
pub fn literal(cell: &Cell) -> String {
    match cell {
        Cell::Null => "NULL".to_string(),
        Cell::Bool(true) => "true".to_string(),
        Cell::Bool(false) => "false".to_string(),
        Cell::Int(i) => i.to_string(),
        Cell::Float(f) => f.to_string(),
        Cell::Text(s) => quote(s),
    }
}

fn assignments<'a>(columns: impl Iterator<Item = (&'a str, &'a Cell)>) -> String {
    columns
        .map(|(column, cell)| format!("{}={}", quote_ident(column), literal(cell)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `UPDATE `table` SET `col`=value,... WHERE `pk`=value;`
///
/// # Errors
///
/// Returns [`Error::MissingPrimaryKey`] when the row has no usable key value.
pub fn update_statement(table: &str, primary_key: &str, row: &Row) -> Result<String> {
    let key = row
        .get(primary_key)
        .filter(|cell| !cell.is_empty_key())
        .ok_or_else(|| Error::MissingPrimaryKey {
            table: table.to_string(),
            primary_key: primary_key.to_string(),
        })?;
    let fields = assignments(row.iter().filter(|(column, _)| *column != primary_key));
    Ok(format!(
        "UPDATE {} SET {} WHERE {}={};",
        quote_ident(table),
        fields,
        quote_ident(primary_key),
        literal(key)
    ))
}

/// `INSERT INTO `table` SET `col`=value,...`
pub fn insert_statement(table: &str, row: &Row) -> String {
    format!("INSERT INTO {} SET {}", quote_ident(table), assignments(row.iter()))
}

/// A store wrapper that records an `UPDATE` statement for every row written.
///
/// Updates are passed through to the inner store only when it accepts them, so the
/// recorded statements match the rows that actually changed.
#[derive(Debug)]
pub struct StatementLog<S> {
    inner: S,
    statements: Vec<String>,
}

impl<S: RowStore> StatementLog<S> {
    /// Wrap `inner`
    pub fn new(inner: S) -> Self {
        StatementLog {
            inner,
            statements: Vec::new(),
        }
    }

    /// Statements recorded so far, in update order
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap into the store and the recorded statements
    pub fn into_parts(self) -> (S, Vec<String>) {
        (self.inner, self.statements)
    }
}

impl<S: RowStore> RowStore for StatementLog<S> {
    fn tables(&self) -> Result<Vec<String>> {
        self.inner.tables()
    }

    fn primary_key(&self, table: &str) -> Result<Option<String>> {
        self.inner.primary_key(table)
    }

    fn row_count(&self, table: &str) -> Result<usize> {
        self.inner.row_count(table)
    }

    fn fetch_rows(&self, table: &str, limit: usize, offset: usize) -> Result<Vec<Row>> {
        self.inner.fetch_rows(table, limit, offset)
    }

    fn update_row(&mut self, table: &str, primary_key: &str, row: &Row) -> Result<()> {
        let statement = update_statement(table, primary_key, row)?;
        self.inner.update_row(table, primary_key, row)?;
        self.statements.push(statement);
        Ok(())
    }
}
