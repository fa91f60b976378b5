//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::path::PathBuf;

pub use wpmigrate::{
    decode, encode, Cell, IssueKind, IssueLog, Location, MemoryStore, MigrateConfig, Migrator,
    Row, RowStore, RuleSet, RunSummary, TableData, Value, ValueRewriter,
};
use tempfile::TempDir;

/// Location used for single-value tests
pub fn at() -> Location<'static> {
    Location::new("wp_options", "1", "option_value")
}

/// Build a rule set from `(find, replace)` pairs
pub fn rules(pairs: &[(&str, &str)]) -> RuleSet {
    pairs.iter().copied().collect()
}

/// Rewrite one value, returning the new text (or the original) and the issues
pub fn rewrite(rules: &RuleSet, text: &str) -> (String, IssueLog) {
    let mut issues = IssueLog::new();
    let out = ValueRewriter::new(rules)
        .rewrite_text(text.as_bytes(), &at(), &mut issues)
        .map(|b| String::from_utf8(b).unwrap())
        .unwrap_or_else(|| text.to_string());
    (out, issues)
}

/// Serialize a string the way a column would hold it
pub fn s(text: &str) -> String {
    format!("s:{}:\"{}\";", text.len(), text)
}

/// A table with an integer primary key and the given text columns per row
pub fn table(name: &str, primary_key: &str, rows: Vec<Vec<(&str, &str)>>) -> TableData {
    TableData {
        name: name.to_string(),
        primary_key: Some(primary_key.to_string()),
        rows: rows
            .into_iter()
            .enumerate()
            .map(|(i, columns)| {
                let mut row = Row::new().with(primary_key, (i + 1) as i64);
                for (column, value) in columns {
                    row.set(column, value);
                }
                row
            })
            .collect(),
    }
}

/// Run the migrator for `config` over `store`
pub fn migrate(config: &MigrateConfig, store: &mut MemoryStore) -> (RunSummary, IssueLog) {
    let mut migrator = config.migrator().unwrap();
    let summary = migrator.find_and_replace(store).unwrap();
    (summary, migrator.take_issues())
}

/// Temporary directory holding test files
pub struct TestDir {
    pub dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        TestDir {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `name` and return its path
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
