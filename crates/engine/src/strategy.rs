//! Per-column rewrite strategies
//!
//! Most columns get the generic treatment: the rule set applied through the
//! serialized-aware [`ValueRewriter`]. The multisite tables are different. Their
//! `domain` and `path` columns hold bare host names and paths that must be matched
//! exactly (or, for blog paths, as an anchored prefix) against the configured domain
//! changes, and they never fall through to the generic rules.
//!
//! # Lookup
//!
//! | Table | Column | Strategy |
//! |-------|--------|----------|
//! | `{prefix}site`, `{prefix}blogs` | `domain` | [`DomainStrategy`] |
//! | `{prefix}site` | `path` | [`PathStrategy`] exact |
//! | `{prefix}blogs` | `path` | [`PathStrategy`] prefix |
//! | anything else | any | [`GenericStrategy`] |

use tracing::trace;

use crate::domain::DomainChange;
use crate::issues::{IssueLog, Location};
use crate::rewrite::ValueRewriter;
use crate::row::RowContext;
use crate::rules::{replace_prefix, RuleSet};

/// A column value with everything a strategy may need to rewrite it
#[derive(Debug, Clone, Copy)]
pub struct ColumnInput<'a> {
    /// Table name
    pub table: &'a str,
    /// Column name
    pub column: &'a str,
    /// The row as it was before any column was rewritten
    pub row: &'a RowContext,
    /// Current column text
    pub value: &'a str,
}

impl<'a> ColumnInput<'a> {
    /// Location used when recording issues
    pub fn location(&self) -> Location<'a> {
        Location::new(self.table, self.row.id(), self.column)
    }
}

/// Rewrites one column value
pub trait ColumnStrategy {
    /// Return the new bytes when the value changed, `None` otherwise
    fn rewrite(&self, input: &ColumnInput<'_>, issues: &mut IssueLog) -> Option<Vec<u8>>;
}

/// Serialized-aware find and replace with the configured rules
#[derive(Debug, Clone, Default)]
pub struct GenericStrategy {
    rules: RuleSet,
}

impl GenericStrategy {
    /// Strategy applying `rules`
    pub fn new(rules: RuleSet) -> Self {
        GenericStrategy { rules }
    }

    /// The rules this strategy applies
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl ColumnStrategy for GenericStrategy {
    fn rewrite(&self, input: &ColumnInput<'_>, issues: &mut IssueLog) -> Option<Vec<u8>> {
        ValueRewriter::new(&self.rules).rewrite_text(input.value.as_bytes(), &input.location(), issues)
    }
}

/// Exact host name replacement for the `domain` column of the site tables.
///
/// Changes are applied in order and each one sees the output of the previous one.
#[derive(Debug, Clone, Default)]
pub struct DomainStrategy {
    changes: Vec<DomainChange>,
}

impl DomainStrategy {
    /// Strategy over `changes`
    pub fn new(changes: Vec<DomainChange>) -> Self {
        DomainStrategy { changes }
    }
}

impl ColumnStrategy for DomainStrategy {
    fn rewrite(&self, input: &ColumnInput<'_>, _issues: &mut IssueLog) -> Option<Vec<u8>> {
        let mut current = input.value;
        for change in &self.changes {
            if current == change.domain.find {
                current = change.domain.replace.as_str();
            }
        }
        (current != input.value).then(|| current.as_bytes().to_vec())
    }
}

/// How a path change is matched against a stored path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// The whole value must equal the remote path (network paths)
    Exact,
    /// The value must start with the remote path (blog paths)
    Prefix,
}

/// Path replacement for the `path` column of the site tables.
///
/// Only changes whose remote domain equals the row's original `domain` column apply,
/// and changes that keep the path are skipped.
#[derive(Debug, Clone)]
pub struct PathStrategy {
    changes: Vec<DomainChange>,
    matching: PathMatch,
}

impl PathStrategy {
    /// Strategy over `changes` using `matching`
    pub fn new(changes: Vec<DomainChange>, matching: PathMatch) -> Self {
        PathStrategy { changes, matching }
    }
}

impl ColumnStrategy for PathStrategy {
    fn rewrite(&self, input: &ColumnInput<'_>, _issues: &mut IssueLog) -> Option<Vec<u8>> {
        let domain = input.row.original_text("domain");
        let mut current = input.value.to_string();
        for change in &self.changes {
            if domain != Some(change.domain.find.as_str()) || change.keeps_path() {
                continue;
            }
            let next = match self.matching {
                PathMatch::Exact => {
                    (current == change.path.find).then(|| change.path.replace.clone())
                }
                PathMatch::Prefix => {
                    replace_prefix(&current, &change.path.find, &change.path.replace)
                }
            };
            if let Some(next) = next {
                current = next;
            }
        }
        (current != input.value).then(|| current.into_bytes())
    }
}

/// Chooses the strategy for each `(table, column)`
#[derive(Debug, Clone)]
pub struct StrategyTable {
    site_table: String,
    blogs_table: String,
    generic: GenericStrategy,
    domain: DomainStrategy,
    site_path: PathStrategy,
    blogs_path: PathStrategy,
}

impl StrategyTable {
    /// Build the lookup for tables named with `prefix`.
    ///
    /// Each domain change's `//domain/path` rule is added to `rules` before the
    /// generic strategy takes ownership of them.
    pub fn new(prefix: &str, mut rules: RuleSet, changes: Vec<DomainChange>) -> Self {
        for change in &changes {
            change.add_url_rule(&mut rules);
        }
        StrategyTable {
            site_table: format!("{}site", prefix),
            blogs_table: format!("{}blogs", prefix),
            generic: GenericStrategy::new(rules),
            domain: DomainStrategy::new(changes.clone()),
            site_path: PathStrategy::new(changes.clone(), PathMatch::Exact),
            blogs_path: PathStrategy::new(changes, PathMatch::Prefix),
        }
    }

    /// Strategy for a column
    pub fn select(&self, table: &str, column: &str) -> &dyn ColumnStrategy {
        let site = table == self.site_table;
        let blogs = table == self.blogs_table;
        let strategy: &dyn ColumnStrategy = match column {
            "domain" if site || blogs => &self.domain,
            "path" if site => &self.site_path,
            "path" if blogs => &self.blogs_path,
            _ => &self.generic,
        };
        trace!(target: "wpmigrate::strategy", table, column, "Selected column strategy");
        strategy
    }

    /// Rules used by the generic strategy, including the domain URL rules
    pub fn rules(&self) -> &RuleSet {
        self.generic.rules()
    }
}
