//! Migration engine for wpmigrate
//!
//! This crate applies find-and-replace rules to a WordPress database without breaking
//! the serialized values stored in it:
//! - rules: ordered literal find/replace rules
//! - rewrite: serialized-aware rewriting of a single value
//! - domain / strategy: site moves and the per-column strategies they need
//! - processor / migrate: row and table drivers over a `RowStore`
//! - store, sql, dump: snapshot store, statement rendering, dump file splitting
//! - config: `wpmigrate.toml` and argument overrides
//!
//! Problems with individual values are collected in an `IssueLog` and reported at
//! the end of a run; only configuration and store failures are errors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod dump;
pub mod error;
pub mod issues;
pub mod migrate;
pub mod processor;
pub mod rewrite;
pub mod row;
pub mod rules;
pub mod sql;
pub mod store;
pub mod strategy;

pub use config::{FindReplace, MigrateConfig};
pub use domain::DomainChange;
pub use dump::StatementSplitter;
pub use error::{Error, Result};
pub use issues::{Issue, IssueKind, IssueLog, Location};
pub use migrate::{Migrator, RunSummary};
pub use processor::{RowOutcome, RowProcessor};
pub use rewrite::ValueRewriter;
pub use row::{Cell, Row, RowContext};
pub use rules::RuleSet;
pub use sql::StatementLog;
pub use store::{MemoryStore, RowStore, TableData};
pub use strategy::{ColumnStrategy, StrategyTable};
