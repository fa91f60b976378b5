//! Table driver
//!
//! [`Migrator`] walks every table of a [`RowStore`], pages through its rows, runs each
//! row through the [`RowProcessor`] and writes changed rows back. Per-row and
//! per-value problems go to the [`IssueLog`]; only store failures while listing or
//! reading tables abort the run.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::Result;
use crate::issues::{IssueKind, IssueLog};
use crate::processor::RowProcessor;
use crate::row::Row;
use crate::store::RowStore;
use crate::strategy::StrategyTable;

/// Default number of rows fetched per page
pub const DEFAULT_SELECT_LIMIT: usize = 100;

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tables visited
    pub tables: usize,
    /// Rows read
    pub rows_scanned: usize,
    /// Rows written back
    pub rows_updated: usize,
    /// Column values changed across all updated rows
    pub columns_changed: usize,
    /// Issues recorded
    pub issues: usize,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// Runs find and replace over a whole store
#[derive(Debug)]
pub struct Migrator {
    strategies: StrategyTable,
    select_limit: usize,
    issues: IssueLog,
}

impl Migrator {
    /// Migrator applying `strategies`, reading `select_limit` rows at a time.
    ///
    /// A `select_limit` of zero is treated as one.
    pub fn new(strategies: StrategyTable, select_limit: usize) -> Self {
        Migrator {
            strategies,
            select_limit: select_limit.max(1),
            issues: IssueLog::new(),
        }
    }

    /// Issues recorded so far
    pub fn issues(&self) -> &IssueLog {
        &self.issues
    }

    /// Take the recorded issues, leaving an empty log
    pub fn take_issues(&mut self) -> IssueLog {
        std::mem::take(&mut self.issues)
    }

    /// The column strategies in use
    pub fn strategies(&self) -> &StrategyTable {
        &self.strategies
    }

    /// Rewrite every table in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list tables, resolve a primary key, count
    /// rows or fetch a page. Failed row updates are recorded as issues instead.
    pub fn find_and_replace<S: RowStore + ?Sized>(&mut self, store: &mut S) -> Result<RunSummary> {
        let started = Instant::now();
        let issues_before = self.issues.len();
        let tables = store.tables()?;
        let width = tables.len().to_string().len();
        let mut summary = RunSummary::default();

        info!(
            target: "wpmigrate::migrate",
            tables = tables.len(),
            rules = self.strategies.rules().len(),
            "Starting find and replace"
        );

        for (i, table) in tables.iter().enumerate() {
            let n = format!("{:0width$}", i + 1, width = width);
            info!(
                target: "wpmigrate::migrate",
                "Find and Replace [{} of {}] {}",
                n,
                tables.len(),
                table
            );
            self.table(store, table, &mut summary)?;
            summary.tables += 1;
        }

        summary.issues = self.issues.len() - issues_before;
        summary.elapsed = started.elapsed();
        info!(
            target: "wpmigrate::migrate",
            rows_scanned = summary.rows_scanned,
            rows_updated = summary.rows_updated,
            issues = summary.issues,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Find and replace complete"
        );
        Ok(summary)
    }

    fn table<S: RowStore + ?Sized>(
        &mut self,
        store: &mut S,
        table: &str,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let Some(primary_key) = store.primary_key(table)? else {
            self.issues.record_row(
                IssueKind::MissingPrimaryKey,
                table,
                None,
                "table has no primary key",
                "",
            );
            return Ok(());
        };

        let row_count = store.row_count(table)?;
        let processor = RowProcessor::new(&self.strategies);
        let mut offset = 0;
        while offset < row_count {
            let rows = store.fetch_rows(table, self.select_limit, offset)?;
            debug!(
                target: "wpmigrate::migrate",
                table,
                offset,
                rows = rows.len(),
                "Fetched page"
            );
            if rows.is_empty() {
                break;
            }

            for mut row in rows {
                summary.rows_scanned += 1;
                let id = match row.get(&primary_key) {
                    Some(cell) if !cell.is_empty_key() => cell.to_string(),
                    _ => {
                        self.issues.record_row(
                            IssueKind::MissingPrimaryKey,
                            table,
                            None,
                            "",
                            describe_row(&row),
                        );
                        continue;
                    }
                };

                let outcome = processor.process_row(table, &primary_key, &id, &mut row, &mut self.issues);
                if !outcome.is_dirty() {
                    continue;
                }
                match store.update_row(table, &primary_key, &row) {
                    Ok(()) => {
                        summary.rows_updated += 1;
                        summary.columns_changed += outcome.changed_columns.len();
                    }
                    Err(e) => {
                        self.issues.record_row(
                            IssueKind::UpdateFailed,
                            table,
                            Some(&id),
                            e.to_string(),
                            describe_row(&row),
                        );
                    }
                }
            }
            offset += self.select_limit;
        }
        Ok(())
    }
}

/// Row rendered for an issue context
fn describe_row(row: &Row) -> String {
    serde_json::to_string(row).unwrap_or_default()
}
