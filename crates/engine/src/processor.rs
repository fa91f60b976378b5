//! Row-level find and replace

use tracing::debug;

use crate::issues::{IssueKind, IssueLog, Location};
use crate::row::{Cell, Row, RowContext};
use crate::strategy::{ColumnInput, StrategyTable};

/// What processing a row did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowOutcome {
    /// Columns whose value changed, in column order
    pub changed_columns: Vec<String>,
}

impl RowOutcome {
    /// True when the row needs to be written back
    pub fn is_dirty(&self) -> bool {
        !self.changed_columns.is_empty()
    }
}

/// Applies the column strategies to every text column of a row
#[derive(Debug, Clone, Copy)]
pub struct RowProcessor<'a> {
    strategies: &'a StrategyTable,
}

impl<'a> RowProcessor<'a> {
    /// Processor using `strategies`
    pub fn new(strategies: &'a StrategyTable) -> Self {
        RowProcessor { strategies }
    }

    /// Rewrite `row` in place.
    ///
    /// The primary key column and non-text cells are never touched. Every strategy
    /// sees the row as it was before this call, whatever order the columns are in.
    pub fn process_row(
        &self,
        table: &str,
        primary_key: &str,
        id: &str,
        row: &mut Row,
        issues: &mut IssueLog,
    ) -> RowOutcome {
        let context = RowContext::new(id, row);
        let mut outcome = RowOutcome::default();

        for (column, cell) in row.iter_mut() {
            if column == primary_key {
                continue;
            }
            let Cell::Text(value) = cell else {
                continue;
            };

            let input = ColumnInput {
                table,
                column,
                row: &context,
                value: value.as_str(),
            };
            let Some(bytes) = self.strategies.select(table, column).rewrite(&input, issues) else {
                continue;
            };

            match String::from_utf8(bytes) {
                Ok(text) => {
                    *value = text;
                    outcome.changed_columns.push(column.to_string());
                }
                Err(e) => {
                    issues.record_value(
                        IssueKind::Encoding,
                        &Location::new(table, id, column),
                        e.to_string(),
                        e.as_bytes(),
                    );
                }
            }
        }

        if outcome.is_dirty() {
            debug!(
                target: "wpmigrate::processor",
                table,
                row = id,
                columns = outcome.changed_columns.len(),
                "Row changed"
            );
        }
        outcome
    }
}
