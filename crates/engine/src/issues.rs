//! Non-fatal issues collected during a run
//!
//! A column value that cannot be decoded, a row without a primary key, or an update
//! the store rejects does not stop the migration. Each one is recorded here with
//! enough context to find the offending data afterwards, logged as a warning, and
//! reported at the end of the run.

use std::fmt;

use tracing::warn;

/// Category of a recorded issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Serialized text could not be decoded
    Decode,
    /// Decoded to boolean `false` but the text is not the canonical `false` encoding
    AmbiguousScalar,
    /// Well-formed serialized data using a token the engine cannot rewrite
    UnknownShape,
    /// Row or table has no usable primary key
    MissingPrimaryKey,
    /// The store rejected a row update
    UpdateFailed,
    /// Rewritten bytes are not valid UTF-8 and cannot be stored in a text column
    Encoding,
}

impl IssueKind {
    /// Short human-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Decode => "Unable to unserialize all or part of column data.",
            IssueKind::AmbiguousScalar => "Column data unserializes to an ambiguous false value.",
            IssueKind::UnknownShape => {
                "All or part of column data is an unknown type of serialized data."
            }
            IssueKind::MissingPrimaryKey => "Invalid primary value.",
            IssueKind::UpdateFailed => "Unable to update row.",
            IssueKind::Encoding => "Rewritten column data is not valid UTF-8.",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the database a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// Table name
    pub table: &'a str,
    /// Primary key value of the row, rendered as text
    pub row_id: &'a str,
    /// Column name
    pub column: &'a str,
}

impl<'a> Location<'a> {
    /// Location of a column value
    pub fn new(table: &'a str, row_id: &'a str, column: &'a str) -> Self {
        Location {
            table,
            row_id,
            column,
        }
    }
}

/// One recorded issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Category
    pub kind: IssueKind,
    /// Table name
    pub table: String,
    /// Primary key value, if the row had one
    pub row_id: Option<String>,
    /// Column name, if the issue concerns a single column
    pub column: Option<String>,
    /// Detail message
    pub message: String,
    /// The offending data
    pub context: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)?;
        if let Some(row_id) = &self.row_id {
            write!(f, " : {}", row_id)?;
        }
        if let Some(column) = &self.column {
            write!(f, " : {}", column)?;
        }
        write!(f, " : {}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " ({})", self.message)?;
        }
        if !self.context.is_empty() {
            write!(f, " : \n{}\n", self.context)?;
        }
        Ok(())
    }
}

/// Append-only list of issues for one run
#[derive(Debug, Default)]
pub struct IssueLog {
    issues: Vec<Issue>,
}

impl IssueLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue about a column value
    pub fn record_value(
        &mut self,
        kind: IssueKind,
        at: &Location<'_>,
        message: impl Into<String>,
        data: &[u8],
    ) {
        self.push(Issue {
            kind,
            table: at.table.to_string(),
            row_id: Some(at.row_id.to_string()),
            column: Some(at.column.to_string()),
            message: message.into(),
            context: String::from_utf8_lossy(data).into_owned(),
        });
    }

    /// Record an issue about a whole row or table
    pub fn record_row(
        &mut self,
        kind: IssueKind,
        table: &str,
        row_id: Option<&str>,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        self.push(Issue {
            kind,
            table: table.to_string(),
            row_id: row_id.map(str::to_string),
            column: None,
            message: message.into(),
            context: context.into(),
        });
    }

    fn push(&mut self, issue: Issue) {
        warn!(
            target: "wpmigrate::issues",
            table = %issue.table,
            row = issue.row_id.as_deref().unwrap_or("-"),
            column = issue.column.as_deref().unwrap_or("-"),
            kind = ?issue.kind,
            "{}",
            issue.message
        );
        self.issues.push(issue);
    }

    /// Number of recorded issues
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Recorded issues in the order they occurred
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Number of issues of one kind
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    /// End-of-run report: a count line followed by one line per issue.
    pub fn report(&self) -> String {
        if self.issues.is_empty() {
            return "No errors were logged.\n".to_string();
        }
        let mut out = format!("{} errors were logged.\n\n", self.issues.len());
        for issue in &self.issues {
            out.push_str(&issue.to_string());
            out.push('\n');
        }
        out
    }
}
