use std::fmt;

use async_trait::async_trait;

use crate::error::SqlError;

/// Rows with their column names. `None` is a database NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// Pipe-separated text table followed by a row count.
    pub fn render(&self) -> String {
        let header = self.columns.join(" | ");
        let rule = "-".repeat(header.chars().count());
        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        lines.push(header);
        lines.push(rule);
        for row in &self.rows {
            let cells: Vec<&str> = row
                .iter()
                .map(|cell| cell.as_deref().unwrap_or("NULL"))
                .collect();
            lines.push(cells.join(" | "));
        }
        lines.push(format!("\n({} rows returned)", self.rows.len()));
        lines.join("\n")
    }
}

/// Result of executing one statement. Failures are values, not errors, so a
/// specialist can read the message and try a different query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(ResultTable),
    NoResults,
    Failed(String),
}

impl QueryOutcome {
    pub const NO_RESULTS_TEXT: &'static str = "Query returned no results.";

    pub fn from_result(result: Result<ResultTable, SqlError>) -> Self {
        match result {
            Ok(table) if table.rows.is_empty() => QueryOutcome::NoResults,
            Ok(table) => QueryOutcome::Rows(table),
            Err(e) => QueryOutcome::Failed(describe_failure(&e)),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            QueryOutcome::Rows(t) => t.rows.len(),
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }

    pub fn render(&self) -> String {
        match self {
            QueryOutcome::Rows(t) => t.render(),
            QueryOutcome::NoResults => Self::NO_RESULTS_TEXT.to_string(),
            QueryOutcome::Failed(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn describe_failure(err: &SqlError) -> String {
    match err {
        SqlError::Sqlite(e) => format!("SQL Error: {e}"),
        SqlError::Mssql(e) => format!("SQL Error: {e}"),
        other => format!("Error executing query: {other}"),
    }
}

/// A base table and its row count, as reported by the connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub name: String,
    pub rows: i64,
}

/// Executes statements against the external store.
///
/// Implementations open a connection per call and release it on every exit path.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Short backend label for logs and the probe output.
    fn backend(&self) -> &'static str;

    /// Run one statement. Never fails; failures come back as [`QueryOutcome::Failed`].
    async fn execute(&self, sql: &str) -> QueryOutcome;

    /// Every base table with its row count, ordered by name.
    async fn table_inventory(&self) -> Result<Vec<TableCount>, SqlError>;
}
