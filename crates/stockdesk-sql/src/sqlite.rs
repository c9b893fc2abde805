use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::SqlError;
use crate::executor::{QueryExecutor, QueryOutcome, ResultTable, TableCount};

/// Read-only executor over a local SQLite file.
///
/// Used for development snapshots of the production schema and for tests.
/// Each call opens its own connection on the blocking pool.
pub struct SqliteExecutor {
    path: PathBuf,
    timeout: Duration,
}

impl SqliteExecutor {
    pub fn new(path: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(path: &Path) -> Result<Connection, SqlError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, SqlError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, SqlError> + Send + 'static,
    {
        let path = self.path.clone();
        let task = tokio::task::spawn_blocking(move || {
            let conn = Self::open(&path)?;
            work(&conn)
        });
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(SqlError::Task(join.to_string())),
            Err(_) => Err(SqlError::Timeout(self.timeout)),
        }
    }
}

fn read_table(conn: &Connection, sql: &str) -> Result<ResultTable, SqlError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();
    let mut table = ResultTable::new(columns);

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(render_value(row.get_ref(i)?));
        }
        table.push_row(cells);
    }
    Ok(table)
}

fn render_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(render_float(f)),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(format!("<{} bytes>", b.len())),
    }
}

/// Whole floats keep one decimal place so prices read as prices.
pub(crate) fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn execute(&self, sql: &str) -> QueryOutcome {
        let sql = sql.to_string();
        let result = self.blocking(move |conn| read_table(conn, &sql)).await;
        if let Err(e) = &result {
            debug!(error = %e, "sqlite query failed");
        }
        QueryOutcome::from_result(result)
    }

    async fn table_inventory(&self) -> Result<Vec<TableCount>, SqlError> {
        self.blocking(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            let mut counts = Vec::with_capacity(names.len());
            for name in names {
                let quoted = name.replace('"', "\"\"");
                let rows: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM \"{quoted}\""), [], |r| {
                        r.get(0)
                    })?;
                counts.push(TableCount { name, rows });
            }
            Ok(counts)
        })
        .await
    }
}
