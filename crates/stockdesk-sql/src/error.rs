use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlError {
    /// The message format is read by the model, which retries with a listed name.
    #[error("Query '{name}' not found. Available queries: {}", .available.join(", "))]
    UnknownQuery {
        scope: String,
        name: String,
        available: Vec<String>,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("SQL Server error: {0}")]
    Mssql(#[from] tiberius::error::Error),

    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error(
        "trusted connection needs integrated authentication, which this build lacks; \
         set SQL_TRUSTED_CONNECTION=no with SQL_USERNAME/SQL_PASSWORD, or build with \
         the integrated-auth-gssapi feature"
    )]
    IntegratedAuthUnavailable,

    #[error("query task failed: {0}")]
    Task(String),
}

impl SqlError {
    /// True for errors raised by the database driver itself.
    pub fn is_database_error(&self) -> bool {
        matches!(self, SqlError::Sqlite(_) | SqlError::Mssql(_))
    }
}
