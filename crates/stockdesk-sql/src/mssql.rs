use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use stockdesk_models::DatabaseConfig;
use tiberius::{Client, ColumnData, Config, FromSql};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use crate::error::SqlError;
use crate::executor::{QueryExecutor, QueryOutcome, ResultTable, TableCount};
use crate::sqlite::render_float;

/// Whether this build can log in with the process's own identity
/// (SSPI on Windows, Kerberos with the `integrated-auth-gssapi` feature).
pub const INTEGRATED_AUTH: bool = cfg!(any(windows, feature = "integrated-auth-gssapi"));

/// SQL Server executor speaking TDS directly.
///
/// A connection is opened per statement and dropped when the call returns,
/// whether it succeeded, failed or timed out.
pub struct MssqlExecutor {
    connection_string: String,
    timeout: Duration,
}

impl MssqlExecutor {
    /// `connection_string` is in ADO form, see `DatabaseConfig::connection_string`.
    pub fn new(connection_string: impl Into<String>, timeout: Duration) -> Self {
        Self {
            connection_string: connection_string.into(),
            timeout,
        }
    }

    /// Executor for `config`, checked up front.
    ///
    /// Trusted mode is refused when the build has no integrated auth, since
    /// the driver would otherwise fall back to a SQL login with an empty user.
    pub fn from_config(config: &DatabaseConfig, timeout: Duration) -> Result<Self, SqlError> {
        if config.trusted_connection && !INTEGRATED_AUTH {
            return Err(SqlError::IntegratedAuthUnavailable);
        }
        let connection_string = config.connection_string();
        Config::from_ado_string(&connection_string)?;
        Ok(Self::new(connection_string, timeout))
    }

    async fn connect(&self) -> Result<Client<Compat<TcpStream>>, SqlError> {
        let config = Config::from_ado_string(&self.connection_string)?;
        let tcp = TcpStream::connect(config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        let client = Client::connect(config, tcp.compat_write()).await?;
        Ok(client)
    }

    async fn read_table(&self, sql: &str) -> Result<ResultTable, SqlError> {
        let mut client = self.connect().await?;
        let mut stream = client.simple_query(sql).await?;
        let columns: Vec<String> = stream
            .columns()
            .await?
            .map(|cols| cols.iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let mut table = ResultTable::new(columns);
        for row in stream.into_first_result().await? {
            table.push_row(row.into_iter().map(|cell| render_cell(&cell)).collect());
        }
        Ok(table)
    }

    async fn inventory(&self) -> Result<Vec<TableCount>, SqlError> {
        let mut client = self.connect().await?;
        let names: Vec<String> = client
            .simple_query(
                "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
                 WHERE TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME",
            )
            .await?
            .into_first_result()
            .await?
            .iter()
            .filter_map(|row| row.try_get::<&str, _>(0).ok().flatten().map(str::to_string))
            .collect();

        let mut counts = Vec::with_capacity(names.len());
        for name in names {
            let quoted = name.replace(']', "]]");
            let rows = client
                .simple_query(format!("SELECT COUNT_BIG(*) FROM [{quoted}]"))
                .await?
                .into_row()
                .await?
                .and_then(|row| row.try_get::<i64, _>(0).ok().flatten())
                .unwrap_or_default();
            counts.push(TableCount { name, rows });
        }
        Ok(counts)
    }

    async fn bounded<T>(
        &self,
        work: impl std::future::Future<Output = Result<T, SqlError>>,
    ) -> Result<T, SqlError> {
        tokio::time::timeout(self.timeout, work)
            .await
            .unwrap_or(Err(SqlError::Timeout(self.timeout)))
    }
}

fn render_cell(cell: &ColumnData<'static>) -> Option<String> {
    match cell {
        ColumnData::U8(v) => v.map(|v| v.to_string()),
        ColumnData::I16(v) => v.map(|v| v.to_string()),
        ColumnData::I32(v) => v.map(|v| v.to_string()),
        ColumnData::I64(v) => v.map(|v| v.to_string()),
        ColumnData::F32(v) => v.map(|v| render_float(f64::from(v))),
        ColumnData::F64(v) => v.map(render_float),
        ColumnData::Bit(v) => v.map(|b| if b { "True" } else { "False" }.to_string()),
        ColumnData::String(v) => v.as_ref().map(|s| s.to_string()),
        ColumnData::Guid(v) => v.as_ref().map(|g| g.to_string()),
        ColumnData::Numeric(v) => v.as_ref().map(|n| n.to_string()),
        ColumnData::Binary(v) => v.as_ref().map(|b| format!("<{} bytes>", b.len())),
        ColumnData::Xml(v) => v.as_ref().map(|x| x.clone().into_owned().into_string()),
        _ => temporal_text(cell),
    }
}

/// Date and time columns, whichever chrono type the cell converts into.
fn temporal_text(cell: &ColumnData<'static>) -> Option<String> {
    temporal::<NaiveDateTime>(cell)
        .or_else(|| temporal::<NaiveDate>(cell))
        .or_else(|| temporal::<NaiveTime>(cell))
        .or_else(|| temporal::<DateTime<FixedOffset>>(cell))
}

fn temporal<'a, T>(cell: &'a ColumnData<'static>) -> Option<String>
where
    T: FromSql<'a> + ToString,
{
    T::from_sql(cell).ok().flatten().map(|v| v.to_string())
}

#[async_trait]
impl QueryExecutor for MssqlExecutor {
    fn backend(&self) -> &'static str {
        "mssql"
    }

    async fn execute(&self, sql: &str) -> QueryOutcome {
        let result = self.bounded(self.read_table(sql)).await;
        if let Err(e) = &result {
            debug!(error = %e, "sql server query failed");
        }
        QueryOutcome::from_result(result)
    }

    async fn table_inventory(&self) -> Result<Vec<TableCount>, SqlError> {
        self.bounded(self.inventory()).await
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    #[test]
    fn nulls_render_as_none() {
        assert_eq!(render_cell(&ColumnData::I32(None)), None);
        assert_eq!(render_cell(&ColumnData::String(None)), None);
        assert_eq!(render_cell(&ColumnData::F64(None)), None);
    }

    #[test]
    fn scalar_cells_render_as_text() {
        assert_eq!(render_cell(&ColumnData::I64(Some(1_250_000))), Some("1250000".into()));
        assert_eq!(render_cell(&ColumnData::F64(Some(101.0))), Some("101.0".into()));
        assert_eq!(render_cell(&ColumnData::Bit(Some(true))), Some("True".into()));
        assert_eq!(
            render_cell(&ColumnData::String(Some(Cow::Borrowed("NVDA")))),
            Some("NVDA".into())
        );
        assert_eq!(
            render_cell(&ColumnData::String(Some(Cow::Borrowed("")))),
            Some(String::new())
        );
    }

    fn database(trusted: bool) -> DatabaseConfig {
        DatabaseConfig {
            database: "stockdata_db".to_string(),
            username: "reader".to_string(),
            password: "s3cret".to_string(),
            trusted_connection: trusted,
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn credential_mode_logs_in_as_the_configured_user() {
        let config = Config::from_ado_string(&database(false).connection_string()).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("SqlServer"));
        assert!(debug.contains(r#"user: "reader""#));
        assert!(MssqlExecutor::from_config(&database(false), Duration::from_secs(5)).is_ok());
    }

    #[cfg(any(windows, feature = "integrated-auth-gssapi"))]
    #[test]
    fn trusted_mode_uses_integrated_auth() {
        let config = Config::from_ado_string(&database(true).connection_string()).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("Integrated"));
        assert!(!debug.contains("SqlServer"));
        assert!(MssqlExecutor::from_config(&database(true), Duration::from_secs(5)).is_ok());
    }

    #[cfg(not(any(windows, feature = "integrated-auth-gssapi")))]
    #[test]
    fn trusted_mode_is_refused_without_integrated_auth() {
        let err = MssqlExecutor::from_config(&database(true), Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, SqlError::IntegratedAuthUnavailable));
        assert!(err.to_string().contains("SQL_TRUSTED_CONNECTION=no"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_failed_outcome() {
        let executor = MssqlExecutor::new(
            "server=tcp:127.0.0.1,1;database=none;user id=x;password=y;TrustServerCertificate=true",
            Duration::from_secs(5),
        );
        let outcome = executor.execute("SELECT 1").await;
        assert!(outcome.is_failure());
        assert!(outcome.render().starts_with("Error executing query:")
            || outcome.render().starts_with("SQL Error:"));
    }
}
