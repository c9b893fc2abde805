pub mod catalog;
pub mod error;
pub mod executor;
pub mod mssql;
pub mod queries;
pub mod router;
pub mod sqlite;

pub use catalog::{NamedQuery, QueryCatalog, QuerySet, Scope};
pub use error::SqlError;
pub use executor::{QueryExecutor, QueryOutcome, ResultTable, TableCount};
pub use mssql::{MssqlExecutor, INTEGRATED_AUTH};
pub use router::{Capability, CapabilityRouter};
pub use sqlite::SqliteExecutor;
