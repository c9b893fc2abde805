use std::sync::Arc;
use std::time::Instant;

use stockdesk_models::Domain;
use tracing::{info, warn};

use crate::catalog::{QueryCatalog, QuerySet, Scope};
use crate::error::SqlError;
use crate::executor::QueryExecutor;

/// A catalog scope exposed to a specialist as one callable tool.
///
/// Holds no state of its own; it is a view over the shared catalog.
#[derive(Debug, Clone)]
pub struct Capability {
    scope: Scope,
    catalog: Arc<QueryCatalog>,
}

impl Capability {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn queries(&self) -> &QuerySet {
        self.catalog.scope(self.scope)
    }

    pub fn tool_name(&self) -> &'static str {
        match self.scope {
            Scope::Domain(Domain::Market) => "market_data_query",
            Scope::Domain(Domain::Ml) => "ml_model_data_query",
            Scope::Domain(Domain::Technical) => "tech_signal_data_query",
            Scope::Domain(Domain::Strategy) => "strategy_trade_data_query",
            Scope::Domain(Domain::Forex) => "forex_data_query",
            Scope::Domain(Domain::Risk) => "risk_data_query",
            Scope::Domain(Domain::CrossStrategy) => "cross_strategy_query",
            Scope::Combined => "stock_data_query",
        }
    }

    /// Tool description shown to the model, listing every addressable name.
    pub fn description(&self) -> String {
        match self.scope {
            Scope::Domain(d) => {
                let names: Vec<&str> = self.queries().names().collect();
                format!(
                    "Query {} from SQL Server. Available queries: {}. Use the query name as input.",
                    subject(d),
                    names.join(", ")
                )
            }
            Scope::Combined => {
                let mut names: Vec<&str> = self.queries().names().collect();
                names.sort_unstable();
                format!(
                    "Execute a predefined SQL query against the stock database. \
                     Available queries (use exact name): {}",
                    names.join(", ")
                )
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Result<&'static str, SqlError> {
        self.queries().get(name)
    }

    /// Resolve and execute `name`, returning the text handed back to the model.
    ///
    /// Unknown names and execution failures are returned as text as well.
    pub async fn run(&self, executor: &dyn QueryExecutor, name: &str) -> String {
        let sql = match self.resolve(name) {
            Ok(sql) => sql,
            Err(e) => {
                warn!(scope = %self.scope, query = name, "unknown catalog query");
                return e.to_string();
            }
        };

        let start = Instant::now();
        let outcome = executor.execute(sql).await;
        if outcome.is_failure() {
            warn!(
                scope = %self.scope,
                query = name,
                backend = executor.backend(),
                error = %outcome,
                "catalog query failed"
            );
        } else {
            info!(
                scope = %self.scope,
                query = name,
                backend = executor.backend(),
                rows = outcome.row_count(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "catalog query executed"
            );
        }
        outcome.render()
    }
}

fn subject(domain: Domain) -> &'static str {
    match domain {
        Domain::Market => "market data",
        Domain::Ml => "ML model performance data",
        Domain::Technical => "technical signal data",
        Domain::Strategy => "strategy and trade data",
        Domain::Forex => "forex market data",
        Domain::Risk => "risk and portfolio data",
        Domain::CrossStrategy => "cross-strategy data",
    }
}

/// Hands out [`Capability`] views over one shared catalog.
#[derive(Debug, Clone)]
pub struct CapabilityRouter {
    catalog: Arc<QueryCatalog>,
}

impl CapabilityRouter {
    pub fn new(catalog: Arc<QueryCatalog>) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(QueryCatalog::standard()))
    }

    pub fn catalog(&self) -> &Arc<QueryCatalog> {
        &self.catalog
    }

    pub fn for_domain(&self, domain: Domain) -> Capability {
        self.capability(Scope::Domain(domain))
    }

    pub fn combined(&self) -> Capability {
        self.capability(Scope::Combined)
    }

    pub fn capability(&self, scope: Scope) -> Capability {
        Capability {
            scope,
            catalog: Arc::clone(&self.catalog),
        }
    }
}
