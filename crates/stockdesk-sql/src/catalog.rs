use std::fmt;

use stockdesk_models::Domain;

use crate::error::SqlError;
use crate::queries;

/// A slice of the catalog a caller can address by query name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Domain(Domain),
    /// Every domain's queries, names prefixed with the domain's chat prefix.
    Combined,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Domain(d) => write!(f, "{d}"),
            Scope::Combined => f.write_str("combined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    pub name: String,
    pub sql: &'static str,
}

/// Ordered, read-only set of named statements.
#[derive(Debug, Clone)]
pub struct QuerySet {
    scope: Scope,
    queries: Vec<NamedQuery>,
}

impl QuerySet {
    fn from_static(scope: Scope, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            scope,
            queries: entries
                .iter()
                .map(|(name, sql)| NamedQuery {
                    name: (*name).to_string(),
                    sql: sql.trim(),
                })
                .collect(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Look up a statement by exact name (surrounding whitespace ignored).
    pub fn get(&self, name: &str) -> Result<&'static str, SqlError> {
        let wanted = name.trim();
        self.queries
            .iter()
            .find(|q| q.name == wanted)
            .map(|q| q.sql)
            .ok_or_else(|| SqlError::UnknownQuery {
                scope: self.scope.to_string(),
                name: wanted.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queries.iter().any(|q| q.name == name)
    }

    /// Names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedQuery> {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// Process-wide query catalog. Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    /// Indexed by [`Domain::position`].
    domains: Vec<QuerySet>,
    combined: QuerySet,
}

impl QueryCatalog {
    /// The production catalog.
    pub fn standard() -> Self {
        let domains: Vec<QuerySet> = Domain::PIPELINE
            .into_iter()
            .map(|d| QuerySet::from_static(Scope::Domain(d), statements_for(d)))
            .collect();

        let combined = QuerySet {
            scope: Scope::Combined,
            queries: domains
                .iter()
                .flat_map(|set| {
                    let prefix = match set.scope {
                        Scope::Domain(d) => d.chat_prefix(),
                        Scope::Combined => "",
                    };
                    set.queries.iter().map(move |q| NamedQuery {
                        name: format!("{prefix}{}", q.name),
                        sql: q.sql,
                    })
                })
                .collect(),
        };

        Self { domains, combined }
    }

    pub fn domain(&self, domain: Domain) -> &QuerySet {
        &self.domains[domain.position()]
    }

    pub fn combined(&self) -> &QuerySet {
        &self.combined
    }

    pub fn scope(&self, scope: Scope) -> &QuerySet {
        match scope {
            Scope::Domain(d) => self.domain(d),
            Scope::Combined => self.combined(),
        }
    }

    /// Resolve `name` within `domain`.
    pub fn resolve(&self, domain: Domain, name: &str) -> Result<&'static str, SqlError> {
        self.domain(domain).get(name)
    }
}

fn statements_for(domain: Domain) -> &'static [(&'static str, &'static str)] {
    match domain {
        Domain::Market => queries::MARKET,
        Domain::Ml => queries::ML,
        Domain::Technical => queries::TECHNICAL,
        Domain::Strategy => queries::STRATEGY,
        Domain::Forex => queries::FOREX,
        Domain::Risk => queries::RISK,
        Domain::CrossStrategy => queries::CROSS_STRATEGY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_has_queries() {
        let catalog = QueryCatalog::standard();
        for d in Domain::PIPELINE {
            assert!(!catalog.domain(d).is_empty(), "{d} has no queries");
            assert_eq!(catalog.domain(d).scope(), Scope::Domain(d));
        }
    }

    #[test]
    fn names_are_unique_within_a_scope() {
        let catalog = QueryCatalog::standard();
        for d in Domain::PIPELINE {
            let mut names: Vec<&str> = catalog.domain(d).names().collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "duplicate names in {d}");
        }
    }

    #[test]
    fn resolve_known_query() {
        let catalog = QueryCatalog::standard();
        let sql = catalog
            .resolve(Domain::Forex, "forex_latest_rates")
            .unwrap();
        assert!(sql.starts_with("SELECT"));
        assert_eq!(sql, sql.trim());
    }

    #[test]
    fn unknown_query_lists_exactly_that_scope() {
        let catalog = QueryCatalog::standard();
        let err = catalog.resolve(Domain::Market, "nope").unwrap_err();
        match &err {
            SqlError::UnknownQuery {
                scope,
                name,
                available,
            } => {
                assert_eq!(scope, "market");
                assert_eq!(name, "nope");
                assert_eq!(
                    available,
                    &[
                        "nasdaq_top_movers",
                        "nse_top_movers",
                        "nasdaq_market_summary",
                        "nse_market_summary"
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "Query 'nope' not found. Available queries: nasdaq_top_movers, nse_top_movers, \
             nasdaq_market_summary, nse_market_summary"
        );
    }

    #[test]
    fn combined_catalog_prefixes_every_name() {
        let catalog = QueryCatalog::standard();
        let total: usize = Domain::PIPELINE
            .iter()
            .map(|d| catalog.domain(*d).len())
            .sum();
        assert_eq!(catalog.combined().len(), total);
        assert!(catalog.combined().contains("market_nasdaq_top_movers"));
        assert!(catalog.combined().contains("tech_active_signals_today"));
        assert!(catalog.combined().contains("cross_common_stocks_summary"));
        assert!(!catalog.combined().contains("nasdaq_top_movers"));

        let prefixed = catalog.combined().get("risk_active_alerts").unwrap();
        let plain = catalog.resolve(Domain::Risk, "active_alerts").unwrap();
        assert_eq!(prefixed, plain);
    }

    #[test]
    fn lookup_ignores_surrounding_whitespace() {
        let catalog = QueryCatalog::standard();
        assert!(catalog.resolve(Domain::Risk, "  active_alerts\n").is_ok());
    }
}
