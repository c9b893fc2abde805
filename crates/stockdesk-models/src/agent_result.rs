use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// Text shown for a domain that produced no entry at all.
pub const NO_DATA_PLACEHOLDER: &str = "No data available.";

/// Free-text output of one briefing run, keyed by domain.
///
/// Owned by a single run: filled by the pipeline, read once by the report
/// compiler, then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResults {
    entries: BTreeMap<Domain, String>,
}

impl AgentResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, domain: Domain, text: impl Into<String>) {
        self.entries.insert(domain, text.into());
    }

    pub fn get(&self, domain: Domain) -> Option<&str> {
        self.entries.get(&domain).map(String::as_str)
    }

    /// Text for a report section, falling back to [`NO_DATA_PLACEHOLDER`].
    pub fn section_text(&self, domain: Domain) -> &str {
        self.get(domain).unwrap_or(NO_DATA_PLACEHOLDER)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.entries.keys().copied()
    }
}

impl FromIterator<(Domain, String)> for AgentResults {
    fn from_iter<I: IntoIterator<Item = (Domain, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
