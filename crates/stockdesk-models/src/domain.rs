use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One analytical subject area. Each domain owns a query scope and a specialist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Market,
    Ml,
    Technical,
    Strategy,
    Forex,
    Risk,
    CrossStrategy,
}

impl Domain {
    /// The briefing order. Specialists run in exactly this sequence.
    pub const PIPELINE: [Domain; 7] = [
        Domain::Market,
        Domain::Ml,
        Domain::Technical,
        Domain::Strategy,
        Domain::Forex,
        Domain::Risk,
        Domain::CrossStrategy,
    ];

    /// Stable lowercase key used in config, logs and result maps.
    pub fn key(self) -> &'static str {
        match self {
            Domain::Market => "market",
            Domain::Ml => "ml",
            Domain::Technical => "technical",
            Domain::Strategy => "strategy",
            Domain::Forex => "forex",
            Domain::Risk => "risk",
            Domain::CrossStrategy => "cross_strategy",
        }
    }

    /// Name of the per-specialist server, as used by `--agent` on the A2A binary.
    pub fn agent_id(self) -> &'static str {
        match self {
            Domain::Market => "market_intel",
            Domain::Ml => "ml_analyst",
            Domain::Technical => "tech_signal",
            Domain::Strategy => "strategy_trade",
            Domain::Forex => "forex",
            Domain::Risk => "risk",
            Domain::CrossStrategy => "cross_strategy",
        }
    }

    /// Prefix applied to this domain's query names in the combined chat catalog.
    pub fn chat_prefix(self) -> &'static str {
        match self {
            Domain::Market => "market_",
            Domain::Ml => "ml_",
            Domain::Technical => "tech_",
            Domain::Strategy => "strategy_",
            Domain::Forex => "forex_",
            Domain::Risk => "risk_",
            Domain::CrossStrategy => "cross_",
        }
    }

    /// Human-readable section title.
    pub fn title(self) -> &'static str {
        match self {
            Domain::Market => "Market Intelligence",
            Domain::Ml => "ML Model Analysis",
            Domain::Technical => "Technical Signals",
            Domain::Strategy => "Strategy & Trade",
            Domain::Forex => "Forex Analysis",
            Domain::Risk => "Risk Assessment",
            Domain::CrossStrategy => "Cross-Strategy Analysis",
        }
    }

    /// Position in [`Domain::PIPELINE`], zero-based.
    pub fn position(self) -> usize {
        Self::PIPELINE
            .iter()
            .position(|d| *d == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDomain(pub String);

impl fmt::Display for UnknownDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<&str> = Domain::PIPELINE.iter().map(|d| d.key()).collect();
        write!(f, "unknown domain '{}' (expected one of: {})", self.0, valid.join(", "))
    }
}

impl std::error::Error for UnknownDomain {}

impl FromStr for Domain {
    type Err = UnknownDomain;

    /// Accepts both the domain key and the agent id (`market` or `market_intel`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Domain::PIPELINE
            .into_iter()
            .find(|d| d.key() == wanted || d.agent_id() == wanted)
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_order_is_fixed() {
        let keys: Vec<&str> = Domain::PIPELINE.iter().map(|d| d.key()).collect();
        assert_eq!(
            keys,
            vec!["market", "ml", "technical", "strategy", "forex", "risk", "cross_strategy"]
        );
        assert_eq!(Domain::CrossStrategy.position(), 6);
    }

    #[test]
    fn parse_key_and_agent_id() {
        assert_eq!("market".parse::<Domain>().unwrap(), Domain::Market);
        assert_eq!("market_intel".parse::<Domain>().unwrap(), Domain::Market);
        assert_eq!("cross-strategy".parse::<Domain>().unwrap(), Domain::CrossStrategy);
        assert_eq!("TECH_SIGNAL".parse::<Domain>().unwrap(), Domain::Technical);
    }

    #[test]
    fn parse_unknown_lists_valid_keys() {
        let err = "crypto".parse::<Domain>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("crypto"));
        assert!(msg.contains("cross_strategy"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Domain::CrossStrategy).unwrap();
        assert_eq!(json, "\"cross_strategy\"");
    }
}
