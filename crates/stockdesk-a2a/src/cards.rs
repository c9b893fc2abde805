//! Static discovery metadata for each specialist server.

use stockdesk_agents::SpecialistProfile;
use stockdesk_models::{AgentCard, CardCapabilities, Domain, Skill};

use crate::error::A2aError;

pub const CARD_VERSION: &str = "1.0.0";

pub fn description(domain: Domain) -> &'static str {
    match domain {
        Domain::Market => {
            "Analyzes latest price action, volume patterns, and market trends across NASDAQ 100 \
             and NSE 500 markets. Provides market breadth, top movers, and overall sentiment \
             assessment."
        }
        Domain::Ml => {
            "Evaluates prediction accuracy and health of 3 ML models: Linear Regression, Gradient \
             Boosting, and Random Forest. Provides model health scorecards, accuracy comparisons, \
             and degradation alerts."
        }
        Domain::Technical => {
            "Identifies active buy/sell signals from MACD, RSI, Bollinger Bands, Stochastic, \
             Fibonacci, SMA, and pattern analysis. Tracks historical signal outcomes at 7d, 14d, \
             and 30d horizons."
        }
        Domain::Strategy => {
            "Finds top trade opportunities by combining AI predictions with technical signals. \
             Ranks opportunities by tier (TIER 1/2/3), provides entry/exit levels, risk/reward \
             ratios, and warnings."
        }
        Domain::Forex => {
            "Analyzes currency pair movements with focus on USD/INR. Provides latest rates, ML \
             prediction signals, trend analysis against moving averages, and forex outlook."
        }
        Domain::Risk => {
            "Evaluates overall risk posture across all markets. Identifies high-risk positions, \
             conflicting signals, portfolio concentration, and provides family assets wealth \
             summary."
        }
        Domain::CrossStrategy => {
            "Finds stocks that both the AI + technical combo strategy and the ML classifier \
             strategy recommend in the same direction, and flags stocks where the two conflict."
        }
    }
}

pub fn capabilities(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Market => &["market_summary", "top_movers", "market_breadth", "volume_analysis"],
        Domain::Ml => &[
            "model_accuracy",
            "model_comparison",
            "degradation_detection",
            "accuracy_by_market",
        ],
        Domain::Technical => &[
            "active_signals",
            "signal_outcomes",
            "strongest_setups",
            "indicator_analysis",
        ],
        Domain::Strategy => &[
            "top_opportunities",
            "tier_analysis",
            "aligned_signals",
            "trade_management",
        ],
        Domain::Forex => &["forex_rates", "forex_predictions", "trend_analysis", "usd_inr_outlook"],
        Domain::Risk => &[
            "risk_assessment",
            "conflicting_signals",
            "portfolio_risk",
            "wealth_summary",
        ],
        Domain::CrossStrategy => &[
            "dual_confirmation",
            "strategy_conflicts",
            "high_conviction_setups",
        ],
    }
}

/// Default port: `base_port` plus the domain's pipeline position.
pub fn default_port(domain: Domain, base_port: u16) -> Result<u16, A2aError> {
    let offset = domain.position();
    u16::try_from(offset)
        .ok()
        .and_then(|o| base_port.checked_add(o))
        .ok_or_else(|| A2aError::PortOutOfRange {
            agent: domain.agent_id().to_string(),
            base_port,
            offset,
        })
}

/// Card advertised at `/.well-known/agent.json`.
pub fn agent_card(domain: Domain, port: u16) -> AgentCard {
    AgentCard {
        name: SpecialistProfile::for_domain(domain).name.to_string(),
        description: description(domain).to_string(),
        url: format!("http://localhost:{port}"),
        version: CARD_VERSION.to_string(),
        capabilities: CardCapabilities::default(),
        default_input_modes: vec!["text".to_string()],
        default_output_modes: vec!["text".to_string()],
        skills: capabilities(domain)
            .iter()
            .map(|c| Skill::from_capability(c))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_follow_pipeline_order() {
        let ports: Vec<u16> = Domain::PIPELINE
            .into_iter()
            .map(|d| default_port(d, 5001).unwrap())
            .collect();
        assert_eq!(ports, vec![5001, 5002, 5003, 5004, 5005, 5006, 5007]);
    }

    #[test]
    fn base_port_near_the_top_is_rejected() {
        assert_eq!(default_port(Domain::Market, 65535).unwrap(), 65535);
        let err = default_port(Domain::CrossStrategy, 65530).unwrap_err();
        assert!(matches!(
            err,
            A2aError::PortOutOfRange { base_port: 65530, offset: 6, .. }
        ));
        assert!(err.to_string().starts_with("Port for cross_strategy is out of range"));
    }

    #[test]
    fn forex_card() {
        let card = agent_card(Domain::Forex, 5005);
        assert_eq!(card.name, "Forex Analysis Agent");
        assert_eq!(card.url, "http://localhost:5005");
        assert_eq!(card.skills.len(), 4);
        assert_eq!(card.skills[3].id, "usd_inr_outlook");
        assert_eq!(card.skills[3].name, "Usd Inr Outlook");

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["defaultInputModes"][0], "text");
        assert_eq!(json["capabilities"]["pushNotifications"], false);
    }

    #[test]
    fn every_domain_has_capabilities() {
        for domain in Domain::PIPELINE {
            assert!(!capabilities(domain).is_empty());
        }
    }
}
