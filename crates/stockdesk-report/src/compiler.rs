use std::path::Path;

use minijinja::{context, Environment};
use stockdesk_models::{AgentResults, Domain};

use crate::error::ReportError;
use crate::html::LineRules;

const EMBEDDED_TEMPLATE: &str = include_str!("../templates/briefing_email.html");

/// Subject line for a briefing sent on `report_date`.
pub fn subject_for(report_date: &str) -> String {
    format!("Daily Trading Briefing - {report_date}")
}

/// Template slot each domain's section is rendered into.
fn slot(domain: Domain) -> &'static str {
    match domain {
        Domain::Market => "market_overview",
        Domain::Ml => "ml_model_health",
        Domain::Technical => "tech_signals",
        Domain::Strategy => "trade_opportunities",
        Domain::Forex => "forex_outlook",
        Domain::Risk => "risk_warnings",
        Domain::CrossStrategy => "cross_strategy",
    }
}

/// Turns a run's results into the briefing HTML.
///
/// Rendering is a pure function of the results and the date string.
#[derive(Debug, Clone)]
pub struct ReportCompiler {
    template: String,
    rules: LineRules,
}

impl ReportCompiler {
    /// Compiler using the template built into the binary.
    pub fn embedded() -> Result<Self, ReportError> {
        Self::from_source(EMBEDDED_TEMPLATE)
    }

    /// Compiler using a template file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|source| ReportError::TemplateRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_source(source)
    }

    pub fn from_source(source: impl Into<String>) -> Result<Self, ReportError> {
        let template = source.into();
        let env = Environment::new();
        env.template_from_str(&template)
            .map_err(|e| ReportError::TemplateSyntax(e.to_string()))?;
        let rules = LineRules::new().map_err(|e| ReportError::TemplateSyntax(e.to_string()))?;
        Ok(Self { template, rules })
    }

    pub fn compile(&self, results: &AgentResults, report_date: &str) -> Result<String, ReportError> {
        let section = |d: Domain| self.rules.to_html(results.section_text(d));
        let ctx = context! {
            report_date => report_date,
            market_overview => section(Domain::Market),
            ml_model_health => section(Domain::Ml),
            tech_signals => section(Domain::Technical),
            trade_opportunities => section(Domain::Strategy),
            forex_outlook => section(Domain::Forex),
            risk_warnings => section(Domain::Risk),
            cross_strategy => section(Domain::CrossStrategy),
        };

        Environment::new()
            .render_str(&self.template, ctx)
            .map_err(|e| ReportError::Render(e.to_string()))
    }

    /// Names of the template variables, in pipeline order.
    pub fn slots() -> impl Iterator<Item = &'static str> {
        Domain::PIPELINE.into_iter().map(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_models::NO_DATA_PLACEHOLDER;

    fn full_results() -> AgentResults {
        Domain::PIPELINE
            .into_iter()
            .map(|d| (d, format!("**{}**\n- point for {}", d.title(), d.key())))
            .collect()
    }

    #[test]
    fn embedded_template_has_every_slot() {
        for name in ReportCompiler::slots() {
            assert!(
                EMBEDDED_TEMPLATE.contains(&format!("{{{{ {name} }}}}")),
                "template is missing {name}"
            );
        }
        assert!(EMBEDDED_TEMPLATE.contains("{{ report_date }}"));
    }

    #[test]
    fn every_section_is_rendered() {
        let compiler = ReportCompiler::embedded().unwrap();
        let html = compiler.compile(&full_results(), "March 03, 2025").unwrap();

        assert!(html.contains("March 03, 2025"));
        for d in Domain::PIPELINE {
            assert!(html.contains(&format!("<li>point for {}</li>", d.key())));
        }
        assert!(html.contains("<p><strong>Risk Assessment</strong></p>"));
    }

    #[test]
    fn missing_domains_show_placeholder() {
        let mut results = AgentResults::new();
        results.insert(Domain::Market, "Breadth positive");
        let compiler = ReportCompiler::embedded().unwrap();
        let html = compiler.compile(&results, "March 03, 2025").unwrap();

        let placeholder = format!("<p>{NO_DATA_PLACEHOLDER}</p>");
        assert_eq!(html.matches(&placeholder).count(), 6);
        assert!(html.contains("<p>Breadth positive</p>"));
    }

    #[test]
    fn output_is_deterministic() {
        let compiler = ReportCompiler::embedded().unwrap();
        let results = full_results();
        let a = compiler.compile(&results, "March 03, 2025").unwrap();
        let b = compiler.compile(&results, "March 03, 2025").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fragments_are_not_escaped() {
        let compiler = ReportCompiler::from_source("{{ market_overview }}").unwrap();
        let mut results = AgentResults::new();
        results.insert(Domain::Market, "**Up** day");
        let html = compiler.compile(&results, "today").unwrap();
        assert_eq!(html, "<p><strong>Up</strong> day</p>");
    }

    #[test]
    fn broken_template_is_rejected() {
        let err = ReportCompiler::from_source("{{ market_overview").unwrap_err();
        assert!(matches!(err, ReportError::TemplateSyntax(_)));
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let err = ReportCompiler::from_path("/nonexistent/briefing.html").unwrap_err();
        assert!(matches!(err, ReportError::TemplateRead { .. }));
    }

    #[test]
    fn subject_includes_date() {
        assert_eq!(subject_for("March 03, 2025"), "Daily Trading Briefing - March 03, 2025");
    }
}
