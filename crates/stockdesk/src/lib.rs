//! stockdesk - multi-agent daily stock briefing
//!
//! Seven LLM specialists, each bound to one slice of a fixed SQL query
//! catalog, run one after another; their text is compiled into an HTML
//! email and sent to a distribution list.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! # async fn demo() -> anyhow::Result<()> {
//! let config = stockdesk::load_config("config/stockdesk.toml")?;
//! let pipeline = stockdesk::build_pipeline(&config)?;
//! let compiler = stockdesk::report::ReportCompiler::embedded()?;
//! let run = pipeline
//!     .run(&stockdesk::agents::today_label(), &compiler, None)
//!     .await?;
//! println!("{}", run.html);
//! # Ok(())
//! # }
//! ```

pub use stockdesk_agents as agents;
pub use stockdesk_models as models;
pub use stockdesk_report as report;
pub use stockdesk_sql as sql;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use stockdesk_agents::calculators::thousands;
use stockdesk_agents::{
    AnthropicClient, BriefingPipeline, ChatAssistant, LlmClient, LlmSpecialist, PipelineStep,
    Specialist,
};
use stockdesk_models::{DatabaseBackend, DatabaseConfig, Domain, StockdeskConfig};
use stockdesk_sql::{CapabilityRouter, MssqlExecutor, QueryExecutor, SqliteExecutor, TableCount};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_PATH: &str = "config/stockdesk.toml";

/// Read the TOML file at `path` (missing means all defaults), then overlay
/// the process environment.
pub fn load_config(path: impl AsRef<Path>) -> Result<StockdeskConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

pub fn load_config_with<F>(path: impl AsRef<Path>, lookup: F) -> Result<StockdeskConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();
    let mut config = if path.exists() {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&source)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?
    } else {
        debug!(path = %path.display(), "No config file, using defaults");
        StockdeskConfig::default()
    };
    config
        .apply_env(lookup)
        .context("Invalid environment configuration")?;
    Ok(config)
}

/// `RUST_LOG` wins; otherwise `debug` when verbose, `info` when not.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn build_executor(config: &DatabaseConfig) -> Result<Arc<dyn QueryExecutor>> {
    let timeout = Duration::from_secs(config.query_timeout_seconds);
    Ok(match config.backend {
        DatabaseBackend::Mssql => Arc::new(
            MssqlExecutor::from_config(config, timeout)
                .context("Invalid SQL Server configuration")?,
        ),
        DatabaseBackend::Sqlite => Arc::new(SqliteExecutor::new(&config.sqlite_path, timeout)),
    })
}

pub fn build_llm(config: &StockdeskConfig) -> Result<Arc<dyn LlmClient>> {
    let client = AnthropicClient::new(&config.llm).context("Failed to build LLM client")?;
    Ok(Arc::new(client))
}

/// Everything a specialist needs, built once and shared.
pub struct Runtime {
    pub config: StockdeskConfig,
    pub router: CapabilityRouter,
    pub executor: Arc<dyn QueryExecutor>,
    pub llm: Arc<dyn LlmClient>,
}

impl Runtime {
    pub fn new(config: StockdeskConfig) -> Result<Self> {
        let executor = build_executor(&config.database)?;
        let llm = build_llm(&config)?;
        Ok(Self::with_parts(config, executor, llm))
    }

    pub fn with_parts(
        config: StockdeskConfig,
        executor: Arc<dyn QueryExecutor>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            config,
            router: CapabilityRouter::standard(),
            executor,
            llm,
        }
    }

    pub fn specialist(&self, domain: Domain) -> LlmSpecialist {
        LlmSpecialist::for_domain(
            domain,
            &self.router,
            Arc::clone(&self.executor),
            Arc::clone(&self.llm),
            self.config.llm.model.clone(),
            &self.config.agents,
        )
    }

    pub fn pipeline(&self) -> BriefingPipeline {
        let steps = Domain::PIPELINE
            .into_iter()
            .map(|domain| {
                PipelineStep::new(domain, Arc::new(self.specialist(domain)) as Arc<dyn Specialist>)
            })
            .collect();
        BriefingPipeline::from_config(steps, &self.config.agents)
    }

    pub fn chat_assistant(&self) -> ChatAssistant {
        ChatAssistant::new(Arc::new(LlmSpecialist::chat_assistant(
            &self.router,
            Arc::clone(&self.executor),
            Arc::clone(&self.llm),
            self.config.llm.model.clone(),
            &self.config.agents,
        )))
    }
}

pub fn build_pipeline(config: &StockdeskConfig) -> Result<BriefingPipeline> {
    Ok(Runtime::new(config.clone())?.pipeline())
}

/// Subject and body of the SMTP probe message.
pub fn test_email(sent_at: NaiveDateTime) -> (String, String) {
    let body = format!(
        "<html><body>\
         <h2 style='color:#2c3e50;'>Test Email</h2>\
         <p>This is a test email from the stockdesk briefing service.</p>\
         <p>If you received this, your email configuration is working correctly.</p>\
         <p><small>Sent at: {}</small></p>\
         </body></html>",
        sent_at.format("%Y-%m-%d %H:%M:%S")
    );
    ("Test - stockdesk daily briefing".to_string(), body)
}

/// One line per table, as printed by the connectivity probe.
pub fn format_inventory(tables: &[TableCount]) -> String {
    let mut lines = vec![format!("Found {} tables:", tables.len())];
    lines.extend(
        tables
            .iter()
            .map(|t| format!("  - {}: {} rows", t.name, thousands(t.rows))),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_means_defaults_plus_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_with(
            dir.path().join("absent.toml"),
            env(&[("SQL_BACKEND", "sqlite"), ("PIPELINE_COOLDOWN_SECS", "45")]),
        )
        .unwrap();
        assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
        assert_eq!(config.agents.cooldown_seconds, 45);
        assert_eq!(config.agents.max_iter, 5);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockdesk.toml");
        std::fs::write(&path, "[smtp]\nport = 25\nto = \"desk@example.com\"\n").unwrap();

        let config = load_config_with(&path, env(&[("SMTP_PORT", "2525")])).unwrap();
        assert_eq!(config.smtp.port, 2525);
        assert_eq!(config.smtp.to, "desk@example.com");
    }

    #[test]
    fn bad_env_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_with(dir.path().join("x.toml"), env(&[("AGENT_MAX_RPM", "lots")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("AGENT_MAX_RPM"));
    }

    #[test]
    fn shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../").join(DEFAULT_CONFIG_PATH);
        let config = load_config_with(&path, env(&[])).unwrap();
        assert_eq!(config.database.database, "stockdata_db");
        assert_eq!(config.a2a.base_port, 5001);
        assert_eq!(config.agents.step_timeout_seconds, 600);
    }

    #[test]
    fn credential_mode_builds_a_sql_server_executor() {
        let config = DatabaseConfig {
            database: "stockdata_db".to_string(),
            username: "reader".to_string(),
            password: "s3cret".to_string(),
            trusted_connection: false,
            ..DatabaseConfig::default()
        };
        assert_eq!(build_executor(&config).unwrap().backend(), "mssql");
    }

    #[test]
    fn trusted_mode_builds_only_with_integrated_auth() {
        let config = DatabaseConfig::default();
        assert!(config.trusted_connection);
        let built = build_executor(&config);
        if stockdesk_sql::INTEGRATED_AUTH {
            assert!(built.is_ok());
        } else {
            let err = built.err().unwrap();
            assert!(format!("{err:#}").contains("integrated authentication"));
        }
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[agents\n").unwrap();
        assert!(load_config_with(&path, env(&[])).is_err());
    }

    #[test]
    fn runtime_builds_seven_steps_in_order() {
        let mut config = StockdeskConfig::default();
        config.database.backend = DatabaseBackend::Sqlite;
        let runtime = Runtime::new(config).unwrap();

        let pipeline = runtime.pipeline();
        let domains: Vec<Domain> = pipeline.steps().iter().map(|s| s.domain).collect();
        assert_eq!(domains, Domain::PIPELINE.to_vec());
        assert_eq!(pipeline.cooldown(), Duration::from_secs(60));
        assert_eq!(pipeline.steps()[5].specialist.role(), "Risk Manager");
    }

    #[test]
    fn inventory_lines() {
        let tables = vec![
            TableCount {
                name: "forex_hist_data".to_string(),
                rows: 1234567,
            },
            TableCount {
                name: "stock_notes".to_string(),
                rows: 12,
            },
        ];
        assert_eq!(
            format_inventory(&tables),
            "Found 2 tables:\n  - forex_hist_data: 1,234,567 rows\n  - stock_notes: 12 rows"
        );
    }

    #[test]
    fn test_email_is_timestamped() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        let (subject, body) = test_email(at);
        assert!(subject.starts_with("Test - "));
        assert!(body.contains("Sent at: 2025-03-03 07:30:00"));
    }
}
