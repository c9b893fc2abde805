use serde::{Deserialize, Serialize};

/// Top-level configuration for stockdesk.
///
/// Every section is defaulted, so an empty TOML document is a valid config.
/// Environment variables are layered on top with [`StockdeskConfig::apply_env`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StockdeskConfig {
    pub llm: LlmConfig,
    pub database: DatabaseConfig,
    pub smtp: SmtpConfig,
    pub agents: AgentsConfig,
    pub a2a: A2aConfig,
}

/// Anthropic Messages API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Checked lazily at the first LLM call, not at startup.
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub request_timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_base: "https://api.anthropic.com/v1".to_string(),
            request_timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// Microsoft SQL Server over TDS.
    #[default]
    Mssql,
    /// Local SQLite file, for development snapshots and tests.
    Sqlite,
}

/// Relational store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    /// `host` or `host,port`.
    pub server: String,
    pub database: String,
    /// Reported by the connectivity probe; the native TDS client does not use it.
    pub driver: String,
    pub username: String,
    pub password: String,
    /// Windows/Kerberos integrated auth instead of username/password.
    pub trusted_connection: bool,
    pub sqlite_path: String,
    pub query_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Mssql,
            server: "localhost".to_string(),
            database: String::new(),
            driver: "{ODBC Driver 17 for SQL Server}".to_string(),
            username: String::new(),
            password: String::new(),
            trusted_connection: true,
            sqlite_path: "data/stockdesk.db".to_string(),
            query_timeout_seconds: 60,
        }
    }
}

impl DatabaseConfig {
    /// ADO-style connection string for the SQL Server backend.
    pub fn connection_string(&self) -> String {
        self.build_connection_string(&self.password)
    }

    /// Same as [`connection_string`](Self::connection_string) with the password masked.
    pub fn redacted_connection_string(&self) -> String {
        let mask = if self.password.is_empty() { "" } else { "****" };
        self.build_connection_string(mask)
    }

    fn build_connection_string(&self, password: &str) -> String {
        let server = if self.server.starts_with("tcp:") {
            self.server.clone()
        } else {
            format!("tcp:{}", self.server)
        };
        if self.trusted_connection {
            format!(
                "server={server};database={};IntegratedSecurity=true;TrustServerCertificate=true",
                self.database
            )
        } else {
            format!(
                "server={server};database={};user id={};password={password};TrustServerCertificate=true",
                self.database, self.username
            )
        }
    }
}

/// Mail relay settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub from_name: String,
    /// Comma-separated distribution list.
    pub to: String,
    pub timeout_seconds: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: "smtp.office365.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: String::new(),
            from_name: String::new(),
            to: String::new(),
            timeout_seconds: 60,
        }
    }
}

impl SmtpConfig {
    pub fn recipients(&self) -> Vec<String> {
        self.to
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Specialist behaviour and pipeline pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentsConfig {
    /// Upper bound on LLM turns per specialist invocation.
    pub max_iter: u32,
    pub verbose: bool,
    /// Requests-per-minute ceiling per specialist.
    pub max_rpm: u32,
    /// Pause between pipeline steps.
    pub cooldown_seconds: u64,
    /// Upper bound on one specialist invocation.
    pub step_timeout_seconds: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            max_iter: 5,
            verbose: true,
            max_rpm: 4,
            cooldown_seconds: 60,
            step_timeout_seconds: 600,
        }
    }
}

/// Per-specialist HTTP servers and their supervisor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct A2aConfig {
    pub host: String,
    /// Port of the first specialist; the rest follow in pipeline order.
    pub base_port: u16,
    pub stagger_millis: u64,
    pub liveness_interval_seconds: u64,
    pub shutdown_timeout_seconds: u64,
}

impl Default for A2aConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            base_port: 5001,
            stagger_millis: 1000,
            liveness_interval_seconds: 5,
            shutdown_timeout_seconds: 10,
        }
    }
}

/// An environment variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnvValue {
    pub var: &'static str,
    pub value: String,
}

impl std::fmt::Display for InvalidEnvValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value for {}: '{}'", self.var, self.value)
    }
}

impl std::error::Error for InvalidEnvValue {}

impl StockdeskConfig {
    /// Overlay values from the environment. `lookup` is usually `|k| std::env::var(k).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), InvalidEnvValue>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |var: &str, slot: &mut String| {
            if let Some(v) = lookup(var) {
                *slot = v;
            }
        };

        text("ANTHROPIC_API_KEY", &mut self.llm.api_key);
        text("LLM_MODEL", &mut self.llm.model);

        text("SQL_SERVER", &mut self.database.server);
        text("SQL_DATABASE", &mut self.database.database);
        text("SQL_DRIVER", &mut self.database.driver);
        text("SQL_USERNAME", &mut self.database.username);
        text("SQL_PASSWORD", &mut self.database.password);
        text("SQLITE_PATH", &mut self.database.sqlite_path);
        if let Some(v) = lookup("SQL_TRUSTED_CONNECTION") {
            self.database.trusted_connection = v.eq_ignore_ascii_case("yes");
        }
        if let Some(v) = lookup("SQL_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "mssql" | "sqlserver" => DatabaseBackend::Mssql,
                "sqlite" => DatabaseBackend::Sqlite,
                _ => return Err(InvalidEnvValue { var: "SQL_BACKEND", value: v }),
            };
        }

        text("SMTP_SERVER", &mut self.smtp.server);
        text("SMTP_USERNAME", &mut self.smtp.username);
        text("SMTP_PASSWORD", &mut self.smtp.password);
        text("EMAIL_FROM", &mut self.smtp.from);
        text("EMAIL_FROM_NAME", &mut self.smtp.from_name);
        text("EMAIL_TO", &mut self.smtp.to);
        if let Some(v) = lookup("SMTP_PORT") {
            self.smtp.port = parse_env("SMTP_PORT", v)?;
        }

        if let Some(v) = lookup("AGENT_MAX_ITER") {
            self.agents.max_iter = parse_env("AGENT_MAX_ITER", v)?;
        }
        if let Some(v) = lookup("AGENT_MAX_RPM") {
            self.agents.max_rpm = parse_env("AGENT_MAX_RPM", v)?;
        }
        if let Some(v) = lookup("AGENT_VERBOSE") {
            self.agents.verbose = v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = lookup("PIPELINE_COOLDOWN_SECS") {
            self.agents.cooldown_seconds = parse_env("PIPELINE_COOLDOWN_SECS", v)?;
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, InvalidEnvValue> {
    value
        .trim()
        .parse()
        .map_err(|_| InvalidEnvValue { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = StockdeskConfig::default();
        assert_eq!(config.llm.model, "claude-sonnet-4-20250514");
        assert_eq!(config.database.server, "localhost");
        assert!(config.database.trusted_connection);
        assert_eq!(config.smtp.server, "smtp.office365.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.agents.max_iter, 5);
        assert_eq!(config.agents.max_rpm, 4);
        assert!(config.agents.verbose);
        assert_eq!(config.agents.cooldown_seconds, 60);
    }

    #[test]
    fn roundtrip_config() {
        let config = StockdeskConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: StockdeskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn config_from_partial_toml() {
        let toml_str = r#"
[database]
backend = "sqlite"
sqlite_path = "/tmp/snapshot.db"

[agents]
cooldown_seconds = 5
"#;
        let config: StockdeskConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.backend, DatabaseBackend::Sqlite);
        assert_eq!(config.database.sqlite_path, "/tmp/snapshot.db");
        assert_eq!(config.agents.cooldown_seconds, 5);
        assert_eq!(config.agents.max_iter, 5);
        assert_eq!(config.smtp.port, 587);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = StockdeskConfig::default();
        config
            .apply_env(env(&[
                ("SQL_SERVER", "db01,1433"),
                ("SQL_TRUSTED_CONNECTION", "no"),
                ("SQL_USERNAME", "reader"),
                ("SMTP_PORT", "2525"),
                ("AGENT_VERBOSE", "FALSE"),
                ("AGENT_MAX_RPM", "10"),
                ("EMAIL_TO", "a@example.com, b@example.com,"),
            ]))
            .unwrap();

        assert_eq!(config.database.server, "db01,1433");
        assert!(!config.database.trusted_connection);
        assert_eq!(config.database.username, "reader");
        assert_eq!(config.smtp.port, 2525);
        assert!(!config.agents.verbose);
        assert_eq!(config.agents.max_rpm, 10);
        assert_eq!(
            config.smtp.recipients(),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[test]
    fn env_rejects_non_numeric_port() {
        let mut config = StockdeskConfig::default();
        let err = config.apply_env(env(&[("SMTP_PORT", "smtp")])).unwrap_err();
        assert_eq!(err.var, "SMTP_PORT");
    }

    #[test]
    fn trusted_connection_string() {
        let config = DatabaseConfig {
            database: "StockData".to_string(),
            ..DatabaseConfig::default()
        };
        assert_eq!(
            config.connection_string(),
            "server=tcp:localhost;database=StockData;IntegratedSecurity=true;TrustServerCertificate=true"
        );
    }

    #[test]
    fn credential_connection_string_is_redactable() {
        let config = DatabaseConfig {
            server: "db01,1433".to_string(),
            database: "StockData".to_string(),
            username: "reader".to_string(),
            password: "s3cret".to_string(),
            trusted_connection: false,
            ..DatabaseConfig::default()
        };
        assert!(config.connection_string().contains("password=s3cret"));
        let redacted = config.redacted_connection_string();
        assert!(redacted.contains("user id=reader"));
        assert!(redacted.contains("password=****"));
        assert!(!redacted.contains("s3cret"));
    }
}
