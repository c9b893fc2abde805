pub mod a2a;
pub mod agent_result;
pub mod config;
pub mod domain;

pub use a2a::{A2aErrorBody, A2aReply, AgentCard, CardCapabilities, HealthReport, Skill};
pub use agent_result::{AgentResults, NO_DATA_PLACEHOLDER};
pub use config::{
    A2aConfig, AgentsConfig, DatabaseBackend, DatabaseConfig, InvalidEnvValue, LlmConfig,
    SmtpConfig, StockdeskConfig,
};
pub use domain::{Domain, UnknownDomain};
