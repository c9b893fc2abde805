use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM authentication failed")]
    Authentication,

    #[error("LLM rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("LLM rejected the request: {0}")]
    InvalidRequest(String),

    #[error("Unexpected LLM response: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input for {tool}: {detail}")]
    ToolInput { tool: String, detail: String },

    #[error("Agent produced no final answer within {0} iterations")]
    MaxIterations(u32),

    #[error("Agent timed out after {0} seconds")]
    Timeout(u64),
}
