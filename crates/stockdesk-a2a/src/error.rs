use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stockdesk_models::A2aErrorBody;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum A2aError {
    #[error("No JSON body provided")]
    NoBody,

    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    #[error("No message text found in request")]
    NoText,

    /// The specialist failed; the process keeps serving.
    #[error("{message}")]
    Invocation { agent_name: String, message: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Failed to start {agent}: {source}")]
    Spawn {
        agent: String,
        source: std::io::Error,
    },

    #[error("Port for {agent} is out of range: base port {base_port} + {offset} > 65535")]
    PortOutOfRange {
        agent: String,
        base_port: u16,
        offset: usize,
    },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {message}")]
    Remote {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

impl A2aError {
    pub fn status(&self) -> StatusCode {
        match self {
            A2aError::NoBody | A2aError::MalformedBody(_) | A2aError::NoText => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for A2aError {
    fn into_response(self) -> Response {
        let status = self.status();
        let agent_name = match &self {
            A2aError::Invocation { agent_name, .. } => Some(agent_name.clone()),
            _ => None,
        };
        let body = A2aErrorBody {
            error: self.to_string(),
            agent_name,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_400() {
        assert_eq!(A2aError::NoBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(A2aError::NoText.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            A2aError::MalformedBody("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn invocation_error_carries_only_the_cause() {
        let err = A2aError::Invocation {
            agent_name: "Forex Analysis Agent".into(),
            message: "LLM authentication failed".into(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "LLM authentication failed");
    }
}
