//! One specialist behind three HTTP routes:
//!
//! - `GET /.well-known/agent.json` - discovery card
//! - `POST /a2a` - send a message, get the specialist's answer
//! - `GET /health` - liveness with the capability list

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use stockdesk_agents::{AgentError, Specialist, TaskSpec};
use stockdesk_models::{A2aReply, AgentCard, Domain, HealthReport};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cards;
use crate::envelope::{extract_message_text, is_empty_body};
use crate::error::A2aError;

#[derive(Clone)]
pub struct AppState {
    pub specialist: Arc<dyn Specialist>,
    pub card: Arc<AgentCard>,
    pub capabilities: Arc<Vec<String>>,
    pub invoke_timeout: Duration,
}

impl AppState {
    pub fn new(
        domain: Domain,
        port: u16,
        specialist: Arc<dyn Specialist>,
        invoke_timeout: Duration,
    ) -> Self {
        Self {
            specialist,
            card: Arc::new(cards::agent_card(domain, port)),
            capabilities: Arc::new(
                cards::capabilities(domain).iter().map(|c| c.to_string()).collect(),
            ),
            invoke_timeout,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/.well-known/agent.json", get(agent_card))
        .route("/a2a", post(handle_message))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy".to_string(),
        agent: state.card.name.clone(),
        capabilities: state.capabilities.as_ref().clone(),
    })
}

/// The body is taken as raw bytes so that a missing content type or broken
/// JSON is answered with the same error shape as every other failure.
async fn handle_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<A2aReply>, A2aError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(A2aError::NoBody);
    }
    let body: Value =
        serde_json::from_slice(&body).map_err(|e| A2aError::MalformedBody(e.to_string()))?;
    if is_empty_body(&body) {
        return Err(A2aError::NoBody);
    }

    let text = extract_message_text(&body);
    if text.is_empty() {
        return Err(A2aError::NoText);
    }

    let agent_name = state.card.name.clone();
    let start = Instant::now();
    let task = TaskSpec::message(text);
    let outcome = match tokio::time::timeout(state.invoke_timeout, state.specialist.invoke(&task)).await
    {
        Ok(result) => result,
        Err(_) => Err(AgentError::Timeout(state.invoke_timeout.as_secs())),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(answer) => {
            info!(agent = %agent_name, elapsed_ms, "A2A message answered");
            Ok(Json(A2aReply::agent_text(
                answer,
                &agent_name,
                state.specialist.role(),
            )))
        }
        Err(e) => {
            warn!(agent = %agent_name, error = %e, elapsed_ms, "A2A invocation failed");
            Err(A2aError::Invocation {
                agent_name,
                message: e.to_string(),
            })
        }
    }
}

/// Serve `app` on `addr` until `cancel` fires.
pub async fn serve(addr: &str, app: Router, cancel: CancellationToken) -> Result<(), A2aError> {
    let listener = TcpListener::bind(addr).await.map_err(|source| A2aError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    info!(addr, "A2A server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!(addr, "A2A server stopped");
    Ok(())
}
