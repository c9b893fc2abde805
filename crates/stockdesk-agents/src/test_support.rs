//! Scripted stand-ins for the LLM, specialists and the mailer, so the tool
//! loop, the pipeline and the HTTP adapter can be exercised offline.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use stockdesk_report::{DeliveryReport, Mailer};
use tokio::sync::Mutex;

use crate::error::AgentError;
use crate::llm::{ContentBlock, LlmClient, LlmRequest, LlmResponse, StopReason, TokenUsage};
use crate::prompts::TaskSpec;
use crate::specialist::Specialist;

/// A final text answer.
pub fn text_reply(text: &str) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::Text {
            text: text.to_string(),
        }],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

/// A single tool call.
pub fn tool_use_reply(id: &str, name: &str, input: Value) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        }],
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    }
}

/// Replays queued responses in order and records every request.
/// Fails once the queue is empty.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<LlmResponse>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, AgentError> {
        self.requests.lock().await.push(request.clone());
        self.responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| AgentError::Request("scripted responses exhausted".to_string()))
    }
}

/// A specialist with a fixed answer or a fixed failure.
pub struct ScriptedSpecialist {
    pub name: String,
    pub role: String,
    reply: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    tasks: Mutex<Vec<TaskSpec>>,
}

impl ScriptedSpecialist {
    pub fn ok(name: &str, reply: &str) -> Self {
        Self {
            name: name.to_string(),
            role: format!("{name} role"),
            reply: Ok(reply.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            reply: Err("scripted failure".to_string()),
            ..Self::ok(name, "")
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn tasks(&self) -> Vec<TaskSpec> {
        self.tasks.lock().await.clone()
    }
}

#[async_trait]
impl Specialist for ScriptedSpecialist {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &str {
        &self.role
    }

    async fn invoke(&self, task: &TaskSpec) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tasks.lock().await.push(task.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map_err(AgentError::Request)
    }
}

/// Records what it was asked to send and reports a fixed outcome.
pub struct RecordingMailer {
    succeed: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn accepting() -> Self {
        Self {
            succeed: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            succeed: false,
            ..Self::accepting()
        }
    }

    /// `(subject, html)` pairs in send order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, html_body: &str) -> DeliveryReport {
        self.sent
            .lock()
            .await
            .push((subject.to_string(), html_body.to_string()));
        if self.succeed {
            DeliveryReport::sent(format!("recorded '{subject}'"))
        } else {
            DeliveryReport::failed("SMTP Error: relay refused")
        }
    }
}
