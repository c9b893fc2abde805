use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use stockdesk_models::{AgentsConfig, Domain};
use stockdesk_sql::{CapabilityRouter, QueryExecutor};
use tracing::{debug, info};

use crate::error::AgentError;
use crate::llm::{ContentBlock, LlmClient, LlmRequest, Message, StopReason, ToolChoice};
use crate::prompts::{today_label, Calculator, SpecialistProfile, TaskSpec};
use crate::tools::{
    AccuracyCalculator, CatalogQueryTool, PnlCalculator, RiskRewardCalculator, SqlQueryTool,
    Toolbox,
};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// An LLM-backed role that turns a task into free text. Mockable for testing.
#[async_trait]
pub trait Specialist: Send + Sync {
    fn name(&self) -> &str;
    fn role(&self) -> &str;

    async fn invoke(&self, task: &TaskSpec) -> Result<String, AgentError>;
}

/// A specialist that runs a bounded tool loop against an [`LlmClient`].
pub struct LlmSpecialist {
    profile: SpecialistProfile,
    toolbox: Toolbox,
    llm: Arc<dyn LlmClient>,
    model: String,
    max_iter: u32,
    limiter: Option<DirectLimiter>,
}

impl LlmSpecialist {
    /// `max_rpm == 0` disables rate limiting.
    pub fn new(
        profile: SpecialistProfile,
        toolbox: Toolbox,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        agents: &AgentsConfig,
    ) -> Self {
        let limiter = NonZeroU32::new(agents.max_rpm)
            .map(|rpm| RateLimiter::direct(Quota::per_minute(rpm)));
        Self {
            profile,
            toolbox,
            llm,
            model: model.into(),
            max_iter: agents.max_iter.max(1),
            limiter,
        }
    }

    /// The briefing specialist for `domain`: its catalog tool plus its calculators.
    pub fn for_domain(
        domain: Domain,
        router: &CapabilityRouter,
        executor: Arc<dyn QueryExecutor>,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        agents: &AgentsConfig,
    ) -> Self {
        let profile = SpecialistProfile::for_domain(domain);
        let toolbox = with_calculators(
            Toolbox::new().with(CatalogQueryTool::new(router.for_domain(domain), executor)),
            profile.calculators,
        );
        Self::new(profile, toolbox, llm, model, agents)
    }

    /// The chat assistant: combined catalog, ad hoc SQL and every calculator.
    pub fn chat_assistant(
        router: &CapabilityRouter,
        executor: Arc<dyn QueryExecutor>,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        agents: &AgentsConfig,
    ) -> Self {
        let profile = SpecialistProfile::chat_assistant();
        let toolbox = Toolbox::new()
            .with(CatalogQueryTool::new(router.combined(), Arc::clone(&executor)))
            .with(SqlQueryTool::new(executor));
        let toolbox = with_calculators(toolbox, profile.calculators);
        Self::new(profile, toolbox, llm, model, agents)
    }

    pub fn profile(&self) -> &SpecialistProfile {
        &self.profile
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.toolbox.names()
    }

    fn tool_choice(&self, last_turn: bool) -> Option<ToolChoice> {
        if self.toolbox.is_empty() {
            None
        } else if last_turn {
            Some(ToolChoice::None)
        } else {
            Some(ToolChoice::Auto)
        }
    }
}

fn with_calculators(mut toolbox: Toolbox, calculators: &[Calculator]) -> Toolbox {
    for calculator in calculators {
        toolbox = match calculator {
            Calculator::Accuracy => toolbox.with(AccuracyCalculator),
            Calculator::Pnl => toolbox.with(PnlCalculator),
            Calculator::RiskReward => toolbox.with(RiskRewardCalculator),
        };
    }
    toolbox
}

#[async_trait]
impl Specialist for LlmSpecialist {
    fn name(&self) -> &str {
        self.profile.name
    }

    fn role(&self) -> &str {
        self.profile.role
    }

    async fn invoke(&self, task: &TaskSpec) -> Result<String, AgentError> {
        let system = self.profile.system_prompt(&today_label());
        let tools = self.toolbox.definitions();
        let mut messages = vec![Message::user(task.prompt())];

        for turn in 1..=self.max_iter {
            let request = LlmRequest {
                model: self.model.clone(),
                max_tokens: self.profile.max_tokens,
                temperature: self.profile.temperature,
                system: system.clone(),
                messages: messages.clone(),
                tools: tools.clone(),
                tool_choice: self.tool_choice(turn == self.max_iter),
            };

            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }
            let response = self.llm.complete(&request).await?;
            debug!(
                agent = %self.profile.name,
                turn,
                stop_reason = ?response.stop_reason,
                "LLM turn finished"
            );

            let wants_tools =
                response.stop_reason == StopReason::ToolUse && response.tool_uses().next().is_some();
            if !wants_tools {
                let answer = response.text();
                let answer = answer.trim();
                if answer.is_empty() {
                    return Err(AgentError::UnexpectedResponse(
                        "model returned an empty answer".to_string(),
                    ));
                }
                info!(agent = %self.profile.name, turns = turn, "Agent produced final answer");
                return Ok(answer.to_string());
            }

            let mut results = Vec::new();
            for (id, name, input) in response.tool_uses() {
                let output = self.toolbox.dispatch(name, input.clone()).await;
                results.push(ContentBlock::ToolResult {
                    tool_use_id: id.to_string(),
                    content: output.content,
                    is_error: output.is_error,
                });
            }
            messages.push(Message::assistant(response.content));
            messages.push(Message::tool_results(results));
        }

        Err(AgentError::MaxIterations(self.max_iter))
    }
}
