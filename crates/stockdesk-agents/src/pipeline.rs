use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use stockdesk_models::{AgentResults, AgentsConfig, Domain};
use stockdesk_report::{subject_for, DeliveryReport, Mailer, ReportCompiler, ReportError};
use tracing::{info, warn};

use crate::error::AgentError;
use crate::prompts::TaskSpec;
use crate::specialist::Specialist;

/// Where a briefing run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Pending,
    Running(Domain),
    CoolingDown,
    Compiling,
    Delivered,
    DeliveryFailed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Pending => f.write_str("pending"),
            PipelineState::Running(d) => write!(f, "running({d})"),
            PipelineState::CoolingDown => f.write_str("cooling-down"),
            PipelineState::Compiling => f.write_str("compiling"),
            PipelineState::Delivered => f.write_str("delivered"),
            PipelineState::DeliveryFailed => f.write_str("delivery-failed"),
        }
    }
}

/// One specialist bound to the domain it reports on.
#[derive(Clone)]
pub struct PipelineStep {
    pub domain: Domain,
    pub specialist: Arc<dyn Specialist>,
}

impl PipelineStep {
    pub fn new(domain: Domain, specialist: Arc<dyn Specialist>) -> Self {
        Self { domain, specialist }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct BriefingRun {
    pub report_date: String,
    pub results: AgentResults,
    pub html: String,
    /// `None` when delivery was skipped.
    pub delivery: Option<DeliveryReport>,
    pub states: Vec<PipelineState>,
}

impl BriefingRun {
    pub fn subject(&self) -> String {
        subject_for(&self.report_date)
    }

    /// A skipped delivery counts as success.
    pub fn succeeded(&self) -> bool {
        self.delivery.as_ref().map_or(true, |d| d.success)
    }

    pub fn final_state(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Pending)
    }
}

/// Runs specialists one at a time in a fixed order, pausing between steps.
pub struct BriefingPipeline {
    steps: Vec<PipelineStep>,
    cooldown: Duration,
    step_timeout: Duration,
}

impl BriefingPipeline {
    pub fn new(steps: Vec<PipelineStep>, cooldown: Duration, step_timeout: Duration) -> Self {
        Self {
            steps,
            cooldown,
            step_timeout,
        }
    }

    pub fn from_config(steps: Vec<PipelineStep>, config: &AgentsConfig) -> Self {
        Self::new(
            steps,
            Duration::from_secs(config.cooldown_seconds),
            Duration::from_secs(config.step_timeout_seconds),
        )
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Run every step and collect its text. Never fails: a failed step stores
    /// its error text instead.
    pub async fn gather(&self, report_date: &str) -> AgentResults {
        let mut states = Vec::new();
        self.gather_into(report_date, &mut states).await
    }

    async fn gather_into(&self, report_date: &str, states: &mut Vec<PipelineState>) -> AgentResults {
        let mut results = AgentResults::new();
        let total = self.steps.len();

        for (i, step) in self.steps.iter().enumerate() {
            transition(states, PipelineState::Running(step.domain));
            let text = self.run_step(step, report_date).await;
            results.insert(step.domain, text);

            if i + 1 < total {
                transition(states, PipelineState::CoolingDown);
                info!(
                    cooldown_secs = self.cooldown.as_secs(),
                    next = %self.steps[i + 1].domain,
                    "Cooling down before next agent"
                );
                tokio::time::sleep(self.cooldown).await;
            }
        }

        results
    }

    async fn run_step(&self, step: &PipelineStep, report_date: &str) -> String {
        let task = TaskSpec::briefing(step.domain, report_date);
        let start = Instant::now();
        info!(domain = %step.domain, agent = %step.specialist.name(), "Running agent");

        let outcome = match tokio::time::timeout(self.step_timeout, step.specialist.invoke(&task)).await
        {
            Ok(result) => result,
            Err(_) => Err(AgentError::Timeout(self.step_timeout.as_secs())),
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(text) => {
                info!(domain = %step.domain, elapsed_ms, chars = text.len(), "Agent succeeded");
                text
            }
            Err(e) => {
                warn!(domain = %step.domain, error = %e, elapsed_ms, "Agent failed");
                format!("Agent failed: {e}")
            }
        }
    }

    /// Full run: gather, compile, then deliver through `mailer` if one is given.
    ///
    /// Only a template failure aborts the run.
    pub async fn run(
        &self,
        report_date: &str,
        compiler: &ReportCompiler,
        mailer: Option<&dyn Mailer>,
    ) -> Result<BriefingRun, ReportError> {
        let start = Instant::now();
        let mut states = vec![PipelineState::Pending];
        info!(steps = self.steps.len(), report_date, "Starting daily briefing");

        let results = self.gather_into(report_date, &mut states).await;

        transition(&mut states, PipelineState::Compiling);
        let html = compiler.compile(&results, report_date)?;

        let delivery = match mailer {
            Some(mailer) => {
                let report = mailer.send(&subject_for(report_date), &html).await;
                let state = if report.success {
                    PipelineState::Delivered
                } else {
                    PipelineState::DeliveryFailed
                };
                transition(&mut states, state);
                Some(report)
            }
            None => {
                info!("Delivery skipped");
                None
            }
        };

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            html_bytes = html.len(),
            "Daily briefing finished"
        );

        Ok(BriefingRun {
            report_date: report_date.to_string(),
            results,
            html,
            delivery,
            states,
        })
    }
}

fn transition(states: &mut Vec<PipelineState>, next: PipelineState) {
    info!(state = %next, "Pipeline state");
    states.push(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedSpecialist;

    #[test]
    fn state_labels() {
        assert_eq!(PipelineState::Running(Domain::Forex).to_string(), "running(forex)");
        assert_eq!(PipelineState::CoolingDown.to_string(), "cooling-down");
    }

    #[test]
    fn skipped_delivery_counts_as_success() {
        let run = BriefingRun {
            report_date: "March 03, 2025".to_string(),
            results: AgentResults::new(),
            html: String::new(),
            delivery: None,
            states: vec![PipelineState::Pending, PipelineState::Compiling],
        };
        assert!(run.succeeded());
        assert_eq!(run.final_state(), PipelineState::Compiling);
        assert_eq!(run.subject(), "Daily Trading Briefing - March 03, 2025");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_step_times_out_into_placeholder() {
        let slow = ScriptedSpecialist::ok("Slow", "slow answer").with_delay(Duration::from_secs(30));
        let pipeline = BriefingPipeline::new(
            vec![PipelineStep::new(Domain::Market, Arc::new(slow))],
            Duration::from_secs(1),
            Duration::from_secs(5),
        );

        let results = pipeline.gather("today").await;
        assert_eq!(
            results.get(Domain::Market),
            Some("Agent failed: Agent timed out after 5 seconds")
        );
    }
}
