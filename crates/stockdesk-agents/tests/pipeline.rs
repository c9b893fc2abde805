use std::sync::Arc;
use std::time::Duration;

use stockdesk_agents::test_support::{RecordingMailer, ScriptedSpecialist};
use stockdesk_agents::{BriefingPipeline, PipelineState, PipelineStep, Specialist};
use stockdesk_models::Domain;
use stockdesk_report::ReportCompiler;

const COOLDOWN: Duration = Duration::from_secs(60);

fn scripted_steps(failing: Option<Domain>) -> (Vec<PipelineStep>, Vec<Arc<ScriptedSpecialist>>) {
    let mut steps = Vec::new();
    let mut handles = Vec::new();
    for domain in Domain::PIPELINE {
        let specialist = if Some(domain) == failing {
            ScriptedSpecialist::failing(domain.title())
        } else {
            ScriptedSpecialist::ok(domain.title(), &format!("**{} summary**", domain.title()))
        };
        let specialist = Arc::new(specialist);
        handles.push(Arc::clone(&specialist));
        steps.push(PipelineStep::new(domain, specialist as Arc<dyn Specialist>));
    }
    (steps, handles)
}

fn pipeline(steps: Vec<PipelineStep>) -> BriefingPipeline {
    BriefingPipeline::new(steps, COOLDOWN, Duration::from_secs(600))
}

#[tokio::test(start_paused = true)]
async fn full_run_waits_between_every_pair_of_steps() {
    let (steps, handles) = scripted_steps(None);
    let n = steps.len() as u32;
    let pipeline = pipeline(steps);

    let start = tokio::time::Instant::now();
    let results = pipeline.gather("March 03, 2025").await;
    let elapsed = start.elapsed();

    assert!(elapsed >= COOLDOWN * (n - 1));
    assert!(elapsed < COOLDOWN * n);
    assert_eq!(results.len(), 7);
    for handle in &handles {
        assert_eq!(handle.calls(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn tasks_are_dated_and_run_in_pipeline_order() {
    let (steps, handles) = scripted_steps(None);
    let pipeline = pipeline(steps);
    pipeline.gather("March 03, 2025").await;

    let market = handles[0].tasks().await;
    assert!(market[0].description.starts_with("Today is March 03, 2025."));
    let cross = handles[6].tasks().await;
    assert!(cross[0].description.contains("common_stocks_both_strategies"));
}

#[tokio::test(start_paused = true)]
async fn failed_step_leaves_every_other_section_intact() {
    for failing in Domain::PIPELINE {
        let (steps, _) = scripted_steps(Some(failing));
        let results = pipeline(steps).gather("today").await;

        assert_eq!(results.len(), 7);
        for domain in Domain::PIPELINE {
            let text = results.get(domain).unwrap();
            if domain == failing {
                assert_eq!(text, "Agent failed: LLM request failed: scripted failure");
            } else {
                assert_eq!(text, format!("**{} summary**", domain.title()));
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn delivered_run_walks_every_state() {
    let (steps, _) = scripted_steps(None);
    let compiler = ReportCompiler::embedded().unwrap();
    let mailer = RecordingMailer::accepting();

    let run = pipeline(steps)
        .run("March 03, 2025", &compiler, Some(&mailer))
        .await
        .unwrap();

    assert!(run.succeeded());
    let mut expected = vec![PipelineState::Pending];
    for (i, domain) in Domain::PIPELINE.into_iter().enumerate() {
        expected.push(PipelineState::Running(domain));
        if i + 1 < Domain::PIPELINE.len() {
            expected.push(PipelineState::CoolingDown);
        }
    }
    expected.push(PipelineState::Compiling);
    expected.push(PipelineState::Delivered);
    assert_eq!(run.states, expected);

    let sent = mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "Daily Trading Briefing - March 03, 2025");
    assert_eq!(sent[0].1, run.html);
    assert!(run.html.contains("<strong>Market Intelligence summary</strong>"));
}

#[tokio::test(start_paused = true)]
async fn rejected_delivery_is_reported_not_raised() {
    let (steps, _) = scripted_steps(Some(Domain::Risk));
    let compiler = ReportCompiler::embedded().unwrap();
    let mailer = RecordingMailer::rejecting();

    let run = pipeline(steps)
        .run("today", &compiler, Some(&mailer))
        .await
        .unwrap();

    assert!(!run.succeeded());
    assert_eq!(run.final_state(), PipelineState::DeliveryFailed);
    assert!(run.html.contains("Agent failed: LLM request failed: scripted failure"));
}

#[tokio::test(start_paused = true)]
async fn dry_run_stops_after_compiling() {
    let (steps, _) = scripted_steps(None);
    let compiler = ReportCompiler::embedded().unwrap();

    let run = pipeline(steps).run("today", &compiler, None).await.unwrap();
    assert!(run.delivery.is_none());
    assert!(run.succeeded());
    assert_eq!(run.final_state(), PipelineState::Compiling);
}
