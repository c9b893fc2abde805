use std::sync::Arc;
use std::time::Duration;

use stockdesk_a2a::{create_app, A2aClient, A2aError, AppState};
use stockdesk_agents::test_support::ScriptedSpecialist;
use stockdesk_agents::Specialist;
use stockdesk_models::Domain;
use tokio::net::TcpListener;

async fn spawn_server(specialist: ScriptedSpecialist) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let state = AppState::new(
        Domain::Risk,
        port,
        Arc::new(specialist) as Arc<dyn Specialist>,
        Duration::from_secs(30),
    );
    tokio::spawn(async move {
        axum::serve(listener, create_app(state)).await.unwrap();
    });
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn discover_then_ask() {
    let url = spawn_server(ScriptedSpecialist::ok("Risk Assessment Agent", "No high-risk alerts.")).await;
    let client = A2aClient::new(&format!("{url}/"), Duration::from_secs(10)).unwrap();
    assert_eq!(client.base_url(), url);

    let card = client.discover().await.unwrap();
    assert_eq!(card.name, "Risk Assessment Agent");
    assert_eq!(card.skills[0].id, "risk_assessment");

    let reply = client.send("Any conflicting signals?").await.unwrap();
    assert_eq!(reply.text(), "No high-risk alerts.");
    assert_eq!(reply.metadata.agent_name, "Risk Assessment Agent");
}

#[tokio::test]
async fn server_failure_surfaces_its_error_text() {
    let url = spawn_server(ScriptedSpecialist::failing("Risk Assessment Agent")).await;
    let client = A2aClient::new(&url, Duration::from_secs(10)).unwrap();

    let err = client.send("Any conflicting signals?").await.unwrap_err();
    match err {
        A2aError::Remote { status, message, .. } => {
            assert_eq!(status, 500);
            assert_eq!(message, "LLM request failed: scripted failure");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn offline_server_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = A2aClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(5)).unwrap();
    let err = client.discover().await.unwrap_err();
    assert!(matches!(err, A2aError::Request { .. }));
}
